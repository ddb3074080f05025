//! Environment configuration for scenario runs.
//!
//! Clouds differ in which images, flavors, and login users the checks
//! should use, so those live in a sectioned YAML file:
//!
//! ```yaml
//! ironic:
//!   image: ubuntu-baremetal
//!   flavor: bm.standard
//!   user: ubuntu
//! virt:
//!   image: ubuntu-cloud
//!   flavor: gp.small
//!   user: cloud-user
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Environment variable naming an alternate config file path.
const CONFIG_PATH_VAR: &str = "IRONCHECK_CONFIG";

/// Default config file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "ironcheck.yaml";

/// Sectioned key/value configuration loaded from YAML.
#[derive(Debug, Clone)]
pub struct Config {
    sections: HashMap<String, HashMap<String, String>>,
}

impl Config {
    /// The config path to use: `IRONCHECK_CONFIG` when set, otherwise
    /// `ironcheck.yaml` in the working directory.
    #[must_use]
    pub fn default_path() -> PathBuf {
        std::env::var(CONFIG_PATH_VAR).map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;
        Self::parse(&contents)
            .map_err(|e| format!("Failed to parse config file {}: {e}", path.display()))
    }

    /// Parses configuration from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a two-level string mapping.
    pub fn parse(text: &str) -> Result<Self, String> {
        let sections = serde_yaml::from_str(text).map_err(|e| e.to_string())?;
        Ok(Self { sections })
    }

    /// Looks up `key` in `section`.
    ///
    /// # Errors
    ///
    /// Returns an error naming the section and key when either is absent.
    pub fn get(&self, section: &str, key: &str) -> Result<&str, String> {
        self.sections
            .get(section)
            .ok_or_else(|| format!("Config has no [{section}] section"))?
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| format!("Config section [{section}] has no key `{key}`"))
    }
}
