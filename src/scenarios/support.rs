//! Shared harness for provisioning scenarios.
//!
//! Owns the cleanup list and wraps the executor, parser, and polling
//! helpers with the cloud-specific operations every scenario needs:
//! key pairs, instance boots, address lookup, and teardown.

use tracing::warn;
use uuid::Uuid;

use crate::cleanup::{cleanup_skipped, CleanupList};
use crate::client::CliClient;
use crate::config::Config;
use crate::context::Runtime;
use crate::parser::{parse_details, DetailRecord};
use crate::poll::{wait_for_status, PollConfig, WaitOutcome};

/// Attempt budget for SSH reachability retries. Freshly provisioned
/// nodes take a while to accept connections.
const SSH_ATTEMPTS: u32 = 10;

/// Name of the shared provisioning network both bare-metal and virtual
/// instances attach to.
const TFTP_NETWORK: &str = "tftp";

/// Parameters for booting one instance.
#[derive(Debug)]
pub struct BootRequest<'a> {
    /// Glance image name or ID.
    pub image: &'a str,
    /// Nova flavor name or ID.
    pub flavor: &'a str,
    /// Name of a registered key pair.
    pub keypair: &'a str,
    /// Server name.
    pub name: &'a str,
    /// Network ID to attach; resolved from the tftp network when absent.
    pub network: Option<&'a str>,
    /// Whether to block until the server reports ACTIVE.
    pub wait_for_active: bool,
}

/// Per-scenario state: runtime, config, cleanup list, and the
/// bare-metal hypervisor claimed by the scenario, if any.
pub struct Scenario<'a> {
    ctx: &'a Runtime,
    config: &'a Config,
    poll: PollConfig,
    /// Delete commands to drain at teardown.
    pub cleanup: CleanupList,
    /// Hostname of the bare-metal hypervisor this scenario provisioned
    /// onto; teardown waits for its node to become available again.
    pub hypervisor_id: Option<String>,
}

impl<'a> Scenario<'a> {
    /// Creates a scenario harness with the default polling budget.
    #[must_use]
    pub fn new(ctx: &'a Runtime, config: &'a Config) -> Self {
        Self {
            ctx,
            config,
            poll: PollConfig::default(),
            cleanup: CleanupList::new(),
            hypervisor_id: None,
        }
    }

    /// Overrides the polling budget, mainly for tests.
    #[must_use]
    pub fn with_poll_config(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// The scenario's command client.
    #[must_use]
    pub fn client(&self) -> CliClient<'a> {
        CliClient::new(self.ctx)
    }

    /// The environment configuration for this run.
    #[must_use]
    pub fn config(&self) -> &'a Config {
        self.config
    }

    /// A unique resource name with the given prefix.
    #[must_use]
    pub fn random_name(prefix: &str) -> String {
        let suffix = Uuid::new_v4().simple().to_string();
        format!("{prefix}{}", &suffix[..8])
    }

    /// Generates an SSH key pair under `/tmp` and registers it with
    /// nova, scheduling its deletion at teardown.
    ///
    /// Returns the key pair name; the private key lives at
    /// `/tmp/<name>`.
    ///
    /// # Errors
    ///
    /// Returns an error if key generation or registration fails.
    pub fn create_keypair(&mut self) -> Result<String, String> {
        let name = Self::random_name("testkey_");
        let client = self.client();
        client
            .execute(&format!("ssh-keygen -f /tmp/{name} -N ''"), false)
            .map_err(|e| format!("Failed to generate key pair {name}: {e}"))?;
        client
            .execute(&format!("nova keypair-add --pub-key /tmp/{name}.pub {name}"), false)
            .map_err(|e| format!("Failed to register key pair {name}: {e}"))?;
        self.cleanup.register(format!("nova keypair-delete {name}"));
        Ok(name)
    }

    /// Resolves the ID of the shared tftp provisioning network.
    ///
    /// # Errors
    ///
    /// Returns an error if the network cannot be shown or its table has
    /// no `id` field.
    pub fn tftp_network_id(&self) -> Result<String, String> {
        let text = self
            .client()
            .execute(&format!("neutron net-show {TFTP_NETWORK}"), false)
            .map_err(|e| format!("Failed to show {TFTP_NETWORK} network: {e}"))?;
        let record = parse_details(&text)
            .map_err(|e| format!("Failed to parse {TFTP_NETWORK} network details: {e}"))?;
        record
            .get("id")
            .cloned()
            .ok_or_else(|| format!("{TFTP_NETWORK} network details have no id field"))
    }

    /// Boots an instance and schedules its deletion at teardown.
    ///
    /// Returns the server's detail record; when `wait_for_active` is
    /// set, the record from the fetch that observed ACTIVE.
    ///
    /// # Errors
    ///
    /// Returns an error if the boot command fails, its output cannot be
    /// parsed, or the server goes to ERROR or times out while waiting.
    pub fn create_instance(&mut self, request: &BootRequest<'_>) -> Result<DetailRecord, String> {
        let network = match request.network {
            Some(id) => id.to_string(),
            None => self.tftp_network_id()?,
        };
        let cmd = format!(
            "nova boot --flavor {} --image '{}' --key-name {} \
             --security-group rpc-support,default --nic net-id={} {}",
            request.flavor, request.image, request.keypair, network, request.name
        );
        let text = self
            .client()
            .execute(&cmd, false)
            .map_err(|e| format!("Failed to boot {}: {e}", request.name))?;
        let server = parse_details(&text)
            .map_err(|e| format!("Failed to parse boot output for {}: {e}", request.name))?;
        let server_id = server
            .get("id")
            .cloned()
            .ok_or_else(|| format!("Boot output for {} has no id field", request.name))?;
        self.cleanup.register(format!("nova delete {server_id}"));

        if request.wait_for_active {
            return self.wait_active(&server_id);
        }
        Ok(server)
    }

    /// Waits for a server to report `status ACTIVE`.
    ///
    /// # Errors
    ///
    /// Returns an error when the server goes to ERROR, the wait times
    /// out, or a fetch fails.
    pub fn wait_active(&self, server_id: &str) -> Result<DetailRecord, String> {
        let show_cmd = format!("nova show {server_id}");
        let report = wait_for_status(self.ctx, &show_cmd, "status", "ACTIVE", &self.poll)
            .map_err(|e| format!("Failed while waiting on {server_id}: {e}"))?;
        match report.outcome {
            WaitOutcome::Succeeded => Ok(report.record),
            WaitOutcome::Failed => Err(format!(
                "Server {server_id} went to ERROR after {} fetch(es)",
                report.attempts
            )),
            WaitOutcome::TimedOut => Err(format!(
                "Server {server_id} not ACTIVE after {} fetch(es), last status {:?}",
                report.attempts,
                report.record.get("status")
            )),
        }
    }

    /// SSHes into `host` as `user` with the scenario key and runs
    /// `remote_cmd`, retrying while SSH comes up.
    ///
    /// # Errors
    ///
    /// Propagates the final failure once the retry budget is exhausted.
    pub fn ssh(
        &self,
        keypair: &str,
        user: &str,
        host: &str,
        remote_cmd: &str,
    ) -> Result<String, String> {
        let cmd = format!(
            "ssh -o StrictHostKeyChecking=no -i /tmp/{keypair} -t {user}@{host} {remote_cmd}"
        );
        self.client()
            .execute_with_retry(&cmd, SSH_ATTEMPTS, self.poll.delay)
            .map_err(|e| format!("Failed to run `{remote_cmd}` on {host}: {e}"))
    }

    /// Drains the cleanup list, then waits for any claimed bare-metal
    /// node to finish cleaning and report available again.
    ///
    /// Failures here are logged and swallowed so teardown never masks
    /// the scenario's result. Skipped entirely under `SKIP_CLEANUP`.
    pub fn teardown(self) {
        let skipped = cleanup_skipped();
        self.cleanup.drain(self.ctx);
        if skipped {
            return;
        }
        if let Some(node_id) = &self.hypervisor_id {
            let node_cmd = format!("ironic node-show {node_id}");
            match wait_for_status(self.ctx, &node_cmd, "provision_state", "available", &self.poll)
            {
                Ok(report) if report.outcome == WaitOutcome::Succeeded => {}
                Ok(report) => {
                    warn!(%node_id, outcome = ?report.outcome, "node did not return to available");
                }
                Err(err) => warn!(%node_id, "could not watch node cleaning: {err}"),
            }
        }
    }
}

/// Picks the SSH-able address out of a server's tftp network field.
///
/// The field lists addresses comma-separated; the usable one is the
/// entry with no alphabetic characters (a bare IPv4 address rather
/// than a hostname).
///
/// # Errors
///
/// Returns an error when the field is absent or holds no such address.
pub fn instance_ip(server: &DetailRecord) -> Result<String, String> {
    let addresses = server
        .get("tftp network")
        .ok_or_else(|| "Server details have no `tftp network` field".to_string())?;
    addresses
        .split(',')
        .map(str::trim)
        .find(|a| !a.is_empty() && !a.chars().any(|c| c.is_ascii_alphabetic()))
        .map(ToString::to_string)
        .ok_or_else(|| format!("No numeric address in `tftp network` field: {addresses}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::scripted::ScriptedRunner;
    use std::time::Duration;

    fn fast() -> PollConfig {
        PollConfig { max_attempts: 3, delay: Duration::ZERO }
    }

    fn sample_config() -> Config {
        Config::parse("ironic:\n  image: bm-img\n  flavor: bm.flavor\n  user: ubuntu\n").unwrap()
    }

    #[test]
    fn random_name_keeps_prefix_and_varies() {
        let a = Scenario::random_name("testkey_");
        let b = Scenario::random_name("testkey_");
        assert!(a.starts_with("testkey_"));
        assert_eq!(a.len(), "testkey_".len() + 8);
        assert_ne!(a, b);
    }

    #[test]
    fn instance_ip_picks_the_numeric_address() {
        let mut server = DetailRecord::new();
        server.insert("tftp network".into(), "host-10-0-0-5.example, 10.0.0.5".into());
        assert_eq!(instance_ip(&server).unwrap(), "10.0.0.5");
    }

    #[test]
    fn instance_ip_fails_without_numeric_address() {
        let mut server = DetailRecord::new();
        server.insert("tftp network".into(), "host-a.example, host-b.example".into());
        assert!(instance_ip(&server).is_err());
    }

    #[test]
    fn instance_ip_fails_without_network_field() {
        assert!(instance_ip(&DetailRecord::new()).is_err());
    }

    #[test]
    fn create_keypair_registers_deletion() {
        let runtime = Runtime::scripted(vec![
            ScriptedRunner::ok(""), // ssh-keygen
            ScriptedRunner::ok("| name | testkey_x |"),
        ]);
        let config = sample_config();
        let mut scenario = Scenario::new(&runtime, &config).with_poll_config(fast());

        let name = scenario.create_keypair().unwrap();
        assert!(name.starts_with("testkey_"));
        assert_eq!(scenario.cleanup.len(), 1);
    }

    #[test]
    fn create_instance_resolves_network_and_waits_for_active() {
        let runtime = Runtime::scripted(vec![
            ScriptedRunner::ok("| id | net-1 |"),                       // neutron net-show
            ScriptedRunner::ok("| id | srv-1 |\n| status | BUILD |"),   // nova boot
            ScriptedRunner::ok("| id | srv-1 |\n| status | BUILD |"),   // nova show
            ScriptedRunner::ok("| id | srv-1 |\n| status | ACTIVE |"),  // nova show
        ]);
        let config = sample_config();
        let mut scenario = Scenario::new(&runtime, &config).with_poll_config(fast());

        let request = BootRequest {
            image: "bm-img",
            flavor: "bm.flavor",
            keypair: "testkey_x",
            name: "test_srv",
            network: None,
            wait_for_active: true,
        };
        let server = scenario.create_instance(&request).unwrap();
        assert_eq!(server.get("status").map(String::as_str), Some("ACTIVE"));
        assert_eq!(scenario.cleanup.len(), 1);
    }

    #[test]
    fn create_instance_surfaces_error_state() {
        let runtime = Runtime::scripted(vec![
            ScriptedRunner::ok("| id | srv-1 |\n| status | BUILD |"),
            ScriptedRunner::ok("| id | srv-1 |\n| status | ERROR |"),
        ]);
        let config = sample_config();
        let mut scenario = Scenario::new(&runtime, &config).with_poll_config(fast());

        let request = BootRequest {
            image: "bm-img",
            flavor: "bm.flavor",
            keypair: "testkey_x",
            name: "test_srv",
            network: Some("net-1"),
            wait_for_active: true,
        };
        let err = scenario.create_instance(&request).unwrap_err();
        assert!(err.contains("ERROR"));
    }
}
