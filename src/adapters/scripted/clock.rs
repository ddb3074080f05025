//! Scripted sleeper that records delays instead of blocking.

use std::sync::Mutex;
use std::time::Duration;

use crate::ports::clock::Sleeper;

/// Sleeper that returns immediately, remembering each requested delay.
#[derive(Default)]
pub struct InstantSleeper {
    slept: Mutex<Vec<Duration>>,
}

impl InstantSleeper {
    /// Creates a sleeper with an empty delay log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The delays requested so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn delays(&self) -> Vec<Duration> {
        self.slept.lock().unwrap().clone()
    }
}

impl Sleeper for InstantSleeper {
    fn sleep(&self, duration: Duration) {
        self.slept.lock().unwrap().push(duration);
    }
}
