//! Live sleeper using the current thread.

use std::time::Duration;

use crate::ports::clock::Sleeper;

/// Sleeper that really blocks the calling thread.
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
