//! Sleeper port for fixed-interval polling delays.

use std::time::Duration;

/// Blocks the caller for a requested duration.
///
/// Abstracting the delay lets polling tests run instantly by
/// substituting a sleeper that only records the requested durations.
pub trait Sleeper: Send + Sync {
    /// Blocks for the given duration.
    fn sleep(&self, duration: Duration);
}

impl<T: Sleeper + ?Sized> Sleeper for std::sync::Arc<T> {
    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration);
    }
}
