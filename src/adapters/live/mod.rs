//! Live adapters backed by the real system.

pub mod clock;
pub mod shell;

pub use clock::ThreadSleeper;
pub use shell::SystemRunner;
