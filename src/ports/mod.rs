//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the harness core and an
//! external system (subprocesses, wall-clock delay). Implementations
//! live in `src/adapters/`.

pub mod clock;
pub mod shell;

pub use clock::Sleeper;
pub use shell::{CommandOutput, CommandRunner};
