//! Scripted adapters for deterministic tests.
//!
//! These never touch a real cloud: the runner replays canned outputs in
//! order and the sleeper records requested delays without blocking, so
//! polling tests finish instantly.

pub mod clock;
pub mod shell;

pub use clock::InstantSleeper;
pub use shell::ScriptedRunner;
