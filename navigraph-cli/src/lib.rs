//! Support library for the navigraph CLI binary.
//!
//! Exposes the command and logging modules so tests can drive commands
//! without spawning a subprocess.

pub mod cli;
pub mod logging;
