//! Support library for the `vecfix` binary.
//!
//! Exposes the command pipeline and logging setup so tests can drive the CLI
//! without spawning a subprocess.

pub mod cli;
pub mod logging;
