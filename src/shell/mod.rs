//! Shell execution module.
//!
//! Runs commands that made it through the confirmation gate and captures
//! their output.

mod executor;

pub use executor::{ExecError, ShellExecutor};
