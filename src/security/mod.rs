//! Security module for screening and confirming generated commands.
//!
//! Generated commands are untrusted. This module classifies them against the
//! configured dangerous patterns and runs the interactive confirmation gate
//! that decides whether they may reach the executor.

mod classifier;
pub mod gate;
mod patterns;

pub use classifier::{Verdict, classify};
pub use gate::{
    ApprovedCommand, CancelCause, ConfirmationGate, GateOutcome, GateState, InputError,
    LineSource, PromptDecision,
};
pub use patterns::{DEFAULT_DANGEROUS_PATTERNS, DangerPatterns};
