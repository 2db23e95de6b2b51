//! Confirmation gate between command generation and execution.
//!
//! The gate is a small state machine:
//!
//! ```text
//! Start -> DangerCheck -> [StrictConfirm] -> StandardConfirm -> Proceed | Cancelled
//! ```
//!
//! `StrictConfirm` is only entered for commands the classifier flags, and only
//! the literal answer `yes` gets past it. `StandardConfirm` always runs and
//! defaults to yes on a bare Enter. Every read failure cancels.
//!
//! The only way to obtain an [`ApprovedCommand`] is to reach `Proceed`.

use std::io::{self, BufRead, Write};

use thiserror::Error;
use tracing::{info, warn};

use super::{DangerPatterns, Verdict, classify};
use crate::ui::Display;

/// Failure to obtain an answer from the operator.
#[derive(Debug, Error)]
pub enum InputError {
    /// The input was closed before a complete line arrived.
    #[error("end of input")]
    EndOfInput,

    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),
}

/// Line-based, blocking source of operator answers.
pub trait LineSource {
    /// Block until a full newline-terminated line is available.
    ///
    /// The returned line excludes the terminator. A closed stream, including
    /// one that ends in the middle of a line, is [`InputError::EndOfInput`].
    fn next_line(&mut self) -> Result<String, InputError>;
}

impl<R: BufRead> LineSource for R {
    fn next_line(&mut self) -> Result<String, InputError> {
        let mut line = String::new();
        if self.read_line(&mut line)? == 0 {
            return Err(InputError::EndOfInput);
        }
        match line.strip_suffix('\n') {
            Some(complete) => Ok(complete.to_string()),
            None => Err(InputError::EndOfInput),
        }
    }
}

/// Outcome of a single prompt.
#[derive(Debug)]
pub enum PromptDecision {
    Proceed,
    Decline,
    InputFailure(InputError),
}

/// Why the gate refused to let a command through.
#[derive(Debug)]
pub enum CancelCause {
    Declined,
    InputFailure(InputError),
}

/// States of the confirmation gate.
#[derive(Debug)]
pub enum GateState {
    Start,
    DangerCheck,
    StrictConfirm { reason: String },
    StandardConfirm { strict_confirmed: bool },
    Proceed { strict_confirmed: bool },
    Cancelled(CancelCause),
}

impl GateState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GateState::Proceed { .. } | GateState::Cancelled(_))
    }
}

/// A command the operator agreed to run.
///
/// Only [`ConfirmationGate::run`] constructs this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovedCommand {
    command: String,
    strict_confirmed: bool,
}

impl ApprovedCommand {
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Whether the operator answered `yes` at the strict prompt.
    pub fn strict_confirmed(&self) -> bool {
        self.strict_confirmed
    }
}

/// Terminal result of one pass through the gate.
#[derive(Debug)]
pub enum GateOutcome {
    Proceed(ApprovedCommand),
    Cancelled(CancelCause),
}

impl GateOutcome {
    pub fn is_proceed(&self) -> bool {
        matches!(self, GateOutcome::Proceed(_))
    }
}

pub struct ConfirmationGate<'a, I, W: Write, E: Write> {
    patterns: &'a DangerPatterns,
    input: I,
    display: &'a mut Display<W, E>,
}

impl<'a, I, W, E> ConfirmationGate<'a, I, W, E>
where
    I: LineSource,
    W: Write,
    E: Write,
{
    pub fn new(patterns: &'a DangerPatterns, input: I, display: &'a mut Display<W, E>) -> Self {
        Self {
            patterns,
            input,
            display,
        }
    }

    /// Drive the state machine for `command` until it reaches a terminal state.
    pub fn run(mut self, command: &str) -> GateOutcome {
        let mut state = GateState::Start;
        loop {
            state = match self.step(state, command) {
                GateState::Proceed { strict_confirmed } => {
                    info!(strict_confirmed, "Command approved for execution");
                    return GateOutcome::Proceed(ApprovedCommand {
                        command: command.to_string(),
                        strict_confirmed,
                    });
                }
                GateState::Cancelled(cause) => {
                    match &cause {
                        CancelCause::Declined => info!("Command declined by user"),
                        CancelCause::InputFailure(e) => warn!("Confirmation input failed: {}", e),
                    }
                    return GateOutcome::Cancelled(cause);
                }
                next => next,
            };
        }
    }

    /// Advance by one transition. Terminal states map to themselves.
    pub fn step(&mut self, state: GateState, command: &str) -> GateState {
        match state {
            GateState::Start => GateState::DangerCheck,
            GateState::DangerCheck => match classify(command, self.patterns) {
                Verdict::Safe => GateState::StandardConfirm {
                    strict_confirmed: false,
                },
                Verdict::Dangerous { reason } => {
                    warn!(%reason, "Dangerous command detected");
                    GateState::StrictConfirm { reason }
                }
            },
            GateState::StrictConfirm { reason } => match self.confirm_strict(&reason) {
                PromptDecision::Proceed => GateState::StandardConfirm {
                    strict_confirmed: true,
                },
                PromptDecision::Decline => GateState::Cancelled(CancelCause::Declined),
                PromptDecision::InputFailure(e) => GateState::Cancelled(CancelCause::InputFailure(e)),
            },
            GateState::StandardConfirm { strict_confirmed } => match self.confirm_standard() {
                PromptDecision::Proceed => GateState::Proceed { strict_confirmed },
                PromptDecision::Decline => GateState::Cancelled(CancelCause::Declined),
                PromptDecision::InputFailure(e) => GateState::Cancelled(CancelCause::InputFailure(e)),
            },
            terminal @ (GateState::Proceed { .. } | GateState::Cancelled(_)) => terminal,
        }
    }

    fn confirm_strict(&mut self, reason: &str) -> PromptDecision {
        if let Err(e) = self.display.show_danger_warning(reason) {
            return PromptDecision::InputFailure(e.into());
        }
        match self.input.next_line() {
            Ok(line) if normalize(&line) == "yes" => PromptDecision::Proceed,
            Ok(_) => PromptDecision::Decline,
            Err(e) => PromptDecision::InputFailure(e),
        }
    }

    fn confirm_standard(&mut self) -> PromptDecision {
        if let Err(e) = self.display.prompt_execute() {
            return PromptDecision::InputFailure(e.into());
        }
        match self.input.next_line() {
            Ok(line) => match normalize(&line).as_str() {
                "" | "y" | "yes" => PromptDecision::Proceed,
                _ => PromptDecision::Decline,
            },
            Err(e) => PromptDecision::InputFailure(e),
        }
    }
}

fn normalize(answer: &str) -> String {
    answer.trim().to_lowercase()
}
