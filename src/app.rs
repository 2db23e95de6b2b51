//! Application flow for a single request.
//!
//! Generate a command, show it, pass it through the confirmation gate, and run
//! it if the gate lets it through. The binary builds an [`App`] once and calls
//! [`App::run`] with the real terminal; tests drive the same flow with scripted
//! input and in-memory sinks.

use std::io::Write;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use crate::ai::{CommandGenerator, Provider, generate_with_timeout};
use crate::config::Config;
use crate::context::{Collector, DefaultCollector, SystemContext};
use crate::security::{ConfirmationGate, DangerPatterns, GateOutcome, LineSource};
use crate::shell::ShellExecutor;
use crate::ui::Display;

/// How a request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The command ran and exited successfully.
    Executed,
    /// The user declined, or no answer could be read.
    Cancelled,
    /// The command could not run or exited unsuccessfully.
    Failed,
}

impl RunOutcome {
    /// Declining is not an error, so `Cancelled` exits with success.
    pub fn exit_code(self) -> ExitCode {
        match self {
            RunOutcome::Executed | RunOutcome::Cancelled => ExitCode::SUCCESS,
            RunOutcome::Failed => ExitCode::FAILURE,
        }
    }
}

pub struct App<G = Provider> {
    generator: G,
    context: SystemContext,
    patterns: DangerPatterns,
    timeout: Duration,
}

impl App<Provider> {
    /// Collect the system context and pick the backend named in `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let context = DefaultCollector::new(config.max_context_lines)
            .collect()
            .context("Error collecting context")?;
        Ok(Self::new(Provider::from_config(config), context, config))
    }
}

impl<G: CommandGenerator> App<G> {
    pub fn new(generator: G, context: SystemContext, config: &Config) -> Self {
        Self {
            generator,
            context,
            patterns: config.dangerous_patterns.clone(),
            timeout: config.request_timeout(),
        }
    }

    /// Handle one natural-language request end to end.
    ///
    /// Errors are returned only for failures before the command is shown
    /// (generation) or when the terminal itself cannot be written.
    pub async fn run<I, W, E>(
        &self,
        query: &str,
        input: I,
        display: &mut Display<W, E>,
    ) -> Result<RunOutcome>
    where
        I: LineSource,
        W: Write,
        E: Write,
    {
        info!(query, "Generating command");
        let command = generate_with_timeout(&self.generator, query, &self.context, self.timeout)
            .await
            .context("Error generating command")?;

        display.show_command(&command)?;

        let approved = match ConfirmationGate::new(&self.patterns, input, display).run(&command) {
            GateOutcome::Proceed(approved) => approved,
            GateOutcome::Cancelled(_) => {
                display.show_cancelled()?;
                return Ok(RunOutcome::Cancelled);
            }
        };

        let executor = ShellExecutor::new(self.patterns.clone(), self.context.shell.as_str());
        match executor.execute(&approved).await {
            Ok(output) => {
                display.show_output(&output)?;
                Ok(RunOutcome::Executed)
            }
            Err(e) => {
                display.show_error(&e)?;
                // Whatever the command printed usually explains the failure.
                if let Some(output) = e.output() {
                    display.show_output(output)?;
                    if !output.ends_with(b"\n") {
                        display.show_output(b"\n")?;
                    }
                }
                Ok(RunOutcome::Failed)
            }
        }
    }
}
