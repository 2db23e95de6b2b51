//! Main entry point for zchat.
//!
//! Parses the request from the command line, loads configuration, and hands
//! off to [`App`] with the real terminal.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;

use zchat::app::{App, RunOutcome};
use zchat::config::{self, ConfigOverrides, ProviderKind};
use zchat::ui::Display;
use zchat::utils;

const AFTER_HELP: &str = "\
Options must come before the request. Everything from the first word of the
request onward, including anything that looks like an option, is sent to the
model as part of the request.

Examples:
  zchat list the number of lines in analysis_data.csv
  zchat find all python files modified in the last week
  zchat show disk usage sorted by size

Configuration:
  Default provider: ollama (local), model qwen2.5-coder:7b

  To use Anthropic instead:
    Set ANTHROPIC_API_KEY and ZCHAT_PROVIDER=anthropic

  To use OpenAI instead:
    Set OPENAI_API_KEY and ZCHAT_PROVIDER=openai

  Or create ~/.config/zchat/config.yaml with:
    provider: ollama  # or anthropic, openai
    model: qwen2.5-coder:7b
    ollama_url: http://localhost:11434";

#[derive(Debug, Parser)]
#[command(name = "zchat", version, about = "Turn a request into a shell command, confirm it, run it", after_help = AFTER_HELP)]
struct Cli {
    /// Model backend: anthropic, openai or ollama
    #[arg(long)]
    provider: Option<ProviderKind>,

    /// Model name passed to the backend
    #[arg(long)]
    model: Option<String>,

    /// Read configuration from this file instead of ~/.config/zchat/config.yaml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// What you want to do, in plain words
    #[arg(required = true, trailing_var_arg = true, num_args = 1..)]
    query: Vec<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = utils::logger::init_logging();

    match run(cli).await {
        Ok(outcome) => outcome.exit_code(),
        Err(e) => {
            error!("{:#}", e);
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<RunOutcome> {
    let query = cli.query.join(" ");

    let config = config::load(&ConfigOverrides {
        config_path: cli.config,
        provider: cli.provider,
        model: cli.model,
    })
    .context("Error loading config")?;

    let app = App::from_config(&config)?;
    let mut display = Display::new();
    let stdin = std::io::stdin();

    app.run(&query, stdin.lock(), &mut display).await
}
