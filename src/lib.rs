//! zchat - natural-language requests turned into confirmed shell commands
//!
//! This library provides the pieces of the `zchat` binary:
//! - Command generation through a hosted or local model backend
//! - System context collection (working directory, files, shell, platform)
//! - Danger classification and the interactive confirmation gate
//! - Shell execution of approved commands
//!
//! # Example
//!
//! ```no_run
//! use zchat::app::App;
//! use zchat::config::{self, ConfigOverrides};
//! use zchat::ui::Display;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = config::load(&ConfigOverrides::default())?;
//!     let app = App::from_config(&config)?;
//!
//!     let mut display = Display::new();
//!     let stdin = std::io::stdin();
//!     let outcome = app.run("list all files", stdin.lock(), &mut display).await?;
//!     println!("{:?}", outcome);
//!     Ok(())
//! }
//! ```

pub mod ai;
pub mod app;
pub mod config;
pub mod context;
pub mod security;
pub mod shell;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use ai::{AiError, CommandGenerator, Provider};
pub use app::{App, RunOutcome};
pub use config::{Config, ConfigOverrides, ProviderKind};
pub use context::{Collector, DefaultCollector, SystemContext};
pub use security::{ApprovedCommand, ConfirmationGate, DangerPatterns, GateOutcome, Verdict, classify};
pub use shell::{ExecError, ShellExecutor};
