//! System context collection for command generation.
//!
//! The model gets a small picture of where the command will run: working
//! directory, a few visible file names, the user's shell, and the platform.

mod cwd;
mod env;
mod files;

use std::io;
use std::path::Path;

use thiserror::Error;
use tracing::warn;

pub use cwd::CurrentDir;
pub use env::{DEFAULT_SHELL, current_shell, shell_from};
pub use files::visible_entries;

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("failed to determine working directory: {0}")]
    WorkingDir(#[from] io::Error),
}

/// Snapshot of the environment the generated command will run in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SystemContext {
    pub working_dir: String,
    pub files: Vec<String>,
    pub shell: String,
    pub os: String,
    pub arch: String,
}

/// Source of [`SystemContext`] snapshots.
pub trait Collector {
    fn collect(&self) -> Result<SystemContext, ContextError>;
}

/// Collects context from the running process.
#[derive(Debug, Clone)]
pub struct DefaultCollector {
    max_files: usize,
}

impl DefaultCollector {
    pub fn new(max_files: usize) -> Self {
        Self { max_files }
    }
}

impl Collector for DefaultCollector {
    fn collect(&self) -> Result<SystemContext, ContextError> {
        let cwd = CurrentDir::capture()?;

        // A failed listing only costs the model some context.
        let files = visible_entries(Path::new(&cwd.path), self.max_files).unwrap_or_else(|e| {
            warn!("Failed to list {}: {}", cwd.path, e);
            Vec::new()
        });

        Ok(SystemContext {
            working_dir: cwd.path,
            files,
            shell: current_shell(),
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
        })
    }
}
