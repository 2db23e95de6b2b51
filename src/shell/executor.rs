//! Shell subprocess execution of approved commands.
//!
//! Commands run as `<shell> -c <command>` with the caller's environment and
//! stdin. Stdout and stderr are collected into one buffer in the order the
//! bytes arrive.

use std::io;
use std::process::{ExitStatus, Stdio};

use thiserror::Error;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::{error, info};

use crate::context::DEFAULT_SHELL;
use crate::security::{ApprovedCommand, DangerPatterns, Verdict, classify};

// Per-read chunk size for the output pipes
const READ_BUFFER: usize = 8192;

#[derive(Debug, Error)]
pub enum ExecError {
    /// A flagged command arrived without passing the strict confirmation.
    #[error("refused to execute unsafe command: {reason}")]
    RefusedUnsafe { reason: String },

    #[error("failed to start {shell}: {source}")]
    Spawn {
        shell: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to collect command output: {0}")]
    Io(#[from] io::Error),

    /// The command ran and exited unsuccessfully. `output` holds the raw
    /// bytes it printed.
    #[error("command execution failed: {status}")]
    Failed { status: ExitStatus, output: Vec<u8> },
}

impl ExecError {
    /// Output captured before the failure, if any.
    pub fn output(&self) -> Option<&[u8]> {
        match self {
            ExecError::Failed { output, .. } if !output.is_empty() => Some(output.as_slice()),
            _ => None,
        }
    }
}

pub struct ShellExecutor {
    patterns: DangerPatterns,
    shell: String,
}

impl ShellExecutor {
    /// An empty `shell` falls back to [`DEFAULT_SHELL`].
    pub fn new(patterns: DangerPatterns, shell: impl Into<String>) -> Self {
        let shell = shell.into();
        let shell = if shell.trim().is_empty() {
            DEFAULT_SHELL.to_string()
        } else {
            shell
        };
        Self { patterns, shell }
    }

    pub fn shell(&self) -> &str {
        &self.shell
    }

    /// Run an approved command and return its combined output, byte for byte.
    pub async fn execute(&self, approved: &ApprovedCommand) -> Result<Vec<u8>, ExecError> {
        let command = approved.command();

        // Last line of defense: the gate must have seen the same verdict.
        if let Verdict::Dangerous { reason } = classify(command, &self.patterns) {
            if !approved.strict_confirmed() {
                error!(%reason, "Refusing flagged command without strict confirmation");
                return Err(ExecError::RefusedUnsafe { reason });
            }
        }

        info!(shell = %self.shell, "Executing approved command");
        let mut child = Command::new(&self.shell)
            .arg("-c")
            .arg(command)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ExecError::Spawn {
                shell: self.shell.clone(),
                source,
            })?;

        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("stdout was not captured"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| io::Error::other("stderr was not captured"))?;

        let mut combined = Vec::new();
        let mut out_buf = [0u8; READ_BUFFER];
        let mut err_buf = [0u8; READ_BUFFER];
        let (mut out_open, mut err_open) = (true, true);

        while out_open || err_open {
            tokio::select! {
                read = stdout.read(&mut out_buf), if out_open => match read? {
                    0 => out_open = false,
                    n => combined.extend_from_slice(&out_buf[..n]),
                },
                read = stderr.read(&mut err_buf), if err_open => match read? {
                    0 => err_open = false,
                    n => combined.extend_from_slice(&err_buf[..n]),
                },
            }
        }

        let status = child.wait().await?;

        if status.success() {
            info!(bytes = combined.len(), "Command finished");
            Ok(combined)
        } else {
            error!(%status, "Command failed");
            Err(ExecError::Failed {
                status,
                output: combined,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::{ConfirmationGate, GateOutcome};
    use crate::ui::Display;

    fn approve(command: &str, patterns: &DangerPatterns, answers: &str) -> ApprovedCommand {
        let mut display = Display::with_writers(Vec::new(), Vec::new());
        match ConfirmationGate::new(patterns, answers.as_bytes(), &mut display).run(command) {
            GateOutcome::Proceed(approved) => approved,
            GateOutcome::Cancelled(cause) => panic!("Gate cancelled: {:?}", cause),
        }
    }

    fn sh(patterns: DangerPatterns) -> ShellExecutor {
        ShellExecutor::new(patterns, "/bin/sh")
    }

    #[tokio::test]
    async fn test_execute_safe_command() {
        let patterns = DangerPatterns::default();
        let approved = approve("echo hello", &patterns, "\n");
        let output = sh(patterns).execute(&approved).await.unwrap();
        assert_eq!(output, b"hello\n");
    }

    #[tokio::test]
    async fn test_non_utf8_output_is_kept_verbatim() {
        let patterns = DangerPatterns::default();
        let approved = approve(r"printf '\377\376ok'", &patterns, "\n");
        let output = sh(patterns).execute(&approved).await.unwrap();
        assert_eq!(output, [0xff, 0xfe, b'o', b'k']);
    }

    #[tokio::test]
    async fn test_stdout_and_stderr_are_combined() {
        let patterns = DangerPatterns::default();
        let approved = approve("echo out; echo err 1>&2", &patterns, "y\n");
        let output = String::from_utf8(sh(patterns).execute(&approved).await.unwrap()).unwrap();
        assert!(output.contains("out\n"));
        assert!(output.contains("err\n"));
    }

    #[tokio::test]
    async fn test_failed_command_keeps_output() {
        let patterns = DangerPatterns::default();
        let approved = approve("echo partial; exit 3", &patterns, "\n");
        let err = sh(patterns).execute(&approved).await.unwrap_err();
        match &err {
            ExecError::Failed { status, output } => {
                assert_eq!(status.code(), Some(3));
                assert_eq!(output, b"partial\n");
            }
            other => panic!("Expected Failed, got {:?}", other),
        }
        assert_eq!(err.output(), Some(&b"partial\n"[..]));
        assert!(err.to_string().starts_with("command execution failed"));
    }

    #[tokio::test]
    async fn test_refuses_flagged_command_without_strict_confirmation() {
        // Approved by a gate that knew no patterns.
        let approved = approve("echo hi | sh", &DangerPatterns::empty(), "\n");
        assert!(!approved.strict_confirmed());

        let err = sh(DangerPatterns::default()).execute(&approved).await.unwrap_err();
        match err {
            ExecError::RefusedUnsafe { reason } => assert!(reason.contains("| sh")),
            other => panic!("Expected RefusedUnsafe, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_runs_flagged_command_after_strict_confirmation() {
        let patterns = DangerPatterns::new(["echo danger"]);
        let approved = approve("echo danger", &patterns, "yes\n\n");
        let output = sh(patterns).execute(&approved).await.unwrap();
        assert_eq!(output, b"danger\n");
    }

    #[tokio::test]
    async fn test_missing_shell() {
        let patterns = DangerPatterns::default();
        let approved = approve("echo hi", &patterns, "\n");
        let executor = ShellExecutor::new(patterns, "/nonexistent/shell");
        let err = executor.execute(&approved).await.unwrap_err();
        assert!(matches!(err, ExecError::Spawn { .. }));
    }

    #[test]
    fn test_empty_shell_falls_back() {
        let executor = ShellExecutor::new(DangerPatterns::default(), "");
        assert_eq!(executor.shell(), DEFAULT_SHELL);
    }
}
