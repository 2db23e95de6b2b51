//! Full request flow with a scripted generator and in-memory terminal.

use std::time::Duration;

use zchat::ai::{AiError, CommandGenerator};
use zchat::app::{App, RunOutcome};
use zchat::config::Config;
use zchat::context::SystemContext;
use zchat::security::DangerPatterns;
use zchat::ui::Display;

struct Scripted(String);

impl CommandGenerator for Scripted {
    async fn generate_command(&self, _query: &str, _ctx: &SystemContext) -> Result<String, AiError> {
        Ok(self.0.clone())
    }
}

struct Broken;

impl CommandGenerator for Broken {
    async fn generate_command(&self, _query: &str, _ctx: &SystemContext) -> Result<String, AiError> {
        Err(AiError::EmptyResponse)
    }
}

struct Slow;

impl CommandGenerator for Slow {
    async fn generate_command(&self, _query: &str, _ctx: &SystemContext) -> Result<String, AiError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok("ls".to_string())
    }
}

fn context() -> SystemContext {
    SystemContext {
        working_dir: "/tmp".to_string(),
        files: vec![],
        shell: "/bin/sh".to_string(),
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
    }
}

fn config(patterns: DangerPatterns) -> Config {
    Config {
        dangerous_patterns: patterns,
        ..Config::default()
    }
}

async fn run<G: CommandGenerator>(
    app: &App<G>,
    answers: &str,
) -> (anyhow::Result<RunOutcome>, String, String) {
    let mut display = Display::with_writers(Vec::new(), Vec::new());
    let outcome = app.run("do something", answers.as_bytes(), &mut display).await;
    let (out, err) = display.into_writers();
    (
        outcome,
        String::from_utf8(out).unwrap(),
        String::from_utf8(err).unwrap(),
    )
}

#[tokio::test]
async fn safe_command_runs_and_prints_output() {
    let app = App::new(
        Scripted("echo hello".to_string()),
        context(),
        &config(DangerPatterns::default()),
    );
    let (outcome, out, _) = run(&app, "\n").await;
    assert_eq!(outcome.unwrap(), RunOutcome::Executed);
    assert!(out.contains("echo hello"));
    assert!(out.ends_with("hello\n"));
}

#[tokio::test]
async fn declined_dangerous_command_never_runs() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("marker");
    let command = format!("touch {}", marker.display());

    let app = App::new(
        Scripted(command),
        context(),
        &config(DangerPatterns::new(["touch"])),
    );
    let (outcome, out, _) = run(&app, "y\n").await;

    let outcome = outcome.unwrap();
    assert_eq!(outcome, RunOutcome::Cancelled);
    assert_eq!(outcome.exit_code(), std::process::ExitCode::SUCCESS);
    assert!(out.contains("WARNING"));
    assert!(out.contains("Command execution cancelled."));
    assert!(!marker.exists());
}

#[tokio::test]
async fn closed_input_cancels_with_success() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("marker");
    let command = format!("touch {}", marker.display());

    let app = App::new(Scripted(command), context(), &config(DangerPatterns::default()));
    let (outcome, out, err) = run(&app, "").await;

    let outcome = outcome.unwrap();
    assert_eq!(outcome, RunOutcome::Cancelled);
    assert_eq!(outcome.exit_code(), std::process::ExitCode::SUCCESS);
    assert!(out.contains("Execute? [Y/n]: "));
    assert!(out.ends_with("Command execution cancelled.\n"));
    assert!(err.is_empty());
    assert!(!marker.exists());
}

#[tokio::test]
async fn binary_output_reaches_terminal_unchanged() {
    let app = App::new(
        Scripted(r"printf '\377\376ok'".to_string()),
        context(),
        &config(DangerPatterns::default()),
    );
    let mut display = Display::with_writers(Vec::new(), Vec::new());
    let outcome = app.run("print bytes", "\n".as_bytes(), &mut display).await;
    assert_eq!(outcome.unwrap(), RunOutcome::Executed);

    let (out, _) = display.into_writers();
    assert!(out.ends_with(b"\xff\xfeok"));
}

#[tokio::test]
async fn confirmed_dangerous_command_runs() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("marker");
    let command = format!("touch {}", marker.display());

    let app = App::new(
        Scripted(command),
        context(),
        &config(DangerPatterns::new(["touch"])),
    );
    let (outcome, _, _) = run(&app, "yes\n\n").await;
    assert_eq!(outcome.unwrap(), RunOutcome::Executed);
    assert!(marker.exists());
}

#[tokio::test]
async fn failing_command_reports_error_and_output() {
    let app = App::new(
        Scripted("echo oops; exit 2".to_string()),
        context(),
        &config(DangerPatterns::default()),
    );
    let (outcome, out, err) = run(&app, "\n").await;
    let outcome = outcome.unwrap();
    assert_eq!(outcome, RunOutcome::Failed);
    assert_eq!(outcome.exit_code(), std::process::ExitCode::FAILURE);
    assert!(err.contains("command execution failed"));
    assert!(out.ends_with("oops\n"));
}

#[tokio::test]
async fn generation_error_is_returned() {
    let app = App::new(Broken, context(), &config(DangerPatterns::default()));
    let (outcome, out, _) = run(&app, "\n").await;
    let err = outcome.unwrap_err();
    assert!(format!("{:#}", err).contains("Error generating command"));
    assert!(out.is_empty());
}

#[tokio::test]
async fn generation_is_bounded_by_timeout() {
    let config = Config {
        request_timeout_secs: 1,
        ..Config::default()
    };
    let app = App::new(Slow, context(), &config);
    let (outcome, _, _) = run(&app, "\n").await;
    let err = outcome.unwrap_err();
    assert!(format!("{:#}", err).contains("timed out"));
}
