//! Shell and platform detection.

/// Shell assumed when `$SHELL` is unset or empty.
pub const DEFAULT_SHELL: &str = "/bin/zsh";

/// Resolve the user's shell from a `SHELL` value.
pub fn shell_from(value: Option<String>) -> String {
    value
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SHELL.to_string())
}

/// The user's shell according to the process environment.
pub fn current_shell() -> String {
    shell_from(std::env::var("SHELL").ok())
}
