//! Parser module for cleaning up model responses.
//!
//! Models are told to answer with a bare command, but they still wrap it in
//! markdown fences or backticks from time to time. This module strips that
//! decoration and leaves the command text.

use super::AiError;

/// Extract the command from a raw model response.
///
/// Handles:
/// - surrounding whitespace
/// - a fenced code block, with or without a language tag (```` ```bash ````)
/// - backticks wrapping the whole command
pub fn parse_command_from_response(response: &str) -> Result<String, AiError> {
    let trimmed = response.trim();
    let body = if trimmed.starts_with("```") && trimmed.contains('\n') {
        strip_code_fence(trimmed)
    } else {
        trimmed.to_string()
    };

    let mut command = body.trim();
    if command.starts_with('`') && command.ends_with('`') {
        command = command.trim_matches('`').trim();
    }

    if command.is_empty() {
        return Err(AiError::EmptyResponse);
    }
    Ok(command.to_string())
}

/// Body of the first fenced block: everything after the opening fence line and
/// before the closing fence (or the end of the text if it is never closed).
fn strip_code_fence(response: &str) -> String {
    response
        .lines()
        .skip(1)
        .take_while(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
}
