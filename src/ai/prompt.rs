//! Prompt building for command generation.
//!
//! The system prompt pins the model to a single bare command and describes the
//! machine it will run on.

use crate::context::SystemContext;

/// Build the system prompt for `ctx`.
pub fn build_system_prompt(ctx: &SystemContext) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "You are a command-line expert assistant. Generate a single shell command that accomplishes the user's goal.\n\n",
    );
    prompt.push_str("CRITICAL RULES:\n");
    prompt.push_str("- Output ONLY the command itself, nothing else\n");
    prompt.push_str("- No explanations, no markdown, no code blocks, no backticks\n");
    prompt.push_str("- The command will be executed directly in the shell\n");
    prompt.push_str("- Make sure the command is safe and correct\n\n");

    prompt.push_str("SYSTEM CONTEXT:\n");
    prompt.push_str(&format!("- Operating System: {}\n", ctx.os));
    prompt.push_str(&format!("- Architecture: {}\n", ctx.arch));
    prompt.push_str(&format!("- Shell: {}\n", ctx.shell));
    prompt.push_str(&format!("- Current Directory: {}\n", ctx.working_dir));

    if ctx.files.is_empty() {
        prompt.push_str("- Available Files: (none visible)\n");
    } else {
        prompt.push_str(&format!("- Available Files: {}\n", ctx.files.join(", ")));
    }

    prompt.push_str("\nGenerate the appropriate command for the user's request.");
    prompt
}

/// Single-string prompt for backends without a separate system role.
pub fn build_combined_prompt(query: &str, ctx: &SystemContext) -> String {
    format!("{}\n\nUser request: {}", build_system_prompt(ctx), query)
}
