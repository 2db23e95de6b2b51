//! AI module for turning natural-language requests into shell commands.
//!
//! A [`CommandGenerator`] takes the user's request plus a [`SystemContext`] and
//! returns one command string. Backends are the hosted Anthropic and
//! OpenAI-compatible APIs and a local Ollama server; [`Provider`] picks one
//! from configuration.
//!
//! [`SystemContext`]: crate::context::SystemContext

pub mod anthropic;
pub mod client;
pub mod ollama;
pub mod openai;
pub mod parser;
pub mod prompt;

use std::time::Duration;

use async_openai::error::OpenAIError;
use thiserror::Error;

pub use anthropic::AnthropicClient;
pub use client::{CommandGenerator, Provider, generate_with_timeout};
pub use ollama::OllamaClient;
pub use openai::OpenAiClient;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("API request failed: {0}")]
    OpenAi(#[from] OpenAIError),

    #[error("API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("received empty response from the model")]
    EmptyResponse,

    #[error("command generation timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}
