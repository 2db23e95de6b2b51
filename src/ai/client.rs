//! The generator capability and backend dispatch.
//!
//! [`Provider`] is the closed set of backends the binary can talk to; tests
//! plug in their own [`CommandGenerator`] implementations instead.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, info};

use super::{AiError, AnthropicClient, OllamaClient, OpenAiClient};
use crate::config::{Config, ProviderKind};
use crate::context::SystemContext;

/// Anything that can produce a shell command for a request.
pub trait CommandGenerator {
    fn generate_command(
        &self,
        query: &str,
        ctx: &SystemContext,
    ) -> impl Future<Output = Result<String, AiError>> + Send;
}

/// Backend selected by configuration.
pub enum Provider {
    Anthropic(AnthropicClient),
    OpenAi(OpenAiClient),
    Ollama(OllamaClient),
}

impl Provider {
    pub fn from_config(config: &Config) -> Self {
        info!(provider = %config.provider, model = config.model(), "Using model backend");
        match config.provider {
            ProviderKind::Anthropic => Provider::Anthropic(AnthropicClient::new(
                config.api_key().unwrap_or_default(),
                config.anthropic_base_url.as_str(),
                config.model(),
            )),
            ProviderKind::OpenAi => Provider::OpenAi(OpenAiClient::new(
                config.api_key().unwrap_or_default(),
                config.openai_base_url.as_deref(),
                config.model(),
            )),
            ProviderKind::Ollama => {
                Provider::Ollama(OllamaClient::new(&config.ollama_url, config.model()))
            }
        }
    }

    pub fn kind(&self) -> ProviderKind {
        match self {
            Provider::Anthropic(_) => ProviderKind::Anthropic,
            Provider::OpenAi(_) => ProviderKind::OpenAi,
            Provider::Ollama(_) => ProviderKind::Ollama,
        }
    }
}

impl CommandGenerator for Provider {
    async fn generate_command(&self, query: &str, ctx: &SystemContext) -> Result<String, AiError> {
        match self {
            Provider::Anthropic(client) => client.generate_command(query, ctx).await,
            Provider::OpenAi(client) => client.generate_command(query, ctx).await,
            Provider::Ollama(client) => client.generate_command(query, ctx).await,
        }
    }
}

/// Run `generator` with an upper bound on how long the model may take.
pub async fn generate_with_timeout<G: CommandGenerator>(
    generator: &G,
    query: &str,
    ctx: &SystemContext,
    timeout: Duration,
) -> Result<String, AiError> {
    debug!(?timeout, "Requesting command");
    match tokio::time::timeout(timeout, generator.generate_command(query, ctx)).await {
        Ok(result) => result,
        Err(_) => Err(AiError::Timeout(timeout)),
    }
}
