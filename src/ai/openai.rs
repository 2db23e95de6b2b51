//! Hosted backend speaking the OpenAI chat completions API.

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use tracing::debug;

use super::parser::parse_command_from_response;
use super::prompt::build_system_prompt;
use super::{AiError, CommandGenerator};
use crate::context::SystemContext;

const MAX_COMPLETION_TOKENS: u32 = 1024;

pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiClient {
    /// `base_url` points the client at an OpenAI-compatible server instead of
    /// api.openai.com.
    pub fn new(api_key: &str, base_url: Option<&str>, model: impl Into<String>) -> Self {
        let mut config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(url) = base_url {
            config = config.with_api_base(url);
        }
        Self {
            client: Client::with_config(config),
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl CommandGenerator for OpenAiClient {
    async fn generate_command(&self, query: &str, ctx: &SystemContext) -> Result<String, AiError> {
        let system = ChatCompletionRequestSystemMessageArgs::default()
            .content(build_system_prompt(ctx))
            .build()?;
        let user = ChatCompletionRequestUserMessageArgs::default()
            .content(query)
            .build()?;
        let messages: Vec<ChatCompletionRequestMessage> = vec![system.into(), user.into()];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .max_completion_tokens(MAX_COMPLETION_TOKENS)
            .messages(messages)
            .build()?;

        let response = self.client.chat().create(request).await?;
        debug!(model = %response.model, choices = response.choices.len(), "Chat completion received");

        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(AiError::EmptyResponse)?;

        parse_command_from_response(&text)
    }
}
