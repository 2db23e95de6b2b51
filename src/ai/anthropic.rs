//! Hosted backend speaking the Anthropic Messages API.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::parser::parse_command_from_response;
use super::prompt::build_system_prompt;
use super::{AiError, CommandGenerator};
use crate::context::SystemContext;

const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 1024;

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: String,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// `{"type": "error", "error": {"type": "...", "message": "..."}}`
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

#[derive(Clone)]
pub struct AnthropicClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl AnthropicClient {
    /// `base_url` is the API root, e.g. `https://api.anthropic.com`.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: model.into(),
        }
    }
}

impl CommandGenerator for AnthropicClient {
    async fn generate_command(&self, query: &str, ctx: &SystemContext) -> Result<String, AiError> {
        let url = format!("{}/v1/messages", self.base_url.trim_end_matches('/'));
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            system: build_system_prompt(ctx),
            messages: [Message {
                role: "user",
                content: query,
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let body = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(AiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let message: MessagesResponse = response.json().await?;
        debug!(
            blocks = message.content.len(),
            stop_reason = message.stop_reason.as_deref().unwrap_or("none"),
            "Message received"
        );

        let text = message
            .content
            .into_iter()
            .find(|block| block.kind == "text")
            .and_then(|block| block.text)
            .ok_or(AiError::EmptyResponse)?;

        parse_command_from_response(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn context() -> SystemContext {
        SystemContext {
            working_dir: "/home/user/data".to_string(),
            files: vec!["analysis_data.csv".to_string()],
            shell: "/bin/zsh".to_string(),
            os: "darwin".to_string(),
            arch: "arm64".to_string(),
        }
    }

    fn message(blocks: serde_json::Value) -> serde_json::Value {
        serde_json::json!({
            "id": "msg_test",
            "type": "message",
            "role": "assistant",
            "model": "claude-sonnet-4-5-20250929",
            "content": blocks,
            "stop_reason": "end_turn"
        })
    }

    #[tokio::test]
    async fn test_generate_command() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "sk-ant-test"))
            .and(header("anthropic-version", API_VERSION))
            .and(body_partial_json(serde_json::json!({
                "model": "claude-sonnet-4-5-20250929",
                "max_tokens": 1024,
                "messages": [{ "role": "user", "content": "count lines in analysis_data.csv" }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(message(serde_json::json!([
                { "type": "text", "text": "`wc -l analysis_data.csv`" }
            ]))))
            .expect(1)
            .mount(&server)
            .await;

        let client = AnthropicClient::new("sk-ant-test", server.uri(), "claude-sonnet-4-5-20250929");
        let cmd = client
            .generate_command("count lines in analysis_data.csv", &context())
            .await
            .unwrap();
        assert_eq!(cmd, "wc -l analysis_data.csv");
    }

    #[tokio::test]
    async fn test_system_prompt_carries_context() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(message(serde_json::json!([
                { "type": "text", "text": "ls" }
            ]))))
            .mount(&server)
            .await;

        let client = AnthropicClient::new("sk-ant-test", format!("{}/", server.uri()), "m");
        client.generate_command("list files", &context()).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        let system = body["system"].as_str().unwrap();
        assert!(system.contains("CRITICAL RULES"));
        assert!(system.contains("- Current Directory: /home/user/data"));
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_skips_non_text_blocks() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(message(serde_json::json!([
                { "type": "thinking", "thinking": "..." },
                { "type": "text", "text": "du -sh * | sort -h" }
            ]))))
            .mount(&server)
            .await;

        let client = AnthropicClient::new("sk-ant-test", server.uri(), "m");
        let cmd = client.generate_command("disk usage", &context()).await.unwrap();
        assert_eq!(cmd, "du -sh * | sort -h");
    }

    #[tokio::test]
    async fn test_empty_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(message(serde_json::json!([]))))
            .mount(&server)
            .await;

        let client = AnthropicClient::new("sk-ant-test", server.uri(), "m");
        let err = client.generate_command("list files", &context()).await.unwrap_err();
        assert!(matches!(err, AiError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_error_status_reports_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "type": "error",
                "error": { "type": "authentication_error", "message": "invalid x-api-key" }
            })))
            .mount(&server)
            .await;

        let client = AnthropicClient::new("bad", server.uri(), "m");
        let err = client.generate_command("list files", &context()).await.unwrap_err();
        match err {
            AiError::Status { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "invalid x-api-key");
            }
            other => panic!("Expected Status error, got {:?}", other),
        }
    }
}
