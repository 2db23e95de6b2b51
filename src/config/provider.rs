//! Model backend selection.

use std::fmt;
use std::str::FromStr;

use super::ConfigError;

/// Which backend turns requests into commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProviderKind {
    /// Hosted Anthropic Messages API.
    Anthropic,
    /// Hosted OpenAI-compatible chat completions API.
    OpenAi,
    /// Local Ollama server.
    #[default]
    Ollama,
}

impl ProviderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::OpenAi => "openai",
            ProviderKind::Ollama => "ollama",
        }
    }

    /// Name used in user-facing messages.
    pub fn display_name(self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "Anthropic",
            ProviderKind::OpenAi => "OpenAI",
            ProviderKind::Ollama => "Ollama",
        }
    }

    /// Model used when none is configured.
    pub fn default_model(self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "claude-sonnet-4-5-20250929",
            ProviderKind::OpenAi => "gpt-4o-mini",
            ProviderKind::Ollama => "qwen2.5-coder:7b",
        }
    }

    /// Environment variable holding the API key, for hosted backends.
    pub fn api_key_env(self) -> Option<&'static str> {
        match self {
            ProviderKind::Anthropic => Some("ANTHROPIC_API_KEY"),
            ProviderKind::OpenAi => Some("OPENAI_API_KEY"),
            ProviderKind::Ollama => None,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "anthropic" => Ok(ProviderKind::Anthropic),
            "openai" => Ok(ProviderKind::OpenAi),
            "ollama" => Ok(ProviderKind::Ollama),
            _ => Err(ConfigError::InvalidProvider(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_provider() {
        assert_eq!("anthropic".parse::<ProviderKind>().unwrap(), ProviderKind::Anthropic);
        assert_eq!("openai".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
        assert_eq!("Ollama".parse::<ProviderKind>().unwrap(), ProviderKind::Ollama);
        assert!(matches!(
            "gemini".parse::<ProviderKind>(),
            Err(ConfigError::InvalidProvider(p)) if p == "gemini"
        ));
    }

    #[test]
    fn test_default_models() {
        assert_eq!(ProviderKind::Ollama.default_model(), "qwen2.5-coder:7b");
        assert_eq!(ProviderKind::OpenAi.default_model(), "gpt-4o-mini");
        assert_eq!(ProviderKind::Anthropic.default_model(), "claude-sonnet-4-5-20250929");
    }

    #[test]
    fn test_only_hosted_backends_need_keys() {
        assert_eq!(ProviderKind::Anthropic.api_key_env(), Some("ANTHROPIC_API_KEY"));
        assert_eq!(ProviderKind::OpenAi.api_key_env(), Some("OPENAI_API_KEY"));
        assert_eq!(ProviderKind::Ollama.api_key_env(), None);
    }
}
