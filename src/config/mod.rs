//! Configuration loading.
//!
//! Sources, lowest precedence first:
//! 1. Built-in defaults
//! 2. `~/.config/zchat/config.yaml` (or the file passed with `--config`)
//! 3. Environment variables (`ANTHROPIC_API_KEY`, `ANTHROPIC_BASE_URL`,
//!    `OPENAI_API_KEY`, `OPENAI_BASE_URL`, `ZCHAT_PROVIDER`, `ZCHAT_MODEL`,
//!    `OLLAMA_URL`)
//! 4. Command-line flags
//!
//! The result is validated once and then treated as read-only for the rest of
//! the run.

mod provider;

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::security::DangerPatterns;

pub use provider::ProviderKind;

/// Where the config file lives, relative to the home directory.
pub const CONFIG_FILE_DISPLAY: &str = "~/.config/zchat/config.yaml";

pub const DEFAULT_ANTHROPIC_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_MAX_CONTEXT_LINES: usize = 20;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid provider: {0} (must be 'anthropic', 'openai' or 'ollama')")]
    InvalidProvider(String),

    #[error(
        "API key is required for {provider}. Set the {env_var} environment variable or add api_key to {}",
        CONFIG_FILE_DISPLAY
    )]
    MissingApiKey {
        provider: &'static str,
        env_var: &'static str,
    },

    #[error("request_timeout_secs must be greater than zero")]
    ZeroTimeout,
}

/// Validated runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub provider: ProviderKind,
    /// Explicitly configured model; see [`Config::model`].
    pub model: Option<String>,
    /// Key from the config file, used by whichever hosted backend is selected.
    pub api_key: Option<String>,
    /// `ANTHROPIC_API_KEY`; takes precedence over `api_key`.
    pub anthropic_api_key: Option<String>,
    /// `OPENAI_API_KEY`; takes precedence over `api_key`.
    pub openai_api_key: Option<String>,
    pub anthropic_base_url: String,
    /// Alternative base URL for OpenAI-compatible servers.
    pub openai_base_url: Option<String>,
    pub ollama_url: String,
    /// Cap on the number of directory entries sent to the model.
    pub max_context_lines: usize,
    pub request_timeout_secs: u64,
    pub dangerous_patterns: DangerPatterns,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            model: None,
            api_key: None,
            anthropic_api_key: None,
            openai_api_key: None,
            anthropic_base_url: DEFAULT_ANTHROPIC_URL.to_string(),
            openai_base_url: None,
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            max_context_lines: DEFAULT_MAX_CONTEXT_LINES,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            dangerous_patterns: DangerPatterns::default(),
        }
    }
}

/// Shape of the YAML file. Every field is optional; absent fields keep the
/// value from the layer below.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    provider: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
    anthropic_base_url: Option<String>,
    openai_base_url: Option<String>,
    ollama_url: Option<String>,
    max_context_lines: Option<usize>,
    request_timeout_secs: Option<u64>,
    dangerous_patterns: Option<DangerPatterns>,
}

/// Values taken from the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub provider: Option<ProviderKind>,
    pub model: Option<String>,
}

/// Default config file path, if the home directory is known.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("zchat").join("config.yaml"))
}

/// Load configuration from all sources and validate it.
pub fn load(overrides: &ConfigOverrides) -> Result<Config, ConfigError> {
    let mut config = Config::default();

    match &overrides.config_path {
        // An explicitly requested file must exist.
        Some(path) => config.merge_yaml(path, &read_file(path)?)?,
        None => {
            if let Some(path) = default_config_path() {
                if path.exists() {
                    config.merge_yaml(&path, &read_file(&path)?)?;
                }
            }
        }
    }

    config.apply_env(|key| std::env::var(key).ok())?;
    config.apply_overrides(overrides);
    config.validate()?;

    debug!(
        provider = %config.provider,
        model = config.model(),
        patterns = config.dangerous_patterns.len(),
        "Configuration loaded"
    );
    Ok(config)
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    debug!("Loading config from {:?}", path);
    std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

impl Config {
    /// The model to request, falling back to the provider's default.
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }

    /// API key for the selected backend. The provider's own environment
    /// variable wins over the file's `api_key`; Ollama needs none.
    pub fn api_key(&self) -> Option<&str> {
        let from_env = match self.provider {
            ProviderKind::Anthropic => self.anthropic_api_key.as_deref(),
            ProviderKind::OpenAi => self.openai_api_key.as_deref(),
            ProviderKind::Ollama => return None,
        };
        from_env
            .or(self.api_key.as_deref())
            .filter(|key| !key.is_empty())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Overlay the fields present in `contents` (YAML) onto this config.
    pub fn merge_yaml(&mut self, path: &Path, contents: &str) -> Result<(), ConfigError> {
        if contents.trim().is_empty() {
            return Ok(());
        }
        let file: ConfigFile =
            serde_yaml::from_str(contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        if let Some(provider) = file.provider {
            self.provider = provider.parse()?;
        }
        if let Some(model) = file.model {
            self.model = Some(model);
        }
        if let Some(api_key) = file.api_key {
            self.api_key = Some(api_key);
        }
        if let Some(url) = file.anthropic_base_url {
            self.anthropic_base_url = url;
        }
        if let Some(url) = file.openai_base_url {
            self.openai_base_url = Some(url);
        }
        if let Some(url) = file.ollama_url {
            self.ollama_url = url;
        }
        if let Some(lines) = file.max_context_lines {
            self.max_context_lines = lines;
        }
        if let Some(secs) = file.request_timeout_secs {
            self.request_timeout_secs = secs;
        }
        if let Some(patterns) = file.dangerous_patterns {
            self.dangerous_patterns = patterns;
        }
        Ok(())
    }

    /// Apply environment overrides read through `lookup`. Empty values are
    /// ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(key) = get("ANTHROPIC_API_KEY") {
            self.anthropic_api_key = Some(key);
        }
        if let Some(url) = get("ANTHROPIC_BASE_URL") {
            self.anthropic_base_url = url;
        }
        if let Some(key) = get("OPENAI_API_KEY") {
            self.openai_api_key = Some(key);
        }
        if let Some(url) = get("OPENAI_BASE_URL") {
            self.openai_base_url = Some(url);
        }
        if let Some(provider) = get("ZCHAT_PROVIDER") {
            self.provider = provider.parse()?;
        }
        if let Some(model) = get("ZCHAT_MODEL") {
            self.model = Some(model);
        }
        if let Some(url) = get("OLLAMA_URL") {
            self.ollama_url = url;
        }
        Ok(())
    }

    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(provider) = overrides.provider {
            self.provider = provider;
        }
        if let Some(model) = &overrides.model {
            self.model = Some(model.clone());
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(env_var) = self.provider.api_key_env() {
            if self.api_key().is_none() {
                return Err(ConfigError::MissingApiKey {
                    provider: self.provider.display_name(),
                    env_var,
                });
            }
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}
