//! designcoach configuration types and loading

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::record::{MergeMode, QualityFilter};

/// Main designcoach configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Conversation session policies
    pub session: SessionConfig,

    /// Document export configuration
    pub export: ExportConfig,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Call this early in startup so a missing credential is surfaced as a
    /// clear message before any network call is attempted.
    pub fn validate(&self) -> Result<()> {
        if std::env::var(&self.llm.api_key_env).is_err() {
            return Err(eyre::eyre!(
                "LLM API key not found. Set the {} environment variable.",
                self.llm.api_key_env
            ));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .designcoach.yml
        let local_config = PathBuf::from(".designcoach.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/designcoach/designcoach.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("designcoach").join("designcoach.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name ("anthropic" or "openai")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum tokens per response (client-side cap)
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl LlmConfig {
    /// Read the API key from the configured environment variable
    pub fn get_api_key(&self) -> Result<String> {
        std::env::var(&self.api_key_env)
            .context(format!("API key environment variable {} is not set", self.api_key_env))
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "anthropic".to_string(),
            model: "claude-sonnet-4-20250514".to_string(),
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            max_tokens: 4096,
            timeout_ms: 120_000,
        }
    }
}

/// Conversation session policies
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Sliding-window history bound, in turns
    #[serde(rename = "history-cap")]
    pub history_cap: usize,

    /// Minimum user-message length worth a classification call
    #[serde(rename = "min-classify-len")]
    pub min_classify_len: usize,

    /// Delay before the single retry on transient overload
    #[serde(rename = "retry-delay-ms")]
    pub retry_delay_ms: u64,

    /// Max tokens for chat replies
    #[serde(rename = "chat-max-tokens")]
    pub chat_max_tokens: u32,

    /// Max tokens for classification replies
    #[serde(rename = "classify-max-tokens")]
    pub classify_max_tokens: u32,

    /// Sequence-category merge policy
    #[serde(rename = "merge-mode")]
    pub merge_mode: MergeMode,

    /// Quality tiers eligible for merging
    #[serde(rename = "quality-filter")]
    pub quality_filter: QualityFilter,
}

impl SessionConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_cap: 30,
            min_classify_len: 3,
            retry_delay_ms: 1000,
            chat_max_tokens: 500,
            classify_max_tokens: 400,
            merge_mode: MergeMode::default(),
            quality_filter: QualityFilter::default(),
        }
    }
}

/// Document export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory exported documents are written to
    #[serde(rename = "output-dir")]
    pub output_dir: PathBuf,

    /// Max tokens for specification generation
    #[serde(rename = "spec-max-tokens")]
    pub spec_max_tokens: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("export"),
            spec_max_tokens: 2000,
        }
    }
}
