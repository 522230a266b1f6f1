use serde::{Deserialize, Serialize};
use std::time::Duration;

use pipeline::{BatchConfig, SizePolicy};

/// Service configuration. Every field has a default, so an empty
/// environment yields a working rule-based server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub provider: ProviderConfig,
    pub policy: PolicyConfig,
    pub batch: BatchSettings,
    pub retry: RetryConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    #[serde(rename = "openai")]
    OpenAi,
    Mistral,
    RuleBased,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub max_tokens: u32,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub single_call_token_budget: usize,
    pub single_call_char_cap: usize,
    pub chunk_char_cap: usize,
    pub chunk_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchSettings {
    pub max_urls: usize,
    pub item_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_retries: usize,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub max_entries: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::RuleBased,
            api_key: None,
            model: None,
            base_url: None,
            max_tokens: 2000,
            request_timeout_secs: 60,
        }
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            single_call_token_budget: 12_000,
            single_call_char_cap: 48_000,
            chunk_char_cap: 40_000,
            chunk_delay_ms: 2000,
        }
    }
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            max_urls: 10,
            item_delay_ms: 1000,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 1000,
            max_backoff_ms: 10000,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: 1000,
        }
    }
}

impl AppConfig {
    /// Load from `PRIVACY__<SECTION>__<FIELD>` environment variables.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_environment(Self::environment())
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix("PRIVACY")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }

    fn from_environment(env: config::Environment) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(env)
            .build()?
            .try_deserialize()
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn size_policy(&self) -> SizePolicy {
        SizePolicy {
            single_call_token_budget: self.policy.single_call_token_budget,
            single_call_char_cap: self.policy.single_call_char_cap,
            chunk_char_cap: self.policy.chunk_char_cap,
            chunk_delay: Duration::from_millis(self.policy.chunk_delay_ms),
        }
    }

    pub fn batch_config(&self) -> BatchConfig {
        BatchConfig {
            max_items: self.batch.max_urls,
            item_delay: Duration::from_millis(self.batch.item_delay_ms),
        }
    }
}

impl ProviderConfig {
    /// The API key, if one is set and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
