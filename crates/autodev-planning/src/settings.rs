//! Layered planning-agent configuration
//!
//! Sources, highest priority last:
//! 1. Built-in defaults
//! 2. Optional TOML file
//! 3. `OPENAI_API_KEY` (maps to `model.api_key`)
//! 4. `AUTODEV_*` environment variables, `__` separating sections
//!    (`AUTODEV_SERVER__PORT` -> `server.port`)

use autodev_core::GenerationSettings;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Key value shipped in sample env files; treated as "no key"
pub const PLACEHOLDER_API_KEY: &str = "your-openai-key-here";

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Figment extraction or merge error
    #[error("configuration error: {0}")]
    Figment(#[from] figment::Error),

    /// Field holds an unusable value
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// Dotted field path
        field: String,
        /// Why the value is rejected
        reason: String,
    },
}

impl ConfigError {
    fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// HTTP listener
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Bind address
    pub host: IpAddr,
    /// Listener port
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8000,
        }
    }
}

/// Session cache sizing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Seconds an architecture stays retrievable
    pub ttl_secs: u64,
    /// Maximum cached sessions
    pub capacity: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            ttl_secs: 3600,
            capacity: 10_000,
        }
    }
}

/// Language-model endpoint and generation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// OpenAI-compatible API root
    pub base_url: String,
    /// Chat model name
    pub model: String,
    /// Bearer key; absent or placeholder disables the model path
    pub api_key: Option<String>,
    /// Sampling temperature
    pub temperature: f32,
    /// Output size bound
    pub max_tokens: u32,
    /// Deadline for one model call
    pub timeout_secs: u64,
}

impl Default for ModelSettings {
    fn default() -> Self {
        let generation = GenerationSettings::default();
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4-turbo-preview".to_string(),
            api_key: None,
            temperature: generation.temperature,
            max_tokens: generation.max_tokens,
            timeout_secs: generation.timeout().as_secs(),
        }
    }
}

impl ModelSettings {
    /// Usable API key, if any
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && *key != PLACEHOLDER_API_KEY)
    }

    /// Whether model-backed generation should run
    #[inline]
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }

    /// Generation parameters handed to the core
    #[must_use]
    pub fn generation(&self) -> GenerationSettings {
        GenerationSettings {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            timeout_ms: self.timeout_secs.saturating_mul(1000),
        }
    }
}

/// Planning agent configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningSettings {
    /// HTTP listener
    pub server: ServerSettings,
    /// Architecture cache
    pub session: SessionSettings,
    /// Language-model endpoint
    pub model: ModelSettings,
    /// Append execution rows to this JSONL file instead of memory
    pub execution_log: Option<PathBuf>,
}

impl PlanningSettings {
    /// Load from defaults, `config_file` (if given) and the environment
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let settings: Self = Self::figment(config_file).extract()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Build the provider chain
    #[must_use]
    pub fn figment(config_file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(path) = config_file {
            figment = figment.merge(Toml::file(path));
        }

        figment
            .merge(
                Env::raw()
                    .only(&["OPENAI_API_KEY"])
                    .map(|_| "model.api_key".into()),
            )
            .merge(Env::prefixed("AUTODEV_").split("__"))
    }

    /// Reject values the service cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session.ttl_secs == 0 {
            return Err(ConfigError::invalid("session.ttl_secs", "must be positive"));
        }
        if !(0.0..=2.0).contains(&self.model.temperature) {
            return Err(ConfigError::invalid(
                "model.temperature",
                format!("{} outside 0.0..=2.0", self.model.temperature),
            ));
        }
        if self.model.max_tokens == 0 {
            return Err(ConfigError::invalid("model.max_tokens", "must be positive"));
        }
        if self.model.timeout_secs == 0 {
            return Err(ConfigError::invalid("model.timeout_secs", "must be positive"));
        }
        Ok(())
    }

    /// With listener port
    #[inline]
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.server.port = port;
        self
    }

    /// With model key
    #[inline]
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.model.api_key = Some(key.into());
        self
    }

    /// With JSONL execution log
    #[inline]
    #[must_use]
    pub fn with_execution_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.execution_log = Some(path.into());
        self
    }

    /// Socket the server binds
    #[inline]
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server.host, self.server.port)
    }

    /// Session expiry as a duration
    #[inline]
    #[must_use]
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session.ttl_secs)
    }
}
