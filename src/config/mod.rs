//! Typed application configuration.
//!
//! Configuration comes from the environment (optionally via a `.env`
//! file), prefixed `LEADFORGE` with `__` separating nested keys, e.g.
//! `LEADFORGE__GENERATION__TIMEOUT_MS=8000`. Every field has a default so
//! an empty environment yields a working test configuration.

use config::{Config, Environment};
use secrecy::SecretString;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Configuration load or validation failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration load failure: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Content generation backend settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// Bearer token for the generation backend. Absent in tests; the
    /// mock generator needs none.
    pub api_key: Option<SecretString>,
    pub endpoint: String,
    pub timeout_ms: u64,
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: "http://localhost:8089/v1/generate".to_string(),
            timeout_ms: 10_000,
            max_retries: 2,
            initial_backoff_ms: 250,
        }
    }
}

impl GenerationSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }
}

/// Assessment flow settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FlowSettings {
    /// Soft cap on answered turns per session.
    pub turn_budget: u32,
    /// Recommendations surfaced to the owner.
    pub top_n: usize,
    pub session_ttl_minutes: i64,
    /// Archetype offered when no catalogued archetype clears its
    /// confidence threshold.
    pub default_archetype: String,
}

impl Default for FlowSettings {
    fn default() -> Self {
        Self {
            turn_budget: 18,
            top_n: 3,
            session_ttl_minutes: 30,
            default_archetype: "interactive_quiz".to_string(),
        }
    }
}

/// Catalog source settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// YAML catalog file; the built-in catalog is used when absent.
    pub path: Option<PathBuf>,
}

/// Session storage settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory for the file-backed store; in-memory when absent.
    pub dir: Option<PathBuf>,
}

/// Root application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub generation: GenerationSettings,
    pub flow: FlowSettings,
    pub catalog: CatalogSettings,
    pub storage: StorageSettings,
}

impl AppConfig {
    /// Loads configuration from the environment, reading `.env` first.
    ///
    /// # Errors
    ///
    /// Load failures from malformed values, or validation failures.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("LEADFORGE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        let app: AppConfig = config.try_deserialize()?;
        app.validate()?;
        Ok(app)
    }

    /// Checks cross-field sanity beyond what types enforce.
    ///
    /// # Errors
    ///
    /// `Invalid` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.flow.turn_budget == 0 {
            return Err(ConfigError::Invalid(
                "flow.turn_budget must be at least 1".to_string(),
            ));
        }
        if self.flow.top_n == 0 {
            return Err(ConfigError::Invalid(
                "flow.top_n must be at least 1".to_string(),
            ));
        }
        if self.flow.session_ttl_minutes <= 0 {
            return Err(ConfigError::Invalid(
                "flow.session_ttl_minutes must be positive".to_string(),
            ));
        }
        if self.flow.default_archetype.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "flow.default_archetype must not be empty".to_string(),
            ));
        }
        if self.generation.timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "generation.timeout_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
