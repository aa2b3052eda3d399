//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the `HAVEN`
//! prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use haven::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod error;
mod safety;

pub use error::{ConfigError, ValidationError};
pub use safety::SafetyConfig;

use serde::Deserialize;

/// Root application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Crisis detection and recovery timing.
    #[serde(default)]
    pub safety: SafetyConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Loads a `.env` file if present (for development), then reads
    /// environment variables with the `HAVEN` prefix, using `__` to
    /// separate nested values:
    ///
    /// - `HAVEN__SAFETY__SENSITIVITY_LEVEL=high` -> `safety.sensitivity_level`
    /// - `HAVEN__SAFETY__COOLDOWN_MS=10000` -> `safety.cooldown_ms`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into the expected
    /// types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("HAVEN")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.safety.validate()
    }
}
