//! Configuration module for gatecheck
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`GATECHECK_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use gatecheck::config::HarnessConfig;
//!
//! let config = HarnessConfig::default();
//! assert_eq!(config.target.port, 11435);
//!
//! let toml = r#"
//! [target]
//! port = 9000
//! "#;
//! let config: HarnessConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.target.port, 9000);
//! assert_eq!(config.models.default, "code-small");
//! ```

pub mod error;
pub mod logging;
pub mod models;
pub mod target;

pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use models::{MatrixConfig, ModelsConfig};
pub use target::TargetConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unified configuration for one harness run.
///
/// Built once before the run and handed to the
/// [`MatrixRunner`](crate::matrix::MatrixRunner) by value; nothing reads it
/// from global state.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HarnessConfig {
    /// Gateway address, credentials and timeout
    pub target: TargetConfig,
    /// Model aliases per route family
    pub models: ModelsConfig,
    /// Matrix behavior switches
    pub matrix: MatrixConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl HarnessConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supports GATECHECK_* environment variables for common settings.
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(host) = std::env::var("GATECHECK_HOST") {
            self.target.host = host;
        }
        if let Ok(port) = std::env::var("GATECHECK_PORT") {
            if let Ok(p) = port.parse() {
                self.target.port = p;
            }
        }
        if let Ok(key) = std::env::var("GATECHECK_API_KEY") {
            self.target.api_key = key;
        }
        if let Ok(timeout) = std::env::var("GATECHECK_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.target.timeout_seconds = t;
            }
        }

        if let Ok(level) = std::env::var("GATECHECK_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("GATECHECK_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        self
    }

    /// Validate configuration
    ///
    /// Runs before any request is sent; a failure here is the only fatal
    /// condition of a run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target.port == 0 {
            return Err(validation("target.port", "port must be non-zero"));
        }
        if self.target.host.trim().is_empty() {
            return Err(validation("target.host", "host cannot be empty"));
        }
        if self.target.timeout_seconds == 0 {
            return Err(validation(
                "target.timeout_seconds",
                "timeout must be at least one second",
            ));
        }

        let aliases = [
            ("models.default", &self.models.default),
            ("models.switch", &self.models.switch),
            ("models.group", &self.models.group),
            ("models.embed", &self.models.embed),
            ("models.group_name", &self.models.group_name),
        ];
        for (field, value) in aliases {
            if value.trim().is_empty() {
                return Err(validation(field, "cannot be empty"));
            }
        }
        if self.models.group_name.contains('/') {
            return Err(validation(
                "models.group_name",
                "must be a single path segment",
            ));
        }

        let base_url = self.target.base_url();
        let parsed = reqwest::Url::parse(&base_url).map_err(|e| ConfigError::InvalidUrl {
            url: base_url.clone(),
            message: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                url: base_url,
                message: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        self.logging.validate()
    }
}

fn validation(field: &str, message: &str) -> ConfigError {
    ConfigError::Validation {
        field: field.to_string(),
        message: message.to_string(),
    }
}
