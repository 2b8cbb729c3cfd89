//! Logging configuration

use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Harness modules that accept a per-component level.
pub const LOG_COMPONENTS: [&str; 6] = ["cli", "config", "matrix", "protocol", "transport", "validate"];

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines on stderr
    #[default]
    Pretty,
    /// One JSON object per line, for CI log collectors
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}', expected pretty or json", other)),
        }
    }
}

/// `[logging]` section.
///
/// Logs go to stderr and default to `warn`, so a plain run shows only the
/// PASS/FAIL report on stdout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    /// Per-module levels, e.g. `transport = "debug"`. Keys are module names
    /// from [`LOG_COMPONENTS`].
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub component_levels: BTreeMap<String, String>,
    /// Characters of the response body attached to the debug line of a
    /// failed case. Zero leaves the body out.
    pub failure_body_chars: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Pretty,
            component_levels: BTreeMap::new(),
            failure_body_chars: 200,
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.level.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "logging.level".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        if let Some(component) = self
            .component_levels
            .keys()
            .find(|c| !LOG_COMPONENTS.contains(&c.as_str()))
        {
            return Err(ConfigError::Validation {
                field: format!("logging.component_levels.{}", component),
                message: format!("unknown component, expected one of {}", LOG_COMPONENTS.join(", ")),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_keep_stdout_report_clean() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "warn");
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.component_levels.is_empty());
        assert_eq!(config.failure_body_chars, 200);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_section() {
        let config: LoggingConfig = toml::from_str(
            r#"
            level = "info"
            format = "json"
            failure_body_chars = 0

            [component_levels]
            transport = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.failure_body_chars, 0);
        assert_eq!(config.component_levels["transport"], "debug");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_component_rejected() {
        let mut config = LoggingConfig::default();
        config
            .component_levels
            .insert("routing".to_string(), "debug".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("logging.component_levels.routing"));
    }

    #[test]
    fn test_log_format_from_str() {
        assert_eq!(LogFormat::from_str("pretty").unwrap(), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str(" JSON ").unwrap(), LogFormat::Json);
        assert!(LogFormat::from_str("xml").unwrap_err().contains("xml"));
        assert!(LogFormat::from_str("").is_err());
    }
}
