//! Structured logging helpers
//!
//! Filter construction for `tracing-subscriber` and the field helpers used
//! to keep log lines and verdict messages short and free of credentials.

pub mod fields;

pub use fields::{redact_api_key, snippet, truncate_chars};

/// Build filter directives string from LoggingConfig
///
/// Constructs a tracing filter string that includes the base log level
/// and any component-specific log levels configured in the LoggingConfig.
///
/// # Examples
///
/// ```
/// use gatecheck::config::logging::{LogFormat, LoggingConfig};
/// use gatecheck::logging::build_filter_directives;
///
/// let mut config = LoggingConfig {
///     level: "warn".to_string(),
///     format: LogFormat::Pretty,
///     ..Default::default()
/// };
/// config
///     .component_levels
///     .insert("transport".to_string(), "debug".to_string());
///
/// let filter_str = build_filter_directives(&config);
/// assert_eq!(filter_str, "warn,gatecheck::transport=debug");
/// ```
pub fn build_filter_directives(config: &crate::config::LoggingConfig) -> String {
    let mut filter_str = config.level.clone();

    for (component, level) in &config.component_levels {
        filter_str.push_str(&format!(",gatecheck::{}={}", component, level));
    }

    filter_str
}
