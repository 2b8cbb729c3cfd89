//! Model alias configuration

use serde::{Deserialize, Serialize};

/// Model aliases the gateway is expected to resolve.
///
/// These must exist in the gateway's own configuration; the harness only
/// passes them through.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Model used on the un-prefixed routes
    pub default: String,
    /// Model used on `/switch` and `/switch/compat`
    pub switch: String,
    /// Path segment of the model group, e.g. `glm` for `/glm/v1/...`
    pub group_name: String,
    /// Model used on `/{group_name}` and `/{group_name}/compat`
    pub group: String,
    /// Embedding model alias
    pub embed: String,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            default: "code-small".to_string(),
            switch: "claude-haiku-4.5".to_string(),
            group_name: "glm".to_string(),
            group: "claude-haiku-4.5".to_string(),
            embed: "embed".to_string(),
        }
    }
}

/// Matrix behavior switches
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixConfig {
    /// Require a tool call for text requests on compat routes too.
    pub strict_compat: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_models_config_defaults() {
        let config = ModelsConfig::default();
        assert_eq!(config.default, "code-small");
        assert_eq!(config.switch, "claude-haiku-4.5");
        assert_eq!(config.group_name, "glm");
        assert_eq!(config.embed, "embed");
    }

    #[test]
    fn test_matrix_config_defaults_to_lenient_compat() {
        assert!(!MatrixConfig::default().strict_compat);
    }
}
