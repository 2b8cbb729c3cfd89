//! Gateway target configuration

use serde::{Deserialize, Serialize};

/// Where the gateway under test lives and how to authenticate against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    pub scheme: String,
    pub host: String,
    pub port: u16,
    /// Credential carried unmodified to every endpoint
    pub api_key: String,
    /// Upper bound for a single HTTP call
    pub timeout_seconds: u64,
}

impl TargetConfig {
    /// Base URL without trailing slash, e.g. `http://localhost:11435`
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            scheme: "http".to_string(),
            host: "localhost".to_string(),
            port: 11435,
            api_key: String::new(),
            timeout_seconds: 30,
        }
    }
}
