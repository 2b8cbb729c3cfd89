//! Wire protocols spoken by the gateway.
//!
//! Each protocol module owns its native request types (what the harness
//! sends), its response envelope types (what it expects back) and the
//! validators that classify a response. Protocols never share envelope
//! types; the one overlap is that Ollama declares tools in OpenAI's shape.

pub mod claude;
pub mod gemini;
pub mod ollama;
pub mod openai;
pub mod route;
pub mod tool;

pub use route::RoutePrefix;

use crate::transport::{Headers, RequestBody};
use crate::validate::{Expectation, JsonObject, Verdict};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Version header value sent on Claude-style requests.
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Chat wire protocol.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[value(name = "openai")]
    OpenAI,
    #[value(name = "claude", alias = "anthropic")]
    Claude,
    #[value(name = "gemini", alias = "google")]
    Gemini,
    #[value(name = "ollama")]
    Ollama,
}

impl Protocol {
    /// Every protocol, in sweep order.
    pub const ALL: [Protocol; 4] = [
        Protocol::OpenAI,
        Protocol::Claude,
        Protocol::Ollama,
        Protocol::Gemini,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Protocol::OpenAI => "OpenAI",
            Protocol::Claude => "Claude",
            Protocol::Gemini => "Gemini",
            Protocol::Ollama => "Ollama",
        }
    }

    /// Chat endpoint path below the route prefix. For Gemini this is the
    /// models collection; the model and action are appended per request.
    pub fn chat_endpoint(&self) -> &'static str {
        match self {
            Protocol::OpenAI => "/v1/chat/completions",
            Protocol::Claude => "/v1/messages",
            Protocol::Gemini => "/v1beta/models",
            Protocol::Ollama => "/api/chat",
        }
    }

    /// Top-level field carrying the chat result.
    pub fn envelope_field(&self) -> &'static str {
        match self {
            Protocol::OpenAI => "choices",
            Protocol::Claude => "content",
            Protocol::Gemini => "candidates",
            Protocol::Ollama => "message",
        }
    }

    /// Whether `object` carries this protocol's envelope signature.
    ///
    /// Claude and Ollama also check the value type: a top-level `content`
    /// array or `message` object respectively.
    pub fn has_signature(&self, object: &JsonObject) -> bool {
        match self {
            Protocol::OpenAI => object.contains_key("choices"),
            Protocol::Claude => object.get("content").is_some_and(|v| v.is_array()),
            Protocol::Gemini => object.contains_key("candidates"),
            Protocol::Ollama => object.get("message").is_some_and(|v| v.is_object()),
        }
    }

    /// Authentication headers for chat calls. Gemini authenticates through
    /// the `key` query parameter instead.
    pub fn auth_headers(&self, api_key: &str) -> Headers {
        let mut headers = Headers::new();
        match self {
            Protocol::OpenAI | Protocol::Ollama => {
                headers.insert("Authorization".to_string(), format!("Bearer {}", api_key));
            }
            Protocol::Claude => {
                headers.insert("x-api-key".to_string(), api_key.to_string());
                headers.insert(
                    "anthropic-version".to_string(),
                    ANTHROPIC_VERSION.to_string(),
                );
            }
            Protocol::Gemini => {}
        }
        headers
    }

    /// Full chat URL for one case.
    pub fn chat_url(&self, base_url: &str, route: &RoutePrefix, model: &str, api_key: &str) -> String {
        match self {
            Protocol::Gemini => gemini::generate_content_url(base_url, &route.path(), model, api_key),
            _ => format!("{}{}{}", base_url, route.path(), self.chat_endpoint()),
        }
    }

    pub fn build_chat_request(&self, model: &str, scenario: Scenario) -> ChatRequest {
        match self {
            Protocol::OpenAI => ChatRequest::OpenAI(openai::build_chat_request(model, scenario)),
            Protocol::Claude => ChatRequest::Claude(claude::build_chat_request(model, scenario)),
            Protocol::Gemini => ChatRequest::Gemini(gemini::build_chat_request(scenario)),
            Protocol::Ollama => ChatRequest::Ollama(ollama::build_chat_request(model, scenario)),
        }
    }

    pub fn validate_chat(&self, status: i32, body: &str, expectation: Expectation) -> Verdict {
        match self {
            Protocol::OpenAI => openai::validate_chat(status, body, expectation),
            Protocol::Claude => claude::validate_chat(status, body, expectation),
            Protocol::Gemini => gemini::validate_chat(status, body, expectation),
            Protocol::Ollama => ollama::validate_chat(status, body, expectation),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Protocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Protocol::OpenAI),
            "claude" | "anthropic" => Ok(Protocol::Claude),
            "gemini" | "google" => Ok(Protocol::Gemini),
            "ollama" => Ok(Protocol::Ollama),
            _ => Err(format!("Unknown protocol: {}", s)),
        }
    }
}

/// Request kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// Plain greeting, expects assistant text
    Text,
    /// Declares `get_weather`, expects a tool call
    ToolUse,
}

impl Scenario {
    pub const ALL: [Scenario; 2] = [Scenario::Text, Scenario::ToolUse];

    pub fn is_tool(&self) -> bool {
        matches!(self, Scenario::ToolUse)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Scenario::Text => "Text",
            Scenario::ToolUse => "Tool",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Protocol-native chat request body.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ChatRequest {
    OpenAI(openai::ChatRequest),
    Claude(claude::MessagesRequest),
    Gemini(gemini::GenerateContentRequest),
    Ollama(ollama::ChatRequest),
}

impl ChatRequest {
    pub fn to_body(&self) -> Result<RequestBody, serde_json::Error> {
        Ok(RequestBody::Json(serde_json::to_value(self)?))
    }
}
