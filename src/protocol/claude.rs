//! Claude-style Messages API.
//!
//! Requests carry a mandatory `max_tokens` and declare tools in the flat
//! `{name, description, input_schema}` shape. Responses carry a top-level
//! `content` array of typed blocks; tool invocations are `tool_use` blocks.

use super::tool::{self, TOOL_DESCRIPTION, TOOL_NAME};
use super::{Protocol, Scenario};
use crate::validate::{self, Expectation, Verdict};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `max_tokens` sent with every request.
pub const MAX_TOKENS: u32 = 1024;

/// Messages API request
#[derive(Debug, Clone, Serialize)]
pub struct MessagesRequest {
    pub model: String,
    pub max_tokens: u32,
    pub messages: Vec<Message>,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Tool {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

pub fn build_chat_request(model: &str, scenario: Scenario) -> MessagesRequest {
    MessagesRequest {
        model: model.to_string(),
        max_tokens: MAX_TOKENS,
        messages: vec![Message {
            role: "user".to_string(),
            content: tool::prompt(scenario).to_string(),
        }],
        stream: false,
        tools: scenario.is_tool().then(|| {
            vec![Tool {
                name: TOOL_NAME.to_string(),
                description: TOOL_DESCRIPTION.to_string(),
                input_schema: tool::parameters_schema(),
            }]
        }),
    }
}

/// Messages API response envelope
#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        #[serde(default)]
        text: String,
    },
    ToolUse {
        name: String,
    },
    /// thinking, redacted_thinking, server tool results
    #[serde(other)]
    Other,
}

impl MessagesResponse {
    fn first_text(&self) -> Option<&str> {
        self.content.iter().find_map(|block| match block {
            ContentBlock::Text { text } => Some(text.as_str()),
            _ => None,
        })
    }

    fn tool_use_named(&self, wanted: &str) -> Option<&str> {
        self.content.iter().find_map(|block| match block {
            ContentBlock::ToolUse { name } if name == wanted => Some(name.as_str()),
            _ => None,
        })
    }
}

pub fn validate_chat(status: i32, body: &str, expectation: Expectation) -> Verdict {
    let envelope = match validate::open_envelope(Protocol::Claude, status, body) {
        Ok(envelope) => envelope,
        Err(verdict) => return verdict,
    };
    let response: MessagesResponse = match validate::decode(Protocol::Claude, envelope) {
        Ok(response) => response,
        Err(verdict) => return verdict,
    };

    match expectation {
        Expectation::ToolCall => {
            let said = if response.content.is_empty() {
                "Empty"
            } else {
                response.first_text().unwrap_or("")
            };
            validate::tool_call_verdict(
                response.tool_use_named(TOOL_NAME),
                "Tool Use OK",
                "tool_use",
                said,
            )
        }
        Expectation::Text => validate::text_verdict(response.first_text()),
    }
}
