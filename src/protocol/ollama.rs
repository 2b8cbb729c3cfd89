//! Ollama-style `/api/chat`, `/api/tags` and `/api/embed`.
//!
//! Requests share OpenAI's body layout (including the tool declaration
//! shape); responses carry a single top-level `message` object instead of
//! `choices`.

use super::openai::{self, Tool};
use super::tool::{self, TOOL_NAME};
use super::{Protocol, Scenario};
use crate::validate::{self, Expectation, Extracted, FaultKind, Verdict};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `/api/chat` request
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<openai::Message>,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
}

pub fn build_chat_request(model: &str, scenario: Scenario) -> ChatRequest {
    ChatRequest {
        model: model.to_string(),
        messages: vec![openai::Message::user(tool::prompt(scenario))],
        stream: false,
        tools: scenario.is_tool().then(|| vec![Tool::get_weather()]),
    }
}

/// `/api/chat` response envelope
#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    #[serde(default)]
    content: String,
    #[serde(default)]
    tool_calls: Option<Vec<ToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ToolCall {
    function: FunctionCall,
}

#[derive(Debug, Deserialize)]
struct FunctionCall {
    name: String,
}

pub fn validate_chat(status: i32, body: &str, expectation: Expectation) -> Verdict {
    let envelope = match validate::open_envelope(Protocol::Ollama, status, body) {
        Ok(envelope) => envelope,
        Err(verdict) => return verdict,
    };
    let response: ChatResponse = match validate::decode(Protocol::Ollama, envelope) {
        Ok(response) => response,
        Err(verdict) => return verdict,
    };

    let message = &response.message;
    match expectation {
        Expectation::ToolCall => {
            let called = message
                .tool_calls
                .iter()
                .flatten()
                .map(|call| call.function.name.as_str())
                .find(|name| *name == TOOL_NAME);
            validate::tool_call_verdict(called, "Tool Call OK", "tool_calls", &message.content)
        }
        Expectation::Text => validate::text_verdict(Some(&message.content)),
    }
}

#[derive(Debug, Deserialize)]
struct TagList {
    models: Vec<Value>,
}

/// `GET /api/tags`
pub fn validate_model_list(status: i32, body: &str) -> Verdict {
    let object = match validate::parse_object(Protocol::Ollama, status, body) {
        Ok(object) => object,
        Err(verdict) => return verdict,
    };
    if !object.contains_key("models") {
        return Verdict::fail(FaultKind::Shape, "Missing 'models' in Ollama tag list");
    }
    match validate::decode::<TagList>(Protocol::Ollama, object) {
        Ok(list) => Verdict::pass(
            format!("HTTP {}, {} models", status, list.models.len()),
            Extracted::Count(list.models.len()),
        ),
        Err(verdict) => verdict,
    }
}

/// `/api/embed` returns `embeddings`; the legacy `/api/embeddings` shape
/// returns a single `embedding`. Either is accepted.
#[derive(Debug, Deserialize)]
struct EmbedResponse {
    #[serde(default)]
    embeddings: Option<Vec<Vec<f64>>>,
    #[serde(default)]
    embedding: Option<Vec<f64>>,
}

pub fn validate_embedding(status: i32, body: &str) -> Verdict {
    let object = match validate::parse_object(Protocol::Ollama, status, body) {
        Ok(object) => object,
        Err(verdict) => return verdict,
    };
    if !object.contains_key("embeddings") && !object.contains_key("embedding") {
        return Verdict::fail(
            FaultKind::Shape,
            "Missing 'embeddings' in Ollama embedding response",
        );
    }
    let response: EmbedResponse = match validate::decode(Protocol::Ollama, object) {
        Ok(response) => response,
        Err(verdict) => return verdict,
    };

    let dimensions = response
        .embeddings
        .as_ref()
        .and_then(|all| all.first())
        .or(response.embedding.as_ref())
        .map(|vector| vector.len())
        .unwrap_or(0);
    if dimensions == 0 {
        return Verdict::fail(FaultKind::Semantic, "Empty embedding");
    }
    openai::embedding_verdict(dimensions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn chat_body(message: Value) -> String {
        json!({
            "model": "code-small",
            "created_at": "2025-01-01T00:00:00Z",
            "message": message,
            "done": true
        })
        .to_string()
    }

    #[test]
    fn test_request_matches_openai_layout() {
        let ollama = serde_json::to_value(build_chat_request("m", Scenario::ToolUse)).unwrap();
        let openai = serde_json::to_value(openai::build_chat_request("m", Scenario::ToolUse)).unwrap();
        assert_eq!(ollama, openai);
        assert_eq!(ollama["stream"], false);
    }

    #[test]
    fn test_validate_text_ok() {
        let body = chat_body(json!({"role": "assistant", "content": "Hi"}));
        let verdict = validate_chat(200, &body, Expectation::Text);
        assert!(verdict.passed, "{}", verdict.message);
        assert_eq!(verdict.text(), Some("Hi"));
    }

    #[test]
    fn test_validate_text_empty() {
        let body = chat_body(json!({"role": "assistant", "content": ""}));
        let verdict = validate_chat(200, &body, Expectation::Text);
        assert!(!verdict.passed);
        assert_eq!(verdict.message, "Empty content");
    }

    #[test]
    fn test_validate_tool_call_ok() {
        let body = chat_body(json!({
            "role": "assistant",
            "content": "",
            "tool_calls": [{"function": {"name": "get_weather", "arguments": {"loc": "New York, NY"}}}]
        }));
        let verdict = validate_chat(200, &body, Expectation::ToolCall);
        assert!(verdict.passed, "{}", verdict.message);
        assert_eq!(verdict.tool_name(), Some("get_weather"));
    }

    #[test]
    fn test_validate_tool_call_missing() {
        let body = chat_body(json!({"role": "assistant", "content": "No tools here"}));
        let verdict = validate_chat(200, &body, Expectation::ToolCall);
        assert_eq!(verdict.message, "tool_calls missing. Model said: No tools here");
    }

    #[test]
    fn test_validate_openai_body_is_protocol_error() {
        let body = r#"{"choices":[{"message":{"content":"Hi"}}]}"#;
        let verdict = validate_chat(200, body, Expectation::Text);
        assert_eq!(verdict.fault, Some(FaultKind::ProtocolMismatch));
        assert!(verdict.message.contains("expected Ollama"));
    }

    #[test]
    fn test_validate_message_wrong_type() {
        let verdict = validate_chat(200, r#"{"message":"Hi"}"#, Expectation::Text);
        assert_eq!(verdict.fault, Some(FaultKind::Decode));
    }

    #[test]
    fn test_tag_list() {
        let verdict = validate_model_list(200, r#"{"models":[{"name":"llama3:8b"}]}"#);
        assert!(verdict.passed);
        assert_eq!(verdict.message, "HTTP 200, 1 models");
    }

    #[test]
    fn test_embedding_both_shapes() {
        assert!(validate_embedding(200, r#"{"model":"embed","embeddings":[[0.1,0.2]]}"#).passed);
        assert!(validate_embedding(200, r#"{"embedding":[0.1,0.2,0.3]}"#).passed);

        let empty = validate_embedding(200, r#"{"embeddings":[]}"#);
        assert_eq!(empty.fault, Some(FaultKind::Semantic));
    }
}
