//! OpenAI-style chat completions, model listing and embeddings.
//!
//! - Chat via `POST {prefix}/v1/chat/completions`, result in `choices[0].message`
//! - Tool calls in `choices[0].message.tool_calls[].function.name`
//! - Model list via `GET /v1/models` as `{data: [...]}`
//! - Embeddings via `POST /v1/embeddings` as `{data: [{embedding: [...]}]}`

use super::tool::{self, TOOL_DESCRIPTION, TOOL_NAME};
use super::{Protocol, Scenario};
use crate::validate::{self, Expectation, Extracted, FaultKind, Verdict};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Chat completion request
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
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

impl Message {
    pub fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }
}

/// Function tool declaration, `{type: "function", function: {...}}`
#[derive(Debug, Clone, Serialize)]
pub struct Tool {
    #[serde(rename = "type")]
    pub tool_type: String,
    pub function: FunctionDeclaration,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl Tool {
    /// The `get_weather` declaration. Ollama declares tools in this shape too.
    pub fn get_weather() -> Self {
        Self {
            tool_type: "function".to_string(),
            function: FunctionDeclaration {
                name: TOOL_NAME.to_string(),
                description: TOOL_DESCRIPTION.to_string(),
                parameters: tool::parameters_schema(),
            },
        }
    }
}

pub fn build_chat_request(model: &str, scenario: Scenario) -> ChatRequest {
    ChatRequest {
        model: model.to_string(),
        messages: vec![Message::user(tool::prompt(scenario))],
        stream: false,
        tools: scenario.is_tool().then(|| vec![Tool::get_weather()]),
    }
}

/// Chat completion response envelope
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: Option<String>,
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
    let envelope = match validate::open_envelope(Protocol::OpenAI, status, body) {
        Ok(envelope) => envelope,
        Err(verdict) => return verdict,
    };
    let response: ChatResponse = match validate::decode(Protocol::OpenAI, envelope) {
        Ok(response) => response,
        Err(verdict) => return verdict,
    };
    let Some(choice) = response.choices.first() else {
        return Verdict::fail(FaultKind::Semantic, "Empty 'choices' in OpenAI response");
    };

    let content = choice.message.content.as_deref();
    match expectation {
        Expectation::ToolCall => {
            let called = choice
                .message
                .tool_calls
                .iter()
                .flatten()
                .map(|call| call.function.name.as_str())
                .find(|name| *name == TOOL_NAME);
            validate::tool_call_verdict(called, "Tool Call OK", "tool_calls", content.unwrap_or(""))
        }
        Expectation::Text => validate::text_verdict(content),
    }
}

#[derive(Debug, Deserialize)]
struct ModelList {
    data: Vec<Value>,
}

/// `GET /v1/models`; also the shape of the switch and group listings.
pub fn validate_model_list(status: i32, body: &str) -> Verdict {
    let object = match validate::parse_object(Protocol::OpenAI, status, body) {
        Ok(object) => object,
        Err(verdict) => return verdict,
    };
    if !object.contains_key("data") {
        return Verdict::fail(FaultKind::Shape, "Missing 'data' in OpenAI model list");
    }
    match validate::decode::<ModelList>(Protocol::OpenAI, object) {
        Ok(list) => Verdict::pass(
            format!("HTTP {}, {} models", status, list.data.len()),
            Extracted::Count(list.data.len()),
        ),
        Err(verdict) => verdict,
    }
}

/// Embedding request, `{model, input}`. Ollama's `/api/embed` takes the same body.
#[derive(Debug, Clone, Serialize)]
pub struct EmbeddingRequest {
    pub model: String,
    pub input: String,
}

pub fn build_embedding_request(model: &str) -> EmbeddingRequest {
    EmbeddingRequest {
        model: model.to_string(),
        input: tool::EMBED_INPUT.to_string(),
    }
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f64>,
}

pub fn validate_embedding(status: i32, body: &str) -> Verdict {
    let object = match validate::parse_object(Protocol::OpenAI, status, body) {
        Ok(object) => object,
        Err(verdict) => return verdict,
    };
    if !object.contains_key("data") {
        return Verdict::fail(FaultKind::Shape, "Missing 'data' in OpenAI embedding response");
    }
    let response: EmbeddingResponse = match validate::decode(Protocol::OpenAI, object) {
        Ok(response) => response,
        Err(verdict) => return verdict,
    };
    match response.data.first() {
        Some(item) if !item.embedding.is_empty() => embedding_verdict(item.embedding.len()),
        _ => Verdict::fail(FaultKind::Semantic, "Empty embedding"),
    }
}

pub(crate) fn embedding_verdict(dimensions: usize) -> Verdict {
    Verdict::pass(
        format!("Embedding OK, {} dimensions", dimensions),
        Extracted::Count(dimensions),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn chat_body(message: Value) -> String {
        json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [{"index": 0, "message": message, "finish_reason": "stop"}]
        })
        .to_string()
    }

    #[test]
    fn test_text_request_matches_wire_format() {
        let request = build_chat_request("code-small", Scenario::Text);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "model": "code-small",
                "messages": [{"role": "user", "content": "Hello, say 'Hi'"}],
                "stream": false
            })
        );
    }

    #[test]
    fn test_tool_request_declares_get_weather() {
        let value = serde_json::to_value(build_chat_request("m", Scenario::ToolUse)).unwrap();
        let tools = value["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0]["type"], "function");
        assert_eq!(tools[0]["function"]["name"], "get_weather");
        assert_eq!(tools[0]["function"]["parameters"]["required"], json!(["loc"]));
        assert_eq!(
            value["messages"][0]["content"],
            "Get weather for New York. Use the get_weather tool."
        );
    }

    #[test]
    fn test_validate_text_ok() {
        let body = chat_body(json!({"role": "assistant", "content": "Hi!"}));
        let verdict = validate_chat(200, &body, Expectation::Text);
        assert!(verdict.passed, "{}", verdict.message);
        assert_eq!(verdict.text(), Some("Hi!"));
    }

    #[test]
    fn test_validate_text_null_content() {
        let body = chat_body(json!({"role": "assistant", "content": null}));
        let verdict = validate_chat(200, &body, Expectation::Text);
        assert!(!verdict.passed);
        assert_eq!(verdict.message, "Empty content");
    }

    #[test]
    fn test_validate_tool_call_ok() {
        let body = chat_body(json!({
            "role": "assistant",
            "content": null,
            "tool_calls": [{
                "id": "call_1",
                "type": "function",
                "function": {"name": "get_weather", "arguments": "{\"loc\":\"New York, NY\"}"}
            }]
        }));
        let verdict = validate_chat(200, &body, Expectation::ToolCall);
        assert!(verdict.passed, "{}", verdict.message);
        assert_eq!(verdict.message, "Tool Call OK");
        assert_eq!(verdict.tool_name(), Some("get_weather"));
    }

    #[test]
    fn test_validate_tool_call_wrong_name() {
        let body = chat_body(json!({
            "role": "assistant",
            "content": "",
            "tool_calls": [{"function": {"name": "get_time", "arguments": "{}"}}]
        }));
        let verdict = validate_chat(200, &body, Expectation::ToolCall);
        assert!(!verdict.passed);
        assert_eq!(verdict.fault, Some(FaultKind::Semantic));
    }

    #[test]
    fn test_validate_tool_call_declined() {
        let body = chat_body(json!({"role": "assistant", "content": "I cannot browse."}));
        let verdict = validate_chat(200, &body, Expectation::ToolCall);
        assert!(!verdict.passed);
        assert_eq!(
            verdict.message,
            "tool_calls missing. Model said: I cannot browse."
        );
    }

    #[test]
    fn test_validate_empty_choices() {
        let verdict = validate_chat(200, r#"{"choices":[]}"#, Expectation::Text);
        assert!(!verdict.passed);
        assert_eq!(verdict.fault, Some(FaultKind::Semantic));
        assert!(verdict.message.contains("Empty 'choices'"));
    }

    #[test]
    fn test_validate_missing_choices() {
        let verdict = validate_chat(200, r#"{"id":"x"}"#, Expectation::Text);
        assert_eq!(verdict.fault, Some(FaultKind::Shape));
        assert_eq!(verdict.message, "Missing 'choices' in OpenAI response");
    }

    #[test]
    fn test_validate_choice_without_message_is_decode_fault() {
        let verdict = validate_chat(200, r#"{"choices":[{"index":0}]}"#, Expectation::Text);
        assert_eq!(verdict.fault, Some(FaultKind::Decode));
        assert!(verdict.message.contains("message"));
    }

    #[test]
    fn test_validate_claude_body_is_mismatch() {
        let body = r#"{"type":"message","content":[{"type":"text","text":"Hi"}]}"#;
        let verdict = validate_chat(200, body, Expectation::Text);
        assert_eq!(verdict.fault, Some(FaultKind::ProtocolMismatch));
        assert!(verdict.message.contains("Claude"));
    }

    #[test]
    fn test_validate_error_status() {
        let verdict = validate_chat(401, r#"{"error":"bad key"}"#, Expectation::Text);
        assert!(!verdict.passed);
        assert!(verdict.message.contains("401"));
    }

    #[test]
    fn test_model_list() {
        let body = r#"{"object":"list","data":[{"id":"a"},{"id":"b"}]}"#;
        let verdict = validate_model_list(200, body);
        assert!(verdict.passed);
        assert_eq!(verdict.message, "HTTP 200, 2 models");

        assert!(!validate_model_list(200, r#"{"models":[]}"#).passed);
    }

    #[test]
    fn test_embedding() {
        let body = r#"{"object":"list","data":[{"object":"embedding","embedding":[0.1,0.2,0.3],"index":0}]}"#;
        let verdict = validate_embedding(200, body);
        assert!(verdict.passed);
        assert_eq!(verdict.extracted, Some(Extracted::Count(3)));

        let empty = validate_embedding(200, r#"{"data":[]}"#);
        assert_eq!(empty.fault, Some(FaultKind::Semantic));
    }

    #[test]
    fn test_embedding_request_body() {
        assert_eq!(
            serde_json::to_value(build_embedding_request("embed")).unwrap(),
            json!({"model": "embed", "input": "hello"})
        );
    }
}
