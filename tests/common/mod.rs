//! Shared test utilities for gatecheck integration tests.
//!
//! Provides a wiremock gateway that answers every endpoint the harness
//! probes with a well-formed response in the matching wire protocol, plus
//! canned response bodies for building misbehaving gateways.

#![allow(dead_code)]

use gatecheck::config::HarnessConfig;
use gatecheck::matrix::{CaseReport, MatrixRunner, ReportSink};
use gatecheck::protocol::Protocol;
use serde_json::{json, Value};
use wiremock::matchers::{body_string_contains, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// Well-Known Test Constants
// =============================================================================

pub const TEST_API_KEY: &str = "cs-test-key";

/// Chat cases per protocol: five routes, two scenarios each.
pub const CHAT_CASES_PER_PROTOCOL: usize = 10;

/// Model listing probes plus embedding probes.
pub const PROBE_COUNT: usize = 5 + 3;

/// Path regex for each protocol's chat endpoint below any route prefix.
pub fn chat_path_regex(protocol: Protocol) -> &'static str {
    match protocol {
        Protocol::OpenAI => r"/v1/chat/completions$",
        Protocol::Claude => r"/v1/messages$",
        Protocol::Gemini => r"/v1beta/models/[^/]+:generateContent$",
        Protocol::Ollama => r"/api/chat$",
    }
}

// =============================================================================
// Response Bodies
// =============================================================================

pub fn openai_text() -> Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "created": 1700000000,
        "model": "code-small",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": "Hi there!"},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 9, "completion_tokens": 3, "total_tokens": 12}
    })
}

pub fn openai_tool_call() -> Value {
    json!({
        "id": "chatcmpl-2",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": {"name": "get_weather", "arguments": "{\"loc\":\"New York, NY\"}"}
                }]
            },
            "finish_reason": "tool_calls"
        }]
    })
}

pub fn claude_text() -> Value {
    json!({
        "id": "msg_1",
        "type": "message",
        "role": "assistant",
        "model": "claude-haiku-4.5",
        "content": [{"type": "text", "text": "Hi!"}],
        "stop_reason": "end_turn"
    })
}

pub fn claude_tool_use() -> Value {
    json!({
        "id": "msg_2",
        "type": "message",
        "role": "assistant",
        "content": [
            {"type": "text", "text": "Checking the weather."},
            {"type": "tool_use", "id": "toolu_1", "name": "get_weather", "input": {"loc": "New York, NY"}}
        ],
        "stop_reason": "tool_use"
    })
}

pub fn gemini_text() -> Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": "Hi"}]},
            "finishReason": "STOP"
        }]
    })
}

pub fn gemini_function_call() -> Value {
    json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{"functionCall": {"name": "get_weather", "args": {"loc": "New York, NY"}}}]
            },
            "finishReason": "STOP"
        }]
    })
}

pub fn ollama_text() -> Value {
    json!({
        "model": "code-small",
        "created_at": "2025-01-01T00:00:00Z",
        "message": {"role": "assistant", "content": "Hi"},
        "done": true
    })
}

pub fn ollama_tool_call() -> Value {
    json!({
        "model": "code-small",
        "message": {
            "role": "assistant",
            "content": "",
            "tool_calls": [{"function": {"name": "get_weather", "arguments": {"loc": "New York, NY"}}}]
        },
        "done": true
    })
}

pub fn text_body(protocol: Protocol) -> Value {
    match protocol {
        Protocol::OpenAI => openai_text(),
        Protocol::Claude => claude_text(),
        Protocol::Gemini => gemini_text(),
        Protocol::Ollama => ollama_text(),
    }
}

pub fn tool_body(protocol: Protocol) -> Value {
    match protocol {
        Protocol::OpenAI => openai_tool_call(),
        Protocol::Claude => claude_tool_use(),
        Protocol::Gemini => gemini_function_call(),
        Protocol::Ollama => ollama_tool_call(),
    }
}

/// Marker present only in tool-scenario request bodies.
pub fn tool_marker(protocol: Protocol) -> &'static str {
    match protocol {
        Protocol::Gemini => "functionDeclarations",
        _ => "\"tools\"",
    }
}

// =============================================================================
// Mock Gateway
// =============================================================================

/// Mount model listing and embedding endpoints.
pub async fn mount_probe_endpoints(server: &MockServer) {
    let openai_list = json!({
        "object": "list",
        "data": [{"id": "code-small", "object": "model"}, {"id": "claude-haiku-4.5", "object": "model"}]
    });
    for list_path in ["/v1/models", "/glm/v1/models", "/switch/v1/models"] {
        Mock::given(method("GET"))
            .and(path(list_path))
            .respond_with(ResponseTemplate::new(200).set_body_json(openai_list.clone()))
            .mount(server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"models": [{"name": "code-small"}]})),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1beta/models"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"models": [{"name": "models/code-small"}]})),
        )
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "data": [{"object": "embedding", "embedding": [0.1, 0.2, 0.3], "index": 0}],
            "model": "embed"
        })))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/embed:embedContent"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"embedding": {"values": [0.1, 0.2, 0.3, 0.4]}})),
        )
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/embed"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"model": "embed", "embeddings": [[0.1, 0.2]]})),
        )
        .mount(server)
        .await;
}

/// Mount a well-behaved chat endpoint for `protocol` on every route prefix.
pub async fn mount_chat_endpoint(server: &MockServer, protocol: Protocol) {
    Mock::given(method("POST"))
        .and(path_regex(chat_path_regex(protocol)))
        .and(body_string_contains(tool_marker(protocol)))
        .respond_with(ResponseTemplate::new(200).set_body_json(tool_body(protocol)))
        .with_priority(1)
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex(chat_path_regex(protocol)))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_body(protocol)))
        .mount(server)
        .await;
}

/// A gateway that answers every probe and chat case correctly.
pub async fn healthy_gateway() -> MockServer {
    let server = MockServer::start().await;
    mount_probe_endpoints(&server).await;
    for protocol in Protocol::ALL {
        mount_chat_endpoint(&server, protocol).await;
    }
    server
}

// =============================================================================
// Harness Builders
// =============================================================================

/// Configuration pointing at a wiremock server.
pub fn config_for(server: &MockServer) -> HarnessConfig {
    let address = server.address();
    let mut config = HarnessConfig::default();
    config.target.host = address.ip().to_string();
    config.target.port = address.port();
    config.target.api_key = TEST_API_KEY.to_string();
    config.target.timeout_seconds = 5;
    config
}

pub fn runner_for(server: &MockServer) -> MatrixRunner {
    MatrixRunner::from_config(config_for(server)).unwrap()
}

/// Sink that records every callback in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<String>,
    pub cases: Vec<CaseReport>,
}

impl ReportSink for RecordingSink {
    fn suite_started(&mut self, suite: gatecheck::matrix::Suite) {
        self.events.push(format!("suite:{}", suite));
    }

    fn protocol_started(&mut self, protocol: Protocol) {
        self.events.push(format!("protocol:{}", protocol));
    }

    fn case_finished(&mut self, case: &CaseReport) {
        self.events.push(format!("case:{}", case.meta.label));
        self.cases.push(case.clone());
    }
}
