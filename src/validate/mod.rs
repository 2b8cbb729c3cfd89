//! Response classification shared by every protocol.
//!
//! A validator is a pure function of `(status, body, expectation)` that
//! always returns a [`Verdict`]. The steps every protocol shares live here:
//!
//! 1. status gate (transport failure, non-200)
//! 2. JSON object decode
//! 3. cross-protocol contamination check
//! 4. envelope presence check
//!
//! Protocol modules then decode their typed envelope and run the scenario
//! branch using [`text_verdict`] and [`tool_call_verdict`].

use crate::logging::{snippet, truncate_chars};
use crate::protocol::Protocol;
use crate::transport::TRANSPORT_FAILURE;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Characters of body kept in status-failure diagnostics.
pub const BODY_PREVIEW_CHARS: usize = 100;
/// Characters of model text kept in pass messages.
pub const TEXT_PREVIEW_CHARS: usize = 25;

/// JSON object of a decoded response body.
pub type JsonObject = Map<String, Value>;

/// Failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    /// Connection, DNS or timeout; no HTTP response
    Transport,
    /// HTTP status other than 200
    Status,
    /// Body is not valid JSON or a nested field has the wrong type
    Decode,
    /// Well-formed JSON without the protocol's envelope field
    Shape,
    /// Envelope present, required text or tool call missing
    Semantic,
    /// Body shaped like a different protocol
    ProtocolMismatch,
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FaultKind::Transport => "transport",
            FaultKind::Status => "status",
            FaultKind::Decode => "decode",
            FaultKind::Shape => "shape",
            FaultKind::Semantic => "semantic",
            FaultKind::ProtocolMismatch => "protocol-mismatch",
        };
        f.write_str(label)
    }
}

/// Value pulled out of a passing response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Extracted {
    /// Assistant text
    Text(String),
    /// Name of the invoked tool
    ToolCall(String),
    /// Number of models or embedding dimensions
    Count(usize),
}

/// What a chat response must contain to pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expectation {
    Text,
    ToolCall,
}

impl Expectation {
    /// Tool scenarios and compat routes both require a tool call.
    pub fn new(is_tool: bool, is_compat: bool) -> Self {
        if is_tool || is_compat {
            Expectation::ToolCall
        } else {
            Expectation::Text
        }
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expectation::Text => f.write_str("text"),
            Expectation::ToolCall => f.write_str("tool_call"),
        }
    }
}

/// Pass/fail result of validating one response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub passed: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fault: Option<FaultKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted: Option<Extracted>,
}

impl Verdict {
    pub fn pass(message: impl Into<String>, extracted: Extracted) -> Self {
        Self {
            passed: true,
            message: message.into(),
            fault: None,
            extracted: Some(extracted),
        }
    }

    pub fn fail(fault: FaultKind, message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
            fault: Some(fault),
            extracted: None,
        }
    }

    /// Extracted assistant text, if the verdict passed on text.
    pub fn text(&self) -> Option<&str> {
        match &self.extracted {
            Some(Extracted::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Extracted tool name, if the verdict passed on a tool call.
    pub fn tool_name(&self) -> Option<&str> {
        match &self.extracted {
            Some(Extracted::ToolCall(name)) => Some(name),
            _ => None,
        }
    }
}

/// Status gate plus JSON object decode.
///
/// Non-200 responses fail before any parsing so error pages and empty bodies
/// never reach the decoder.
pub fn parse_object(protocol: Protocol, status: i32, body: &str) -> Result<JsonObject, Verdict> {
    if status == TRANSPORT_FAILURE {
        return Err(Verdict::fail(
            FaultKind::Transport,
            format!(
                "HTTP {} (no response): {}",
                status,
                truncate_chars(body, BODY_PREVIEW_CHARS)
            ),
        ));
    }
    if status != 200 {
        return Err(Verdict::fail(
            FaultKind::Status,
            format!("HTTP {}: {}", status, truncate_chars(body, BODY_PREVIEW_CHARS)),
        ));
    }

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(other) => Err(Verdict::fail(
            FaultKind::Shape,
            format!(
                "Expected a JSON object in {} response, got {}",
                protocol.display_name(),
                json_type_name(&other)
            ),
        )),
        Err(e) => Err(Verdict::fail(
            FaultKind::Decode,
            format!("Invalid JSON in {} response: {}", protocol.display_name(), e),
        )),
    }
}

/// Full shared pipeline for chat responses: [`parse_object`], then the
/// contamination and envelope-presence checks.
pub fn open_envelope(protocol: Protocol, status: i32, body: &str) -> Result<JsonObject, Verdict> {
    let object = parse_object(protocol, status, body)?;
    let field = protocol.envelope_field();

    if !object.contains_key(field) {
        if let Some(foreign) = detect_foreign_protocol(protocol, &object) {
            return Err(Verdict::fail(
                FaultKind::ProtocolMismatch,
                format!(
                    "Protocol Error: protocol mismatch, received {} format but expected {}",
                    foreign.display_name(),
                    protocol.display_name()
                ),
            ));
        }
        return Err(Verdict::fail(
            FaultKind::Shape,
            format!("Missing '{}' in {} response", field, protocol.display_name()),
        ));
    }

    Ok(object)
}

/// First other protocol whose signature field is present in `object`.
pub fn detect_foreign_protocol(expected: Protocol, object: &JsonObject) -> Option<Protocol> {
    Protocol::ALL
        .into_iter()
        .filter(|p| *p != expected)
        .find(|p| p.has_signature(object))
}

/// Decode the envelope into a protocol's typed response.
pub fn decode<T: DeserializeOwned>(protocol: Protocol, object: JsonObject) -> Result<T, Verdict> {
    serde_json::from_value(Value::Object(object)).map_err(|e| {
        Verdict::fail(
            FaultKind::Decode,
            format!("Malformed {} response: {}", protocol.display_name(), e),
        )
    })
}

/// Text branch: the extracted text must be non-empty.
pub fn text_verdict(text: Option<&str>) -> Verdict {
    match text {
        Some(text) if !text.is_empty() => Verdict::pass(
            format!("Text: {}...", snippet(text, TEXT_PREVIEW_CHARS)),
            Extracted::Text(text.to_string()),
        ),
        _ => Verdict::fail(FaultKind::Semantic, "Empty content"),
    }
}

/// Tool branch: `called` is the tool name found at the protocol's tool-call
/// location, `said` the assistant's free text for the diagnostic.
pub fn tool_call_verdict(
    called: Option<&str>,
    ok_message: &str,
    missing_field: &str,
    said: &str,
) -> Verdict {
    match called {
        Some(name) => Verdict::pass(ok_message, Extracted::ToolCall(name.to_string())),
        None => Verdict::fail(
            FaultKind::Semantic,
            format!(
                "{} missing. Model said: {}",
                missing_field,
                truncate_chars(said, BODY_PREVIEW_CHARS)
            ),
        ),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
