//! Gemini-style generateContent, model listing and embedContent.
//!
//! The model name lives in the URL path, not the body, and the API key
//! travels as the `key` query parameter:
//! `{prefix}/v1beta/models/{model}:generateContent?key={key}`.
//! Tool invocations appear as `functionCall` parts of the first candidate.

use super::tool::{self, TOOL_DESCRIPTION, TOOL_NAME};
use super::{Protocol, Scenario};
use crate::validate::{self, Expectation, Extracted, FaultKind, Verdict};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub fn generate_content_url(base_url: &str, prefix: &str, model: &str, api_key: &str) -> String {
    keyed_url(
        format!("{}{}/v1beta/models/{}:generateContent", base_url, prefix, model),
        api_key,
    )
}

pub fn embed_content_url(base_url: &str, model: &str, api_key: &str) -> String {
    keyed_url(
        format!("{}/v1beta/models/{}:embedContent", base_url, model),
        api_key,
    )
}

pub fn models_url(base_url: &str, api_key: &str) -> String {
    keyed_url(format!("{}/v1beta/models", base_url), api_key)
}

/// Append `key` as a form-encoded query pair so the gateway decodes exactly
/// `api_key`. An unparseable URL is returned without the key; the transport
/// rejects it anyway.
fn keyed_url(url: String, api_key: &str) -> String {
    match Url::parse(&url) {
        Ok(mut parsed) => {
            parsed.query_pairs_mut().append_pair("key", api_key);
            parsed.into()
        }
        Err(e) => {
            tracing::debug!(url = %url, error = %e, "Cannot attach Gemini key to URL");
            url
        }
    }
}

/// generateContent request
#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolGroup>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Part {
    pub text: String,
}

/// One entry of `tools`, wrapping `functionDeclarations`
#[derive(Debug, Clone, Serialize)]
pub struct ToolGroup {
    #[serde(rename = "functionDeclarations")]
    pub function_declarations: Vec<FunctionDeclaration>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

pub fn build_chat_request(scenario: Scenario) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: "user".to_string(),
            parts: vec![Part {
                text: tool::prompt(scenario).to_string(),
            }],
        }],
        tools: scenario.is_tool().then(|| {
            vec![ToolGroup {
                function_declarations: vec![FunctionDeclaration {
                    name: TOOL_NAME.to_string(),
                    description: TOOL_DESCRIPTION.to_string(),
                    parameters: tool::parameters_schema(),
                }],
            }]
        }),
    }
}

/// generateContent response envelope
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(rename = "functionCall", default)]
    function_call: Option<FunctionCall>,
}

#[derive(Debug, Deserialize)]
struct FunctionCall {
    name: String,
}

pub fn validate_chat(status: i32, body: &str, expectation: Expectation) -> Verdict {
    let envelope = match validate::open_envelope(Protocol::Gemini, status, body) {
        Ok(envelope) => envelope,
        Err(verdict) => return verdict,
    };
    let response: GenerateContentResponse = match validate::decode(Protocol::Gemini, envelope) {
        Ok(response) => response,
        Err(verdict) => return verdict,
    };
    let Some(candidate) = response.candidates.first() else {
        return Verdict::fail(FaultKind::Semantic, "Empty 'candidates' in Gemini response");
    };

    let parts = &candidate.content.parts;
    let first_text = parts.iter().find_map(|p| p.text.as_deref());
    match expectation {
        Expectation::ToolCall => {
            let called = parts
                .iter()
                .filter_map(|p| p.function_call.as_ref())
                .map(|call| call.name.as_str())
                .find(|name| *name == TOOL_NAME);
            let said = if parts.is_empty() {
                "Empty"
            } else {
                first_text.unwrap_or("")
            };
            validate::tool_call_verdict(called, "Function Call OK", "functionCall", said)
        }
        Expectation::Text => validate::text_verdict(first_text),
    }
}

#[derive(Debug, Deserialize)]
struct ModelList {
    #[serde(default)]
    models: Vec<Value>,
}

/// `GET /v1beta/models`
pub fn validate_model_list(status: i32, body: &str) -> Verdict {
    let object = match validate::parse_object(Protocol::Gemini, status, body) {
        Ok(object) => object,
        Err(verdict) => return verdict,
    };
    if !object.contains_key("models") {
        return Verdict::fail(FaultKind::Shape, "Missing 'models' in Gemini model list");
    }
    match validate::decode::<ModelList>(Protocol::Gemini, object) {
        Ok(list) => Verdict::pass(
            format!("HTTP {}, {} models", status, list.models.len()),
            Extracted::Count(list.models.len()),
        ),
        Err(verdict) => verdict,
    }
}

/// embedContent request, `{content: {parts: [{text}]}}`
#[derive(Debug, Clone, Serialize)]
pub struct EmbedContentRequest {
    pub content: EmbedContent,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbedContent {
    pub parts: Vec<Part>,
}

pub fn build_embedding_request() -> EmbedContentRequest {
    EmbedContentRequest {
        content: EmbedContent {
            parts: vec![Part {
                text: tool::EMBED_INPUT.to_string(),
            }],
        },
    }
}

#[derive(Debug, Deserialize)]
struct EmbedContentResponse {
    embedding: ContentEmbedding,
}

#[derive(Debug, Deserialize)]
struct ContentEmbedding {
    values: Vec<f64>,
}

pub fn validate_embedding(status: i32, body: &str) -> Verdict {
    let object = match validate::parse_object(Protocol::Gemini, status, body) {
        Ok(object) => object,
        Err(verdict) => return verdict,
    };
    if !object.contains_key("embedding") {
        return Verdict::fail(
            FaultKind::Shape,
            "Missing 'embedding' in Gemini embedding response",
        );
    }
    let response: EmbedContentResponse = match validate::decode(Protocol::Gemini, object) {
        Ok(response) => response,
        Err(verdict) => return verdict,
    };
    if response.embedding.values.is_empty() {
        return Verdict::fail(FaultKind::Semantic, "Empty embedding");
    }
    super::openai::embedding_verdict(response.embedding.values.len())
}
