//! Model-listing and embedding probes.
//!
//! Each probe is a single request with its own validator; unlike the chat
//! matrix there is no route or scenario dimension.

use super::case::{CaseMeta, Suite};
use crate::config::HarnessConfig;
use crate::logging::redact_api_key;
use crate::protocol::{gemini, ollama, openai, Protocol};
use crate::transport::{Headers, RequestBody};
use crate::validate::Verdict;
use reqwest::Method;
use serde::Serialize;

/// Response validator for a probe.
pub type ProbeValidator = fn(i32, &str) -> Verdict;

/// A single prepared request plus the validator for its response.
#[derive(Debug, Clone)]
pub struct Probe {
    pub suite: Suite,
    pub protocol: Protocol,
    pub label: String,
    pub method: Method,
    pub url: String,
    pub headers: Headers,
    /// Request payload, or the error from encoding it
    pub body: Result<Option<RequestBody>, String>,
    pub validator: ProbeValidator,
}

impl Probe {
    pub fn meta(&self) -> CaseMeta {
        CaseMeta {
            suite: self.suite,
            protocol: self.protocol,
            route: None,
            scenario: None,
            label: self.label.clone(),
            method: self.method.to_string(),
            url: redact_api_key(&self.url),
        }
    }
}

/// Model listing probes, in report order.
pub fn model_list_probes(config: &HarnessConfig) -> Vec<Probe> {
    let base = config.target.base_url();
    let bearer = Protocol::OpenAI.auth_headers(&config.target.api_key);
    let group = &config.models.group_name;

    let list = |protocol, label: &str, url: String, validator: ProbeValidator| Probe {
        suite: Suite::Models,
        protocol,
        label: label.to_string(),
        method: Method::GET,
        url,
        headers: bearer.clone(),
        body: Ok(None),
        validator,
    };

    vec![
        list(
            Protocol::OpenAI,
            "OpenAI List",
            format!("{}/v1/models", base),
            openai::validate_model_list,
        ),
        list(
            Protocol::Ollama,
            "Ollama Tags",
            format!("{}/api/tags", base),
            ollama::validate_model_list,
        ),
        list(
            Protocol::Gemini,
            "Gemini Models",
            gemini::models_url(&base, &config.target.api_key),
            gemini::validate_model_list,
        ),
        list(
            Protocol::OpenAI,
            "Grouped List",
            format!("{}/{}/v1/models", base, group),
            openai::validate_model_list,
        ),
        list(
            Protocol::OpenAI,
            "Switch List",
            format!("{}/switch/v1/models", base),
            openai::validate_model_list,
        ),
    ]
}

/// Embedding probes, in report order.
pub fn embedding_probes(config: &HarnessConfig) -> Vec<Probe> {
    let base = config.target.base_url();
    let api_key = &config.target.api_key;
    let model = &config.models.embed;
    let bearer = Protocol::OpenAI.auth_headers(api_key);

    vec![
        Probe {
            suite: Suite::Embeddings,
            protocol: Protocol::OpenAI,
            label: "OpenAI Embed".to_string(),
            method: Method::POST,
            url: format!("{}/v1/embeddings", base),
            headers: bearer.clone(),
            body: json_body(&openai::build_embedding_request(model)),
            validator: openai::validate_embedding,
        },
        Probe {
            suite: Suite::Embeddings,
            protocol: Protocol::Gemini,
            label: "Gemini Embed".to_string(),
            method: Method::POST,
            url: gemini::embed_content_url(&base, model, api_key),
            headers: Headers::new(),
            body: json_body(&gemini::build_embedding_request()),
            validator: gemini::validate_embedding,
        },
        Probe {
            suite: Suite::Embeddings,
            protocol: Protocol::Ollama,
            label: "Ollama Embed".to_string(),
            method: Method::POST,
            url: format!("{}/api/embed", base),
            headers: bearer,
            body: json_body(&openai::build_embedding_request(model)),
            validator: ollama::validate_embedding,
        },
    ]
}

fn json_body<T: Serialize>(value: &T) -> Result<Option<RequestBody>, String> {
    serde_json::to_value(value)
        .map(|value| Some(RequestBody::Json(value)))
        .map_err(|e| e.to_string())
}
