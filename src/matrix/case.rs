//! Test case identity and per-case results.

use crate::protocol::{ChatRequest, Protocol, RoutePrefix, Scenario};
use crate::validate::{Expectation, Verdict};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Group of cases run together.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Suite {
    /// Model listing endpoints
    Models,
    /// Embedding endpoints
    Embeddings,
    /// Chat protocol x route x scenario matrix
    Chat,
}

impl Suite {
    pub const ALL: [Suite; 3] = [Suite::Models, Suite::Embeddings, Suite::Chat];

    pub fn title(&self) -> &'static str {
        match self {
            Suite::Models => "1. Model Listing",
            Suite::Embeddings => "2. Embeddings",
            Suite::Chat => "3. Chat Protocol Matrix",
        }
    }
}

impl fmt::Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Suite::Models => "models",
            Suite::Embeddings => "embeddings",
            Suite::Chat => "chat",
        };
        f.write_str(name)
    }
}

/// One chat case: fully determines the request and the expectation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestSpec {
    pub protocol: Protocol,
    pub route: RoutePrefix,
    pub model: String,
    pub scenario: Scenario,
}

impl RequestSpec {
    pub fn new(protocol: Protocol, route: RoutePrefix, model: impl Into<String>, scenario: Scenario) -> Self {
        Self {
            protocol,
            route,
            model: model.into(),
            scenario,
        }
    }

    pub fn build_request(&self) -> ChatRequest {
        self.protocol.build_chat_request(&self.model, self.scenario)
    }

    /// Tool cases on compat routes pass the compat flag through. Text cases
    /// only do so under `strict_compat`; by default they are checked as text.
    pub fn expectation(&self, strict_compat: bool) -> Expectation {
        match self.scenario {
            Scenario::ToolUse => Expectation::new(true, self.route.is_compat()),
            Scenario::Text => Expectation::new(false, strict_compat && self.route.is_compat()),
        }
    }

    /// `Text -> /switch` style label used in reports.
    pub fn label(&self) -> String {
        format!("{} -> {}", self.scenario.label(), self.route.label())
    }
}

/// Identity of one case, independent of its outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseMeta {
    pub suite: Suite,
    pub protocol: Protocol,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<RoutePrefix>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenario: Option<Scenario>,
    pub label: String,
    pub method: String,
    /// Target URL with the API key masked
    pub url: String,
}

/// Outcome of one case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseReport {
    #[serde(flatten)]
    pub meta: CaseMeta,
    pub verdict: Verdict,
    pub elapsed_ms: u64,
}

impl CaseReport {
    pub fn passed(&self) -> bool {
        self.verdict.passed
    }
}
