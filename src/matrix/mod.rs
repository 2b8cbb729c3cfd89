//! Matrix runner.
//!
//! Sweeps the model-listing probes, the embedding probes and the chat
//! cross-product (protocol x route prefix x scenario) against one gateway,
//! strictly in sequence. A failing case never aborts the sweep; every case
//! ends up in the returned [`RunReport`].

pub mod case;
pub mod probes;
pub mod report;

pub use case::{CaseMeta, CaseReport, RequestSpec, Suite};
pub use probes::Probe;
pub use report::{RunReport, Summary};

use crate::config::{ConfigError, HarnessConfig};
use crate::logging::{redact_api_key, snippet};
use crate::protocol::{Protocol, RoutePrefix, Scenario};
use crate::transport::{Exchange, Headers, Transport, TransportError};
use crate::validate::{FaultKind, Verdict};
use chrono::Utc;
use reqwest::Method;
use std::time::Duration;
use thiserror::Error;

/// Errors that prevent a run from starting. Once running, faults are
/// recorded per case instead.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Receives progress while the matrix runs.
pub trait ReportSink {
    fn suite_started(&mut self, _suite: Suite) {}

    fn protocol_started(&mut self, _protocol: Protocol) {}

    fn case_finished(&mut self, case: &CaseReport);
}

/// Sink that discards progress.
#[derive(Debug, Default)]
pub struct NullSink;

impl ReportSink for NullSink {
    fn case_finished(&mut self, _case: &CaseReport) {}
}

/// Which suites and protocols to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    pub suites: Vec<Suite>,
    pub protocols: Vec<Protocol>,
}

impl Default for RunPlan {
    fn default() -> Self {
        Self {
            suites: Suite::ALL.to_vec(),
            protocols: Protocol::ALL.to_vec(),
        }
    }
}

impl RunPlan {
    /// Empty selections mean "everything". Order always follows the
    /// canonical sweep order, not the order given.
    pub fn new(suites: &[Suite], protocols: &[Protocol]) -> Self {
        let pick_suites = |s: &Suite| suites.is_empty() || suites.contains(s);
        let pick_protocols = |p: &Protocol| protocols.is_empty() || protocols.contains(p);
        Self {
            suites: Suite::ALL.into_iter().filter(pick_suites).collect(),
            protocols: Protocol::ALL.into_iter().filter(pick_protocols).collect(),
        }
    }

    pub fn includes_suite(&self, suite: Suite) -> bool {
        self.suites.contains(&suite)
    }

    pub fn includes_protocol(&self, protocol: Protocol) -> bool {
        self.protocols.contains(&protocol)
    }
}

/// Runs the conformance matrix against a single gateway.
pub struct MatrixRunner {
    config: HarnessConfig,
    transport: Transport,
    base_url: String,
}

impl MatrixRunner {
    pub fn new(config: HarnessConfig, transport: Transport) -> Self {
        let base_url = config.target.base_url();
        Self {
            config,
            transport,
            base_url,
        }
    }

    /// Validate `config` and build a transport from its timeout.
    pub fn from_config(config: HarnessConfig) -> Result<Self, SetupError> {
        config.validate()?;
        let transport = Transport::new(Duration::from_secs(config.target.timeout_seconds))?;
        Ok(Self::new(config, transport))
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The five route prefixes paired with the model alias each one uses.
    pub fn routes(&self) -> Vec<(RoutePrefix, String)> {
        let models = &self.config.models;
        RoutePrefix::all(&models.group_name)
            .into_iter()
            .map(|route| {
                let model = match route {
                    RoutePrefix::Default => &models.default,
                    RoutePrefix::Switch | RoutePrefix::SwitchCompat => &models.switch,
                    RoutePrefix::Group(_) | RoutePrefix::GroupCompat(_) => &models.group,
                };
                (route, model.clone())
            })
            .collect()
    }

    /// Chat cases for one protocol: each route in order, text then tool.
    pub fn chat_cases(&self, protocol: Protocol) -> Vec<RequestSpec> {
        self.routes()
            .into_iter()
            .flat_map(|(route, model)| {
                Scenario::ALL
                    .into_iter()
                    .map(move |scenario| RequestSpec::new(protocol, route.clone(), model.clone(), scenario))
            })
            .collect()
    }

    pub fn chat_url(&self, spec: &RequestSpec) -> String {
        spec.protocol.chat_url(
            &self.base_url,
            &spec.route,
            &spec.model,
            &self.config.target.api_key,
        )
    }

    /// Send one chat case and classify the response.
    pub async fn run_case(&self, spec: &RequestSpec, headers: &Headers) -> CaseReport {
        let url = self.chat_url(spec);
        let meta = CaseMeta {
            suite: Suite::Chat,
            protocol: spec.protocol,
            route: Some(spec.route.clone()),
            scenario: Some(spec.scenario),
            label: spec.label(),
            method: Method::POST.to_string(),
            url: redact_api_key(&url),
        };

        let body = match spec.build_request().to_body() {
            Ok(body) => body,
            Err(e) => return encoding_failure(meta, e),
        };

        let exchange = self
            .transport
            .send(Method::POST, &url, headers, Some(&body))
            .await;
        let expectation = spec.expectation(self.config.matrix.strict_compat);
        let verdict = spec
            .protocol
            .validate_chat(exchange.status, &exchange.body, expectation);

        self.finish(meta, verdict, &exchange)
    }

    /// Run all chat cases for one protocol. Headers are computed once per
    /// protocol; Gemini carries its key in the URL and sends none.
    pub async fn run_chat_protocol(
        &self,
        protocol: Protocol,
        sink: &mut dyn ReportSink,
    ) -> Vec<CaseReport> {
        sink.protocol_started(protocol);
        let headers = protocol.auth_headers(&self.config.target.api_key);

        let mut reports = Vec::new();
        for spec in self.chat_cases(protocol) {
            let report = self.run_case(&spec, &headers).await;
            sink.case_finished(&report);
            reports.push(report);
        }
        reports
    }

    pub async fn run_model_listing(&self, plan: &RunPlan, sink: &mut dyn ReportSink) -> Vec<CaseReport> {
        let probes = probes::model_list_probes(&self.config)
            .into_iter()
            .filter(|p| plan.includes_protocol(p.protocol))
            .collect();
        self.run_probes(probes, sink).await
    }

    pub async fn run_embeddings(&self, plan: &RunPlan, sink: &mut dyn ReportSink) -> Vec<CaseReport> {
        let probes = probes::embedding_probes(&self.config)
            .into_iter()
            .filter(|p| plan.includes_protocol(p.protocol))
            .collect();
        self.run_probes(probes, sink).await
    }

    async fn run_probes(&self, probes: Vec<Probe>, sink: &mut dyn ReportSink) -> Vec<CaseReport> {
        let mut reports = Vec::with_capacity(probes.len());
        for probe in probes {
            let report = match &probe.body {
                Ok(body) => {
                    let exchange = self
                        .transport
                        .send(probe.method.clone(), &probe.url, &probe.headers, body.as_ref())
                        .await;
                    let verdict = (probe.validator)(exchange.status, &exchange.body);
                    self.finish(probe.meta(), verdict, &exchange)
                }
                Err(e) => encoding_failure(probe.meta(), e),
            };
            sink.case_finished(&report);
            reports.push(report);
        }
        reports
    }

    /// Run every selected suite in order and collect the results.
    pub async fn run(&self, plan: &RunPlan, sink: &mut dyn ReportSink) -> RunReport {
        let started_at = Utc::now();
        tracing::info!(
            gateway = %self.base_url,
            suites = plan.suites.len(),
            protocols = plan.protocols.len(),
            timeout_secs = self.transport.timeout().as_secs(),
            "Starting conformance run"
        );

        let mut cases = Vec::new();
        for suite in &plan.suites {
            sink.suite_started(*suite);
            let reports = match suite {
                Suite::Models => self.run_model_listing(plan, sink).await,
                Suite::Embeddings => self.run_embeddings(plan, sink).await,
                Suite::Chat => {
                    let mut reports = Vec::new();
                    for protocol in &plan.protocols {
                        reports.extend(self.run_chat_protocol(*protocol, sink).await);
                    }
                    reports
                }
            };
            tracing::debug!(suite = %suite, cases = reports.len(), "Suite finished");
            cases.extend(reports);
        }

        let report = RunReport::new(self.base_url.clone(), started_at, cases);
        tracing::info!(
            total = report.summary.total,
            passed = report.summary.passed,
            failed = report.summary.failed,
            "Conformance run finished"
        );
        report
    }

    fn finish(&self, meta: CaseMeta, verdict: Verdict, exchange: &Exchange) -> CaseReport {
        if !verdict.passed {
            let body_chars = self.config.logging.failure_body_chars;
            tracing::debug!(
                label = %meta.label,
                protocol = %meta.protocol,
                status = exchange.status,
                message = %verdict.message,
                body = %snippet(&exchange.body, body_chars),
                "Case failed"
            );
        }
        CaseReport {
            meta,
            verdict,
            elapsed_ms: exchange.elapsed.as_millis() as u64,
        }
    }
}

/// A request that could not be encoded is never sent; it still gets a case.
fn encoding_failure(meta: CaseMeta, error: impl std::fmt::Display) -> CaseReport {
    tracing::error!(label = %meta.label, error = %error, "Failed to encode request");
    CaseReport {
        meta,
        verdict: Verdict::fail(
            FaultKind::Decode,
            format!("Failed to encode request: {}", error),
        ),
        elapsed_ms: 0,
    }
}
