//! HTTP transport for probing the gateway.
//!
//! [`Transport::send`] never fails: HTTP error statuses come back as ordinary
//! [`Exchange`] values and network-level faults (connection refused, DNS,
//! timeout) come back with the [`TRANSPORT_FAILURE`] status and the error
//! text as body.

mod error;

pub use error::TransportError;

use crate::logging::redact_api_key;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Method};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Status reported when no HTTP response was received at all.
pub const TRANSPORT_FAILURE: i32 = -1;

/// Identifying user agent attached to every request.
pub const HARNESS_USER_AGENT: &str = concat!("gatecheck/", env!("CARGO_PKG_VERSION"));

/// Caller-supplied request headers, name to value.
pub type Headers = BTreeMap<String, String>;

/// Request payload.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Serialized to JSON and sent with `Content-Type: application/json`
    Json(serde_json::Value),
    /// Sent as-is
    Text(String),
}

/// Outcome of one HTTP call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    /// HTTP status code, or [`TRANSPORT_FAILURE`]
    pub status: i32,
    /// Response body, or the transport error text
    pub body: String,
    pub elapsed: Duration,
}

impl Exchange {
    pub fn is_transport_failure(&self) -> bool {
        self.status == TRANSPORT_FAILURE
    }
}

/// Shared HTTP client with a bounded per-call timeout.
#[derive(Debug, Clone)]
pub struct Transport {
    client: Client,
    timeout: Duration,
}

impl Transport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Configuration(e.to_string()))?;
        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Perform one call and capture its outcome.
    pub async fn send(
        &self,
        method: Method,
        url: &str,
        headers: &Headers,
        body: Option<&RequestBody>,
    ) -> Exchange {
        let start = Instant::now();
        let result = self.try_send(method.clone(), url, headers, body).await;
        let elapsed = start.elapsed();

        match result {
            Ok((status, body)) => {
                tracing::debug!(
                    method = %method,
                    url = %redact_api_key(url),
                    status,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Gateway responded"
                );
                Exchange {
                    status: i32::from(status),
                    body,
                    elapsed,
                }
            }
            Err(e) => {
                tracing::info!(
                    method = %method,
                    url = %redact_api_key(url),
                    error = %e,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Transport failure"
                );
                Exchange {
                    status: TRANSPORT_FAILURE,
                    body: e.to_string(),
                    elapsed,
                }
            }
        }
    }

    async fn try_send(
        &self,
        method: Method,
        url: &str,
        headers: &Headers,
        body: Option<&RequestBody>,
    ) -> Result<(u16, String), TransportError> {
        let mut header_map = build_headers(headers)?;
        let mut request = self.client.request(method, url);

        match body {
            Some(RequestBody::Json(value)) => {
                let bytes = serde_json::to_vec(value)
                    .map_err(|e| TransportError::Request(e.to_string()))?;
                header_map.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                request = request.body(bytes);
            }
            Some(RequestBody::Text(text)) => {
                request = request.body(text.clone());
            }
            None => {}
        }

        let response = request
            .headers(header_map)
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(e, self.timeout))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::from_body(e, self.timeout))?;

        Ok((status, body))
    }
}

/// Caller headers first, then the fixed transport headers on top.
fn build_headers(headers: &Headers) -> Result<HeaderMap, TransportError> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| TransportError::InvalidHeader(name.clone()))?;
        let header_value =
            HeaderValue::from_str(value).map_err(|_| TransportError::InvalidHeader(name.clone()))?;
        map.insert(header_name, header_value);
    }
    map.insert(USER_AGENT, HeaderValue::from_static(HARNESS_USER_AGENT));
    map.insert(ACCEPT, HeaderValue::from_static("*/*"));
    Ok(map)
}
