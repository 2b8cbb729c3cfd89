//! Error types for transport operations.

use std::error::Error as StdError;
use std::time::Duration;
use thiserror::Error;

/// Network-level failures. These never escape [`Transport::send`]; they are
/// folded into an [`Exchange`] with the failure status.
///
/// [`Transport::send`]: super::Transport::send
/// [`Exchange`]: super::Exchange
#[derive(Error, Debug)]
pub enum TransportError {
    /// Request exceeded deadline.
    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    /// Connection refused, DNS failure, TLS failure.
    #[error("Connection error: {0}")]
    Connect(String),

    /// Any other failure while sending the request.
    #[error("Request error: {0}")]
    Request(String),

    /// Response headers arrived but the body could not be read.
    #[error("Failed to read response body: {0}")]
    Body(String),

    /// Header name or value rejected before sending.
    #[error("Invalid header '{0}'")]
    InvalidHeader(String),

    /// HTTP client could not be constructed.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl TransportError {
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(timeout.as_millis() as u64)
        } else if err.is_connect() {
            TransportError::Connect(error_chain(&err))
        } else {
            TransportError::Request(error_chain(&err))
        }
    }

    /// The client timeout also covers reading the body, so a stalled body
    /// is still a timeout.
    pub(crate) fn from_body(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(timeout.as_millis() as u64)
        } else {
            TransportError::Body(error_chain(&err))
        }
    }
}

/// reqwest keeps the useful detail (e.g. "Connection refused") in the
/// source chain, so flatten it into one line.
fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
