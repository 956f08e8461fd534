//! Transport seam.
//!
//! The SDK only needs "POST this document, give me the status and body back". Timeouts,
//! proxies, retries and pooling belong to the implementation behind [`Transport`];
//! [`HttpTransport`] is the stock `reqwest` one.

pub mod http;

pub use http::HttpTransport;

use crate::Result;
use async_trait::async_trait;

/// Raw HTTP outcome of one exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Option<String>,
}

impl TransportResponse {
    pub fn new(status: u16, body: Option<String>) -> Self {
        Self { status, body }
    }

    /// A 200 response with `body`.
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, Some(body.into()))
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// POST one request document to the API endpoint.
    ///
    /// Connection-level failures are returned as [`crate::Error::Communication`]; HTTP
    /// error statuses are returned as a normal response for the caller to classify.
    async fn post(&self, body: String) -> Result<TransportResponse>;
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status}")]
    Status { status: u16, body: Option<String> },

    #[error("Transport error: {0}")]
    Other(String),
}

impl TransportError {
    /// HTTP status of the failed exchange, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Http(e) => e.status().map(|s| s.as_u16()),
            TransportError::Status { status, .. } => Some(*status),
            TransportError::Other(_) => None,
        }
    }
}
