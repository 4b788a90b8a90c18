//! Single-shot HTTP exchange with the API.
//!
//! A transport performs exactly one POST and classifies the answer. Redirect following,
//! re-login and retry budgets live in [`crate::client`].

mod http;

pub use http::{decode_body, request_id, ClientCertificate, HttpConfig, HttpTransport, CLIENT_VERSION};

use crate::types::{RequestEnvelope, ResponseEnvelope};
use crate::Result;
use async_trait::async_trait;

/// Seam between the session state machine and the network.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `request` to `url` (base URL with the current redirect prefix already applied).
    async fn post(&self, url: &str, request: &RequestEnvelope) -> Result<ResponseEnvelope>;
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The body is not JSON. The raw text is kept for diagnostics.
    #[error("cannot parse response (HTTP {status}): {reason}")]
    Parse {
        status: u16,
        body: String,
        reason: String,
    },

    #[error("unexpected response (HTTP {status}): expected a JSON object")]
    UnexpectedShape { status: u16, body: String },

    #[error("Transport error: {0}")]
    Other(String),
}

impl TransportError {
    /// Raw response body, when the failure happened after the body was read.
    pub fn body(&self) -> Option<&str> {
        match self {
            TransportError::Parse { body, .. } | TransportError::UnexpectedShape { body, .. } => {
                Some(body)
            }
            _ => None,
        }
    }
}
