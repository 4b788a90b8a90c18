use super::{Transport, TransportError};
use crate::types::{RequestEnvelope, ResponseEnvelope};
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, error};
use uuid::Uuid;

/// Protocol version sent as `apiversion`.
pub const API_VERSION: u32 = 100;

/// Client identifier prefixed to every `request.id`.
pub const CLIENT_VERSION: &str = concat!("sendsay-rs/", env!("CARGO_PKG_VERSION"));

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Correlation id for a single POST: `<client-version>-<uuid v4>`.
pub fn request_id() -> String {
    format!("{}-{}", CLIENT_VERSION, Uuid::new_v4())
}

/// PEM client certificate for mutual TLS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCertificate {
    pub cert_path: PathBuf,
    /// Private key, when it is not bundled into `cert_path`.
    pub key_path: Option<PathBuf>,
}

impl ClientCertificate {
    pub fn new(cert_path: impl Into<PathBuf>) -> Self {
        Self {
            cert_path: cert_path.into(),
            key_path: None,
        }
    }

    pub fn with_key(mut self, key_path: impl Into<PathBuf>) -> Self {
        self.key_path = Some(key_path.into());
        self
    }

    fn identity(&self) -> Result<reqwest::Identity> {
        let mut pem = std::fs::read(&self.cert_path)?;
        if let Some(key_path) = &self.key_path {
            pem.push(b'\n');
            pem.extend(std::fs::read(key_path)?);
        }
        reqwest::Identity::from_pem(&pem).map_err(|e| {
            Error::configuration_with_context(
                "invalid client certificate",
                ErrorContext::new()
                    .with_field_path("client_certificate")
                    .with_details(format!("{}: {}", self.cert_path.display(), e))
                    .with_source("http_transport"),
            )
        })
    }
}

/// Settings of the underlying HTTP client.
#[derive(Debug, Clone, Default)]
pub struct HttpConfig {
    /// Whole-request timeout. Falls back to `SENDSAY_HTTP_TIMEOUT_SECS`, then 30s.
    pub timeout: Option<Duration>,
    pub certificate: Option<ClientCertificate>,
}

/// reqwest-backed transport.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let timeout = config.timeout.unwrap_or_else(|| {
            Duration::from_secs(
                env::var("SENDSAY_HTTP_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse::<u64>().ok())
                    .filter(|secs| *secs > 0)
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            )
        });

        let mut builder = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(CLIENT_VERSION);

        if let Some(certificate) = &config.certificate {
            builder = builder.identity(certificate.identity()?);
        }

        let client = builder
            .build()
            .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self { client })
    }

    fn form(request: &RequestEnvelope) -> Result<Vec<(&'static str, String)>> {
        Ok(vec![
            ("apiversion", API_VERSION.to_string()),
            ("json", "1".to_string()),
            ("request", request.encode()?),
            ("request.id", request_id()),
        ])
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, url: &str, request: &RequestEnvelope) -> Result<ResponseEnvelope> {
        debug!(url, action = request.action(), "sendsay request");

        let form = Self::form(request)?;
        let response = self
            .client
            .post(url)
            .form(&form)
            .send()
            .await
            .map_err(TransportError::Http)?;

        // The API answers with a JSON envelope regardless of the HTTP status.
        let status = response.status().as_u16();
        let body = response.text().await.map_err(TransportError::Http)?;

        Ok(decode_body(status, body)?)
    }
}

/// Parse and classify a raw response body.
pub fn decode_body(status: u16, body: String) -> std::result::Result<ResponseEnvelope, TransportError> {
    match serde_json::from_str::<Value>(&body) {
        Ok(Value::Object(fields)) => Ok(ResponseEnvelope::classify(fields)),
        Ok(_) => {
            error!(http_status = status, body = %body, "sendsay response is not a JSON object");
            Err(TransportError::UnexpectedShape { status, body })
        }
        Err(e) => {
            error!(http_status = status, body = %body, "can not parse sendsay response");
            Err(TransportError::Parse {
                status,
                body,
                reason: e.to_string(),
            })
        }
    }
}
