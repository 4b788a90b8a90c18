use crate::client::core::{SendsayClient, DEFAULT_API_URL};
use crate::client::credentials::{Auth, Credentials, CredentialsProvider};
use crate::client::policy::RetryPolicy;
use crate::client::types::CancelHandle;
use crate::transport::{ClientCertificate, HttpConfig, HttpTransport, Transport};
use crate::{Error, ErrorContext, Result};
use std::sync::Arc;
use std::time::Duration;

/// Builder for creating clients with custom configuration.
///
/// Credentials are either static or a provider; setting one replaces the other.
pub struct SendsayClientBuilder {
    api_url: String,
    auth: Auth,
    certificate: Option<ClientCertificate>,
    timeout: Option<Duration>,
    policy: RetryPolicy,
    transport: Option<Arc<dyn Transport>>,
    cancel: Option<CancelHandle>,
}

impl SendsayClientBuilder {
    pub fn new() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            auth: Auth::Anonymous,
            certificate: None,
            timeout: None,
            policy: RetryPolicy::default(),
            transport: None,
            cancel: None,
        }
    }

    /// Builder preloaded from the environment:
    ///
    /// - `SENDSAY_API_URL`
    /// - `SENDSAY_LOGIN`, `SENDSAY_SUBLOGIN`, `SENDSAY_PASSWORD`
    /// - `SENDSAY_CERT`, `SENDSAY_CERT_KEY`
    ///
    /// The HTTP timeout (`SENDSAY_HTTP_TIMEOUT_SECS`) is read by the transport itself.
    pub fn from_env() -> Result<Self> {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        let mut builder = Self::new();

        if let Some(url) = var("SENDSAY_API_URL") {
            builder = builder.api_url(url);
        }

        if let Some(login) = var("SENDSAY_LOGIN") {
            let password = var("SENDSAY_PASSWORD").ok_or_else(|| {
                Error::configuration_with_context(
                    "SENDSAY_LOGIN is set but SENDSAY_PASSWORD is missing",
                    ErrorContext::new()
                        .with_field_path("SENDSAY_PASSWORD")
                        .with_source("client_builder"),
                )
            })?;
            let sublogin = var("SENDSAY_SUBLOGIN").unwrap_or_default();
            builder = builder.credentials(Credentials::new(login, password).with_sublogin(sublogin));
        }

        if let Some(cert) = var("SENDSAY_CERT") {
            let mut certificate = ClientCertificate::new(cert);
            if let Some(key) = var("SENDSAY_CERT_KEY") {
                certificate = certificate.with_key(key);
            }
            builder = builder.client_certificate(certificate);
        }

        Ok(builder)
    }

    /// Base API URL. Defaults to `https://api.sendsay.ru`.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.auth = Auth::Static(credentials);
        self
    }

    /// Resolve credentials lazily, once per login attempt.
    pub fn credentials_provider(mut self, provider: impl CredentialsProvider + 'static) -> Self {
        self.auth = Auth::Provider(Arc::new(provider));
        self
    }

    pub fn client_certificate(mut self, certificate: ClientCertificate) -> Self {
        self.certificate = Some(certificate);
        self
    }

    /// Whole-request HTTP timeout (default 30s).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn max_auth_attempts(mut self, n: u32) -> Self {
        self.policy.max_auth_attempts = n;
        self
    }

    pub fn max_redirect_attempts(mut self, n: u32) -> Self {
        self.policy.max_redirect_attempts = n;
        self
    }

    /// Replace the HTTP transport (primarily for testing).
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn cancel_handle(mut self, handle: CancelHandle) -> Self {
        self.cancel = Some(handle);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<SendsayClient> {
        let parsed = url::Url::parse(&self.api_url).map_err(|e| {
            Error::configuration_with_context(
                "invalid API URL",
                ErrorContext::new()
                    .with_field_path("api_url")
                    .with_details(format!("{}: {}", self.api_url, e))
                    .with_source("client_builder"),
            )
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::configuration_with_context(
                "API URL must use http or https",
                ErrorContext::new()
                    .with_field_path("api_url")
                    .with_details(self.api_url.clone())
                    .with_source("client_builder"),
            ));
        }

        if let Auth::Static(credentials) = &self.auth {
            if credentials.login.is_empty() {
                return Err(Error::configuration_with_context(
                    "login must not be empty",
                    ErrorContext::new()
                        .with_field_path("credentials.login")
                        .with_source("client_builder"),
                ));
            }
        }

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new(&HttpConfig {
                timeout: self.timeout,
                certificate: self.certificate,
            })?),
        };

        // Redirect prefixes are absolute paths, so the base must not end with '/'.
        let api_url = self.api_url.trim_end_matches('/').to_string();

        Ok(SendsayClient::from_parts(
            api_url,
            self.auth,
            transport,
            self.policy,
            self.cancel,
        ))
    }
}

impl Default for SendsayClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
