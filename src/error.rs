use crate::tracking::TrackingError;
use crate::transport::TransportError;
use crate::types::ErrorItem;
use thiserror::Error;

/// Stable identifiers for client-side failures, shared with other Sendsay API clients.
pub mod ids {
    pub const JSON_PARSE_ERROR: &str = "sendsay_api_client/json_parse_error";
    pub const TOO_MANY_REDIRECTS: &str = "sendsay_api_client/too_many_redirect_attempts";
    pub const TOO_MANY_AUTH_ATTEMPTS: &str = "sendsay_api_client/too_many_auth_attempts";
    pub const NO_SESSION_IN_LOGIN_RESPONSE: &str =
        "sendsay_api_client/no_session_in_login_response";
    pub const UNKNOWN_TRACK_STATUS: &str = "sendsay_api_client/unknown_track_status";
    pub const TRANSPORT_ERROR: &str = "sendsay_api_client/transport_error";
    pub const CONFIGURATION_ERROR: &str = "sendsay_api_client/configuration_error";
    pub const CANCELLED: &str = "sendsay_api_client/cancelled";
    pub const IO_ERROR: &str = "sendsay_api_client/io_error";
}

/// Structured error context for configuration and credential failures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Configuration key or field that caused the error (e.g., "api_url", "SENDSAY_CERT")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., the rejected value)
    pub details: Option<String>,
    /// Component that raised the error (e.g., "client_builder", "keyring")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Unified error type for the Sendsay client.
///
/// Session expiry never shows up here: the client consumes it internally and either
/// re-authenticates or gives up with [`Error::TooManyAuthAttempts`].
#[derive(Debug, Error)]
pub enum Error {
    /// The server reported one or more business errors for the request.
    #[error("{}", format_items(.errors))]
    Api { errors: Vec<ErrorItem> },

    #[error("too many redirects (limit {limit})")]
    TooManyRedirects { limit: u32 },

    #[error("too many authentication attempts (limit {limit})")]
    TooManyAuthAttempts { limit: u32 },

    #[error("login response does not contain a session")]
    MissingSessionInLoginResponse,

    #[error("Network transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Tracking error: {0}")]
    Tracking(#[from] TrackingError),

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("request cancelled")]
    Cancelled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn format_items(errors: &[ErrorItem]) -> String {
    match errors.first() {
        Some(first) => format!("{}: {}", first.id, first.explain.as_deref().unwrap_or("")),
        None => "remote error".to_string(),
    }
}

fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Error::Configuration {
            message: msg.into(),
            context: ErrorContext::new(),
        }
    }

    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Stable identifier of the failure.
    ///
    /// For server errors this is the id of the first reported item, e.g. `error/auth/failed`.
    pub fn id(&self) -> &str {
        match self {
            Error::Api { errors } => errors.first().map(|e| e.id.as_str()).unwrap_or(""),
            Error::TooManyRedirects { .. } => ids::TOO_MANY_REDIRECTS,
            Error::TooManyAuthAttempts { .. } => ids::TOO_MANY_AUTH_ATTEMPTS,
            Error::MissingSessionInLoginResponse => ids::NO_SESSION_IN_LOGIN_RESPONSE,
            Error::Transport(TransportError::Parse { .. })
            | Error::Transport(TransportError::UnexpectedShape { .. })
            | Error::Serialization(_) => ids::JSON_PARSE_ERROR,
            Error::Transport(_) => ids::TRANSPORT_ERROR,
            Error::Tracking(_) => ids::UNKNOWN_TRACK_STATUS,
            Error::Configuration { .. } => ids::CONFIGURATION_ERROR,
            Error::Cancelled => ids::CANCELLED,
            Error::Io(_) => ids::IO_ERROR,
        }
    }

    /// Server-reported items, if this is a business error.
    pub fn errors(&self) -> Option<&[ErrorItem]> {
        match self {
            Error::Api { errors } => Some(errors),
            _ => None,
        }
    }

    /// Whether repeating the whole call later could plausibly succeed.
    ///
    /// Only network-level failures qualify; bound-exceeded and protocol errors are systemic.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Transport(TransportError::Http(_)))
    }

    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } => Some(context),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_displays_first_item() {
        let err = Error::Api {
            errors: vec![
                ErrorItem::new("error/letter/empty").with_explain("subject"),
                ErrorItem::new("error/other"),
            ],
        };
        assert_eq!(err.to_string(), "error/letter/empty: subject");
        assert_eq!(err.id(), "error/letter/empty");
        assert_eq!(err.errors().map(|e| e.len()), Some(2));
    }

    #[test]
    fn bound_errors_keep_client_ids() {
        assert_eq!(
            Error::TooManyAuthAttempts { limit: 10 }.id(),
            "sendsay_api_client/too_many_auth_attempts"
        );
        assert_eq!(
            Error::TooManyRedirects { limit: 10 }.id(),
            "sendsay_api_client/too_many_redirect_attempts"
        );
        assert_eq!(
            Error::MissingSessionInLoginResponse.id(),
            "sendsay_api_client/no_session_in_login_response"
        );
    }

    #[test]
    fn parse_failure_maps_to_json_parse_error() {
        let err = Error::from(TransportError::Parse {
            status: 502,
            body: "<html>bad gateway</html>".to_string(),
            reason: "expected value at line 1 column 1".to_string(),
        });
        assert_eq!(err.id(), ids::JSON_PARSE_ERROR);
        assert!(!err.is_retryable());
    }

    #[test]
    fn configuration_error_formats_context() {
        let err = Error::configuration_with_context(
            "invalid API URL",
            ErrorContext::new()
                .with_field_path("api_url")
                .with_source("client_builder"),
        );
        assert_eq!(
            err.to_string(),
            "Configuration error: invalid API URL (field: api_url, source: client_builder)"
        );
        assert_eq!(
            err.context().and_then(|c| c.field_path.as_deref()),
            Some("api_url")
        );
    }
}
