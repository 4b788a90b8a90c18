//! Request and response envelopes of the Sendsay JSON API

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Action-specific request fields. The payload shape of each action is opaque to the client.
pub type Params = Map<String, Value>;

/// Action that exchanges credentials for a session.
pub const LOGIN_ACTION: &str = "login";

/// Action that reports the state of an asynchronous job.
pub const TRACK_GET_ACTION: &str = "track.get";

const SESSION_FIELD: &str = "session";
const ACTION_FIELD: &str = "action";
const EXPIRED_ERROR_ID: &str = "error/auth/failed";
const EXPIRED_EXPLAIN: &str = "expired";

/// A single server-reported error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorItem {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explain: Option<String>,
    /// Any other fields the server attached (e.g. `ref`).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ErrorItem {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            explain: None,
            extra: Map::new(),
        }
    }

    pub fn with_explain(mut self, explain: impl Into<String>) -> Self {
        self.explain = Some(explain.into());
        self
    }

    /// Lenient decoding: the server is not strict about `id`/`explain` types.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(mut fields) => {
                let id = fields.remove("id").map(value_to_string).unwrap_or_default();
                let explain = match fields.remove("explain") {
                    None | Some(Value::Null) => None,
                    Some(v) => Some(value_to_string(v)),
                };
                Self {
                    id,
                    explain,
                    extra: fields,
                }
            }
            other => Self::new(value_to_string(other)),
        }
    }

    /// `error/auth/failed` + `expired`: the session must be re-obtained.
    pub fn is_session_expired(&self) -> bool {
        self.id == EXPIRED_ERROR_ID && self.explain.as_deref() == Some(EXPIRED_EXPLAIN)
    }
}

fn value_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// The `request` part of an API call.
///
/// `session` is never serialized for the login action, whatever the caller put in.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestEnvelope {
    action: String,
    params: Params,
    session: Option<String>,
}

impl RequestEnvelope {
    pub fn new(action: impl Into<String>, params: Params) -> Self {
        Self {
            action: action.into(),
            params,
            session: None,
        }
    }

    pub fn with_session(mut self, session: impl Into<String>) -> Self {
        self.session = Some(session.into());
        self
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn is_login(&self) -> bool {
        self.action == LOGIN_ACTION
    }

    /// Session that will actually be sent.
    pub fn session(&self) -> Option<&str> {
        if self.is_login() {
            None
        } else {
            self.session.as_deref()
        }
    }

    /// Params with `action` (and `session`, when applicable) merged in.
    pub fn to_json(&self) -> Params {
        let mut body = self.params.clone();
        body.insert(ACTION_FIELD.to_string(), Value::String(self.action.clone()));
        match self.session() {
            Some(session) => {
                body.insert(SESSION_FIELD.to_string(), Value::String(session.to_string()));
            }
            None if self.is_login() => {
                body.remove(SESSION_FIELD);
            }
            None => {}
        }
        body
    }

    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.to_json())
    }
}

/// A decoded response, classified exactly once.
///
/// Precedence: `errors`/`error` wins over `REDIRECT`, which wins over success.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseEnvelope {
    Errors(Vec<ErrorItem>),
    Redirect(String),
    Success(Params),
}

impl ResponseEnvelope {
    pub fn classify(mut body: Params) -> Self {
        let errors = match body.remove("errors") {
            Some(Value::Array(items)) if !items.is_empty() => {
                Some(items.into_iter().map(ErrorItem::from_value).collect())
            }
            Some(Value::Array(_)) | Some(Value::Null) | None => None,
            Some(single) => Some(vec![ErrorItem::from_value(single)]),
        };
        let errors = errors.or_else(|| match body.get("error") {
            None | Some(Value::Null) => None,
            Some(single) => Some(vec![ErrorItem::from_value(single.clone())]),
        });
        if let Some(errors) = errors {
            return ResponseEnvelope::Errors(errors);
        }

        if let Some(Value::String(target)) = body.get("REDIRECT") {
            return ResponseEnvelope::Redirect(target.clone());
        }

        ResponseEnvelope::Success(body)
    }

    pub fn is_session_expired(&self) -> bool {
        match self {
            ResponseEnvelope::Errors(errors) => errors.iter().any(ErrorItem::is_session_expired),
            _ => false,
        }
    }
}
