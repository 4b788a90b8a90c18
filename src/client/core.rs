use crate::client::credentials::Auth;
use crate::client::policy::{Decision, RetryPolicy};
use crate::client::response::Response;
use crate::client::types::{CancelHandle, SessionSnapshot};
use crate::transport::Transport;
use crate::types::{ErrorItem, Params, RequestEnvelope, ResponseEnvelope, LOGIN_ACTION};
use crate::{Error, ErrorContext, Result};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Default API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.sendsay.ru";

#[derive(Debug, Default)]
struct SessionState {
    session: Option<String>,
    redirect_prefix: String,
    auth_attempts: u32,
    redirect_attempts: u32,
}

/// An exchange that ended without a further redirect.
enum Completion {
    Success(Params),
    Errors(Vec<ErrorItem>),
}

/// Sendsay API client.
///
/// Owns the session token, the redirect prefix and both retry budgets. Every method that can
/// touch the network takes `&mut self`: one client runs one logical request at a time. Use one
/// client per task for parallelism.
pub struct SendsayClient {
    pub(crate) api_url: String,
    pub(crate) auth: Auth,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) policy: RetryPolicy,
    pub(crate) cancel: Option<CancelHandle>,
    state: SessionState,
}

impl SendsayClient {
    pub(crate) fn from_parts(
        api_url: String,
        auth: Auth,
        transport: Arc<dyn Transport>,
        policy: RetryPolicy,
        cancel: Option<CancelHandle>,
    ) -> Self {
        Self {
            api_url,
            auth,
            transport,
            policy,
            cancel,
            state: SessionState::default(),
        }
    }

    /// Anonymous client against [`DEFAULT_API_URL`].
    pub fn new() -> Result<Self> {
        crate::client::builder::SendsayClientBuilder::new().build()
    }

    pub fn builder() -> crate::client::builder::SendsayClientBuilder {
        crate::client::builder::SendsayClientBuilder::new()
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated()
    }

    /// Cached session token, if a login has happened and the session was not invalidated since.
    pub fn session(&self) -> Option<&str> {
        self.state.session.as_deref()
    }

    /// Prefix the server last redirected us to (empty until the first redirect).
    pub fn redirect_prefix(&self) -> &str {
        &self.state.redirect_prefix
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session: self.state.session.clone(),
            redirect_prefix: self.state.redirect_prefix.clone(),
            auth_attempts: self.state.auth_attempts,
            redirect_attempts: self.state.redirect_attempts,
        }
    }

    /// Log in explicitly and cache the session. Resets the auth budget.
    pub async fn login(&mut self) -> Result<String> {
        let session = self.authenticate().await?;
        self.state.auth_attempts = 0;
        Ok(session)
    }

    /// Liveness probe. Works for anonymous clients.
    pub async fn ping(&mut self) -> Result<Response> {
        self.request("ping", Params::new()).await
    }

    /// Call an API action.
    ///
    /// `params` must serialize to a JSON object (or `null`/`()` for no fields). For
    /// authenticated clients the session is attached automatically, re-obtained when the
    /// server reports it expired, and redirects are followed, both within the configured
    /// [`RetryPolicy`].
    pub async fn request<P: Serialize>(&mut self, action: &str, params: P) -> Result<Response> {
        let params = to_params(params)?;

        let data = if action == LOGIN_ACTION {
            self.login_exchange(params).await?.0
        } else {
            let outcome = self.execute(action, &params).await;
            self.state.auth_attempts = 0;
            outcome?
        };

        Ok(Response::new(data))
    }

    async fn execute(&mut self, action: &str, params: &Params) -> Result<Params> {
        loop {
            let mut request = RequestEnvelope::new(action, params.clone());
            if self.auth.is_authenticated() {
                let session = match self.state.session.clone() {
                    Some(session) => session,
                    None => self.authenticate().await?,
                };
                request = request.with_session(session);
            }

            match self.exchange(&request).await? {
                Completion::Success(data) => return Ok(data),
                Completion::Errors(errors) if errors.iter().any(ErrorItem::is_session_expired) => {
                    match self.policy.on_session_expired(self.state.auth_attempts) {
                        Decision::Retry => {
                            self.state.auth_attempts += 1;
                            self.state.session = None;
                            debug!(
                                action,
                                attempt = self.state.auth_attempts,
                                "session expired, logging in again"
                            );
                            self.ensure_not_cancelled()?;
                        }
                        Decision::Fail => {
                            warn!(
                                action,
                                limit = self.policy.max_auth_attempts,
                                "giving up re-authentication"
                            );
                            return Err(Error::TooManyAuthAttempts {
                                limit: self.policy.max_auth_attempts,
                            });
                        }
                    }
                }
                Completion::Errors(errors) => return Err(Error::Api { errors }),
            }
        }
    }

    async fn authenticate(&mut self) -> Result<String> {
        let credentials = self.auth.resolve()?;
        debug!(login = %credentials.login, sublogin = %credentials.sublogin, "logging in");
        let (_, session) = self.login_exchange(credentials.to_params()).await?;
        Ok(session)
    }

    /// A login never retries on the expiry sentinel: it is a terminal error here.
    async fn login_exchange(&mut self, params: Params) -> Result<(Params, String)> {
        let request = RequestEnvelope::new(LOGIN_ACTION, params);
        let data = match self.exchange(&request).await? {
            Completion::Success(data) => data,
            Completion::Errors(errors) => return Err(Error::Api { errors }),
        };

        let session = match data.get("session") {
            Some(Value::String(session)) => session.clone(),
            _ => return Err(Error::MissingSessionInLoginResponse),
        };
        self.state.session = Some(session.clone());
        Ok((data, session))
    }

    /// One logical exchange, following redirects. The redirect budget is scoped to it.
    async fn exchange(&mut self, request: &RequestEnvelope) -> Result<Completion> {
        let outcome = self.follow_redirects(request).await;
        self.state.redirect_attempts = 0;
        outcome
    }

    async fn follow_redirects(&mut self, request: &RequestEnvelope) -> Result<Completion> {
        loop {
            let url = format!("{}{}", self.api_url, self.state.redirect_prefix);
            match self.transport.post(&url, request).await? {
                ResponseEnvelope::Success(data) => return Ok(Completion::Success(data)),
                ResponseEnvelope::Errors(errors) => return Ok(Completion::Errors(errors)),
                ResponseEnvelope::Redirect(prefix) => {
                    match self.policy.on_redirect(self.state.redirect_attempts) {
                        Decision::Retry => {
                            debug!(
                                action = request.action(),
                                from = %url,
                                prefix = %prefix,
                                "following redirect"
                            );
                            self.state.redirect_prefix = prefix;
                            self.state.redirect_attempts += 1;
                            self.ensure_not_cancelled()?;
                        }
                        Decision::Fail => {
                            warn!(
                                action = request.action(),
                                limit = self.policy.max_redirect_attempts,
                                "giving up following redirects"
                            );
                            return Err(Error::TooManyRedirects {
                                limit: self.policy.max_redirect_attempts,
                            });
                        }
                    }
                }
            }
        }
    }

    fn ensure_not_cancelled(&self) -> Result<()> {
        match &self.cancel {
            Some(handle) if handle.is_cancelled() => Err(Error::Cancelled),
            _ => Ok(()),
        }
    }
}

impl std::fmt::Debug for SendsayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SendsayClient")
            .field("api_url", &self.api_url)
            .field("auth", &self.auth)
            .field("policy", &self.policy)
            .field("redirect_prefix", &self.state.redirect_prefix)
            .field("has_session", &self.state.session.is_some())
            .finish()
    }
}

fn to_params<P: Serialize>(params: P) -> Result<Params> {
    match serde_json::to_value(params)? {
        Value::Object(fields) => Ok(fields),
        Value::Null => Ok(Params::new()),
        other => Err(Error::configuration_with_context(
            "request params must be a JSON object",
            ErrorContext::new()
                .with_field_path("params")
                .with_details(other.to_string())
                .with_source("request"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn params_accept_objects_and_unit() {
        assert_eq!(to_params(()).unwrap(), Params::new());
        assert_eq!(
            to_params(json!({"id": 5})).unwrap().get("id"),
            Some(&json!(5))
        );
    }

    #[test]
    fn params_reject_scalars() {
        assert!(matches!(
            to_params(json!([1, 2])),
            Err(Error::Configuration { .. })
        ));
        assert!(matches!(to_params("x"), Err(Error::Configuration { .. })));
    }
}
