//! Login credentials and where they come from.

use crate::types::Params;
use crate::{Error, ErrorContext, Result};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Login, optional sublogin and password.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub login: String,
    pub sublogin: String,
    pub password: String,
}

impl Credentials {
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            sublogin: String::new(),
            password: password.into(),
        }
    }

    pub fn with_sublogin(mut self, sublogin: impl Into<String>) -> Self {
        self.sublogin = sublogin.into();
        self
    }

    /// Fields of the `login` request.
    pub fn to_params(&self) -> Params {
        let mut params = Params::new();
        params.insert("login".into(), Value::String(self.login.clone()));
        params.insert("sublogin".into(), Value::String(self.sublogin.clone()));
        params.insert("passwd".into(), Value::String(self.password.clone()));
        params
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("sublogin", &self.sublogin)
            .field("password", &"***")
            .finish()
    }
}

/// Supplies credentials on demand. Called once per login attempt.
pub trait CredentialsProvider: Send + Sync {
    fn credentials(&self) -> Result<Credentials>;
}

impl<F> CredentialsProvider for F
where
    F: Fn() -> Result<Credentials> + Send + Sync,
{
    fn credentials(&self) -> Result<Credentials> {
        self()
    }
}

/// Reads the password from the OS keyring (service `sendsay`, user = login by default).
#[derive(Debug, Clone)]
pub struct KeyringCredentials {
    service: String,
    login: String,
    sublogin: String,
}

impl KeyringCredentials {
    pub const DEFAULT_SERVICE: &'static str = "sendsay";

    pub fn new(login: impl Into<String>) -> Self {
        Self {
            service: Self::DEFAULT_SERVICE.to_string(),
            login: login.into(),
            sublogin: String::new(),
        }
    }

    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    pub fn with_sublogin(mut self, sublogin: impl Into<String>) -> Self {
        self.sublogin = sublogin.into();
        self
    }
}

impl CredentialsProvider for KeyringCredentials {
    fn credentials(&self) -> Result<Credentials> {
        let keyring_error = |e: keyring::Error| {
            Error::configuration_with_context(
                "cannot read password from keyring",
                ErrorContext::new()
                    .with_field_path(format!("{}/{}", self.service, self.login))
                    .with_details(e.to_string())
                    .with_source("keyring"),
            )
        };
        let password = keyring::Entry::new(&self.service, &self.login)
            .map_err(keyring_error)?
            .get_password()
            .map_err(keyring_error)?;
        Ok(Credentials::new(self.login.clone(), password).with_sublogin(self.sublogin.clone()))
    }
}

/// How a client authenticates.
#[derive(Clone, Default)]
pub enum Auth {
    /// No login; only anonymous actions such as `ping` succeed.
    #[default]
    Anonymous,
    Static(Credentials),
    Provider(Arc<dyn CredentialsProvider>),
}

impl Auth {
    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Auth::Anonymous)
    }

    pub(crate) fn resolve(&self) -> Result<Credentials> {
        match self {
            Auth::Anonymous => Err(Error::configuration_with_context(
                "client has no credentials configured",
                ErrorContext::new()
                    .with_field_path("credentials")
                    .with_source("login"),
            )),
            Auth::Static(credentials) => Ok(credentials.clone()),
            Auth::Provider(provider) => provider.credentials(),
        }
    }
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Auth::Anonymous => f.write_str("Anonymous"),
            Auth::Static(credentials) => f.debug_tuple("Static").field(credentials).finish(),
            Auth::Provider(_) => f.write_str("Provider(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn login_params_use_passwd_field() {
        let params = Credentials::new("acme", "secret")
            .with_sublogin("ops")
            .to_params();
        assert_eq!(params.get("login"), Some(&Value::from("acme")));
        assert_eq!(params.get("sublogin"), Some(&Value::from("ops")));
        assert_eq!(params.get("passwd"), Some(&Value::from("secret")));
        assert!(!params.contains_key("password"));
    }

    #[test]
    fn sublogin_defaults_to_empty() {
        assert_eq!(Credentials::new("acme", "secret").sublogin, "");
    }

    #[test]
    fn debug_hides_password() {
        let rendered = format!("{:?}", Auth::Static(Credentials::new("acme", "secret")));
        assert!(rendered.contains("acme"));
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn provider_is_called_on_every_resolve() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let auth = Auth::Provider(Arc::new(move || -> Result<Credentials> {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            Ok(Credentials::new(format!("user{n}"), "pw"))
        }));

        assert!(auth.is_authenticated());
        assert_eq!(auth.resolve().unwrap().login, "user0");
        assert_eq!(auth.resolve().unwrap().login, "user1");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn anonymous_cannot_resolve() {
        assert!(!Auth::Anonymous.is_authenticated());
        assert!(matches!(
            Auth::Anonymous.resolve(),
            Err(Error::Configuration { .. })
        ));
    }
}
