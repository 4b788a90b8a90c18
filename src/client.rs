//! Session-aware client for the Sendsay API.
//!
//! [`SendsayClient::request`] is the single entry point: it attaches the session, logs in
//! lazily, re-authenticates when the session expires and follows server redirects, each
//! bounded by a [`RetryPolicy`]. Implementation details are split into submodules under
//! `src/client/`.

pub mod builder;
pub mod core;
pub mod credentials;
mod policy;
pub mod response;
pub mod types;

pub use builder::SendsayClientBuilder;
pub use core::{SendsayClient, DEFAULT_API_URL};
pub use credentials::{Auth, Credentials, CredentialsProvider, KeyringCredentials};
pub use policy::{RetryPolicy, DEFAULT_MAX_ATTEMPTS};
pub use response::Response;
pub use types::{CancelHandle, SessionSnapshot};
