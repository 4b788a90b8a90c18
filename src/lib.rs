//! # sendsay-api
//!
//! Client library for the Sendsay marketing-automation API.
//!
//! ## Overview
//!
//! Every API call is a named action with a JSON payload, posted as a form to a single
//! endpoint. The client takes care of the protocol plumbing around it:
//!
//! - **Sessions**: logs in lazily with a login/password (or a [`CredentialsProvider`]) and
//!   attaches the session to every call
//! - **Re-authentication**: when the server reports the session expired, logs in again and
//!   re-issues the call, at most [`DEFAULT_MAX_ATTEMPTS`] times
//! - **Redirects**: follows `REDIRECT` answers and remembers the new prefix, also bounded
//! - **Async jobs**: [`tracking::Track`] polls `track.get` and decodes job status codes
//! - **Attachments**: [`attachment::attach_file`] encodes files for letters
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sendsay_api::{Credentials, SendsayClient};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> sendsay_api::Result<()> {
//!     let mut client = SendsayClient::builder()
//!         .credentials(Credentials::new("login", "password"))
//!         .build()?;
//!
//!     let settings = client.request("sys.settings.get", json!({})).await?;
//!     println!("{:?}", settings.get("list"));
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Session manager, builder, credentials |
//! | [`transport`] | Single-shot HTTP exchange and envelope decoding |
//! | [`tracking`] | Asynchronous job tracking |
//! | [`types`] | Request/response envelopes |
//! | [`attachment`] | File attachment encoding |
//!
//! The library only emits `tracing` events; installing a subscriber is up to the application.

pub mod attachment;
pub mod client;
pub mod tracking;
pub mod transport;
pub mod types;

pub use attachment::{attach_file, Attachment};
pub use client::{
    Auth, CancelHandle, Credentials, CredentialsProvider, KeyringCredentials, Response,
    RetryPolicy, SendsayClient, SendsayClientBuilder, SessionSnapshot, DEFAULT_API_URL,
    DEFAULT_MAX_ATTEMPTS,
};
pub use tracking::{PollResult, Track, TrackId, TrackStatus, WaitOptions, WaitOutcome};
pub use types::{ErrorItem, Params};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
