//! Wire types of the Sendsay JSON API.
//!
//! Every call is a `request` object (`action` plus action-specific fields and, for
//! authenticated clients, `session`). Every answer is an envelope that is exactly one of:
//!
//! | Shape | Meaning |
//! |-------|---------|
//! | `errors: [...]` / `error: {...}` | business error, see [`ErrorItem`] |
//! | `REDIRECT: "<prefix>"` | the handler moved, re-issue against the new prefix |
//! | anything else | success payload |
//!
//! Action payloads (`issue.send`, `sys.settings.get`, ...) are kept as plain [`Params`] maps.

pub mod envelope;

pub use envelope::{
    ErrorItem, Params, RequestEnvelope, ResponseEnvelope, LOGIN_ACTION, TRACK_GET_ACTION,
};
