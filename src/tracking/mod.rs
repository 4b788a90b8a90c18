//! Tracking of asynchronous server-side jobs (mass mailings, imports, reports).
//!
//! Actions such as `issue.send` answer with a `track.id`. A [`Track`] polls `track.get`
//! through a [`crate::SendsayClient`] and decodes the numeric status:
//!
//! | Code | Status | Code | Status |
//! |------|--------|------|--------|
//! | -6 | `IS_NOT_MODERATED` | 0 | `ACCEPTED` |
//! | -5 | `ON_MODERATE` | 1 | `STARTED` |
//! | -4 | `WILL_BE_DONE_LATER` | 2 | `IN_PROCESS` |
//! | -3 | `CANCELED` | 3 | `SORTING` |
//! | -2 | `FINISHED_WITH_ERROR` | 4 | `FORMATING` |
//! | -1 | `FINISHED_WITH_SUCCESS` | 5 | `GENERATING_REPORT` |
//! | | | 6 | `CHECKING_FOR_SPAM` |
//!
//! [`Track::poll`] has no sleep, backoff or attempt cap. [`Track::wait`] is an optional
//! caller-side driver on top of it.
//!
//! ```rust,no_run
//! use sendsay_api::tracking::WaitOptions;
//! use sendsay_api::SendsayClient;
//! use serde_json::json;
//!
//! # async fn run() -> sendsay_api::Result<()> {
//! let mut client = SendsayClient::builder().build()?;
//! let response = client.request("issue.send", json!({"sendwhen": "now"})).await?;
//! if let Some(mut track) = response.track() {
//!     let outcome = track
//!         .wait(&mut client, &WaitOptions::default(), |poll| {
//!             println!("{}", poll.status_label());
//!         })
//!         .await?;
//!     println!("done: {:?}", outcome.last().status);
//! }
//! # Ok(())
//! # }
//! ```

mod status;
mod track;

pub use status::TrackStatus;
pub use track::{PollResult, Track, TrackId, WaitOptions, WaitOutcome};

#[derive(Debug, thiserror::Error)]
pub enum TrackingError {
    #[error("unknown tracking status code {code}")]
    UnknownStatusCode { code: i64 },

    #[error("track.get response for track {track_id} has no status")]
    MissingStatus { track_id: String },

    #[error("track.get returned a non-integer status: {value}")]
    InvalidStatus { value: String },
}
