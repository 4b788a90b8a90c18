use super::{TrackStatus, TrackingError};
use crate::client::SendsayClient;
use crate::types::{Params, TRACK_GET_ACTION};
use crate::Result;
use serde_json::{json, Value};
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Opaque handle of a server-side job, sent back to `track.get` exactly as received.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackId(Value);

impl TrackId {
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for TrackId {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<i64> for TrackId {
    fn from(id: i64) -> Self {
        Self(Value::from(id))
    }
}

impl From<&str> for TrackId {
    fn from(id: &str) -> Self {
        Self(Value::from(id))
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{}", other),
        }
    }
}

/// Result of a single poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollResult {
    pub status: TrackStatus,
    /// `true` iff the status code is negative.
    pub finished: bool,
}

impl PollResult {
    pub fn status_code(&self) -> i64 {
        self.status.code()
    }

    pub fn status_label(&self) -> &'static str {
        self.status.label()
    }
}

/// Tracker of one asynchronous job.
///
/// Its state is a cache of the last successful poll; nothing is persisted. Polling takes
/// `&mut self`, so one tracker is never polled concurrently.
#[derive(Debug, Clone)]
pub struct Track {
    id: TrackId,
    status: Option<TrackStatus>,
    data: Option<Params>,
}

impl Track {
    pub fn new(id: impl Into<TrackId>) -> Self {
        Self {
            id: id.into(),
            status: None,
            data: None,
        }
    }

    pub fn id(&self) -> &TrackId {
        &self.id
    }

    /// Status from the last poll, `None` before the first one.
    pub fn status(&self) -> Option<TrackStatus> {
        self.status
    }

    /// `obj` payload of the last `track.get` answer.
    pub fn data(&self) -> Option<&Params> {
        self.data.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.status.map(TrackStatus::is_finished).unwrap_or(false)
    }

    /// Query the job state once through `client`.
    pub async fn poll(&mut self, client: &mut SendsayClient) -> Result<PollResult> {
        let response = client
            .request(TRACK_GET_ACTION, json!({ "id": self.id.as_value() }))
            .await?;

        let obj = response
            .get("obj")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        let raw = obj.get("status").ok_or_else(|| TrackingError::MissingStatus {
            track_id: self.id.to_string(),
        })?;
        let status = TrackStatus::from_code(status_code(raw)?)?;

        debug!(
            track_id = %self.id,
            status_code = status.code(),
            status = status.label(),
            "polled track"
        );

        self.status = Some(status);
        self.data = Some(obj);

        Ok(PollResult {
            status,
            finished: status.is_finished(),
        })
    }

    /// Poll until the job finishes or `options.max_polls` is spent, sleeping
    /// `options.interval` between polls and calling `observer` after each one.
    pub async fn wait<F>(
        &mut self,
        client: &mut SendsayClient,
        options: &WaitOptions,
        mut observer: F,
    ) -> Result<WaitOutcome>
    where
        F: FnMut(&PollResult),
    {
        let mut polls = 0u32;
        loop {
            let result = self.poll(client).await?;
            polls += 1;
            observer(&result);

            if result.finished {
                return Ok(WaitOutcome::Finished(result));
            }
            if options.max_polls.is_some_and(|max| polls >= max) {
                return Ok(WaitOutcome::Exhausted {
                    polls,
                    last: result,
                });
            }
            tokio::time::sleep(options.interval).await;
        }
    }
}

/// The server sends the status either as a number or as a numeric string.
fn status_code(raw: &Value) -> std::result::Result<i64, TrackingError> {
    let parsed = match raw {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| TrackingError::InvalidStatus {
        value: raw.to_string(),
    })
}

/// Caller-side polling policy for [`Track::wait`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitOptions {
    pub interval: Duration,
    /// `None` polls until the job finishes.
    pub max_polls: Option<u32>,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_polls: None,
        }
    }
}

impl WaitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_max_polls(mut self, max_polls: u32) -> Self {
        self.max_polls = Some(max_polls);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Finished(PollResult),
    /// The poll budget ran out while the job was still pending.
    Exhausted { polls: u32, last: PollResult },
}

impl WaitOutcome {
    pub fn last(&self) -> PollResult {
        match self {
            WaitOutcome::Finished(result) | WaitOutcome::Exhausted { last: result, .. } => *result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_code_accepts_numbers_and_numeric_strings() {
        assert_eq!(status_code(&json!(-1)).unwrap(), -1);
        assert_eq!(status_code(&json!("3")).unwrap(), 3);
        assert_eq!(status_code(&json!(" -2 ")).unwrap(), -2);
    }

    #[test]
    fn status_code_rejects_other_shapes() {
        assert!(matches!(
            status_code(&json!("done")),
            Err(TrackingError::InvalidStatus { .. })
        ));
        assert!(matches!(
            status_code(&json!(1.5)),
            Err(TrackingError::InvalidStatus { .. })
        ));
        assert!(status_code(&Value::Null).is_err());
    }

    #[test]
    fn track_id_display() {
        assert_eq!(TrackId::from(42i64).to_string(), "42");
        assert_eq!(TrackId::from("abc").to_string(), "abc");
    }

    #[test]
    fn new_track_has_unknown_state() {
        let track = Track::new(7i64);
        assert!(track.status().is_none());
        assert!(track.data().is_none());
        assert!(!track.is_finished());
    }
}
