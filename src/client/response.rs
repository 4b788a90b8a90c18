use crate::tracking::{Track, TrackId};
use crate::types::Params;
use serde_json::Value;

const TRACK_ID_FIELD: &str = "track.id";

/// Successful response payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    data: Params,
}

impl Response {
    pub fn new(data: Params) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &Params {
        &self.data
    }

    pub fn into_data(self) -> Params {
        self.data
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Identifier of the asynchronous job this call started, if any.
    pub fn track_id(&self) -> Option<TrackId> {
        match self.data.get(TRACK_ID_FIELD) {
            None | Some(Value::Null) => None,
            Some(id) => Some(TrackId::from(id.clone())),
        }
    }

    /// Tracker for the job this call started (e.g. `issue.send`), if any.
    pub fn track(&self) -> Option<Track> {
        self.track_id().map(Track::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: Value) -> Response {
        Response::new(value.as_object().cloned().unwrap_or_default())
    }

    #[test]
    fn track_is_available_only_with_track_id() {
        let plain = response(json!({"list": {}}));
        assert!(plain.track().is_none());
        assert!(plain.contains("list"));

        let queued = response(json!({"track.id": 8814}));
        let track = queued.track().expect("track");
        assert_eq!(track.id().to_string(), "8814");
        assert!(track.status().is_none());
    }

    #[test]
    fn null_track_id_is_ignored() {
        assert!(response(json!({"track.id": null})).track_id().is_none());
    }
}
