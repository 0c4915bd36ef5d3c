use std::fmt;

use chrono::Utc;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Payload key stamped by [`Event::new`] with the construction instant.
pub const CREATION_TIME_KEY: &str = "creation_time";
/// Payload key stamped when a timestamping dispatcher enqueues an event.
pub const SUBMISSION_TIME_KEY: &str = "submission_time";
/// Payload key stamped when a timestamping dispatcher begins a delivery pass.
pub const TRANSMISSION_TIME_KEY: &str = "transmission_time";

/// String-keyed payload attached to an [`Event`].
///
/// Values are [`serde_json::Value`], so a payload can carry strings, numbers,
/// booleans, nested objects, and arrays without any casting at the call site.
pub type EventPayload = FxHashMap<String, Value>;

/// A named occurrence submitted for delivery.
///
/// Events are plain values: the dispatcher clones them into its store and into
/// each matching listener callback, so producers keep no live aliasing into
/// dispatcher-owned data after submission. Names are matched against listener
/// rules and are not required to be unique.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use signalbus::Event;
///
/// let event = Event::named("deploy:finished").with("exit_code", json!(0));
/// assert_eq!(event.name(), "deploy:finished");
/// assert_eq!(event.get("exit_code"), Some(&json!(0)));
/// assert!(event.get("creation_time").is_some());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    name: String,
    data: EventPayload,
}

impl Event {
    /// Create an event with the given name and payload.
    ///
    /// Stamps [`CREATION_TIME_KEY`] with the current instant as an RFC 3339
    /// string, overwriting any caller-provided entry under that key.
    pub fn new(name: impl Into<String>, data: EventPayload) -> Self {
        let mut event = Self {
            name: name.into(),
            data,
        };
        event.stamp(CREATION_TIME_KEY);
        event
    }

    /// Create an event with an empty payload.
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, EventPayload::default())
    }

    /// Add a payload entry, builder-style.
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    /// The name listeners match against.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The full payload map.
    pub fn data(&self) -> &EventPayload {
        &self.data
    }

    /// Look up a single payload entry.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Insert a payload entry, returning the previous value if any.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.data.insert(key.into(), value)
    }

    /// Record the current instant under `key` as an RFC 3339 string.
    pub(crate) fn stamp(&mut self, key: &str) {
        self.data
            .insert(key.to_owned(), Value::String(Utc::now().to_rfc3339()));
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} payload entries)", self.name, self.data.len())
    }
}
