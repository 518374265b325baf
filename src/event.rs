//! Raw scheduler trace events, as handed over by the trace decoder
//!
//! Field values are loosely typed: a numeric map and a text map, both keyed by
//! the tracepoint's field names and both allowed to be partially populated.
//! Interpreters go through [`Event::number`] for required fields so that a
//! malformed event fails fast with a `MissingField` error.

use crate::error::{LoaderError, Result};
use crate::types::{EventIndex, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single decoded tracepoint occurrence
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Position of the event within its trace
    pub index: EventIndex,
    /// Nanosecond timestamp
    pub timestamp: Timestamp,
    /// CPU that reported the event
    pub cpu: i64,
    /// Set by the tracer when the record was truncated or corrupted
    #[serde(default)]
    pub clipped: bool,
    /// Tracepoint name, e.g. `sched_switch`
    pub name: String,
    #[serde(default)]
    pub number_properties: HashMap<String, i64>,
    #[serde(default)]
    pub text_properties: HashMap<String, String>,
}

impl Event {
    /// Create an event with no fields
    pub fn new(index: EventIndex, timestamp: Timestamp, cpu: i64, name: impl Into<String>) -> Self {
        Self {
            index,
            timestamp,
            cpu,
            clipped: false,
            name: name.into(),
            number_properties: HashMap::new(),
            text_properties: HashMap::new(),
        }
    }

    /// Add a numeric field
    pub fn with_number(mut self, field: impl Into<String>, value: i64) -> Self {
        self.number_properties.insert(field.into(), value);
        self
    }

    /// Add a text field
    pub fn with_text(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.text_properties.insert(field.into(), value.into());
        self
    }

    /// Mark the event as clipped
    pub fn clipped(mut self) -> Self {
        self.clipped = true;
        self
    }

    /// Required numeric field
    ///
    /// # Errors
    /// Returns `MissingField` naming `field` and this event's index.
    pub fn number(&self, field: &'static str) -> Result<i64> {
        self.number_properties
            .get(field)
            .copied()
            .ok_or(LoaderError::MissingField {
                field,
                event_index: self.index,
            })
    }

    /// Optional numeric field
    pub fn optional_number(&self, field: &str) -> Option<i64> {
        self.number_properties.get(field).copied()
    }

    /// Optional text field
    pub fn text(&self, field: &str) -> Option<&str> {
        self.text_properties.get(field).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_field_present() {
        let ev = Event::new(3, 100, 0, "sched_wakeup").with_number("pid", 42);
        assert_eq!(ev.number("pid"), Ok(42));
    }

    #[test]
    fn test_required_field_missing_names_field_and_index() {
        let ev = Event::new(3, 100, 0, "sched_wakeup");
        assert_eq!(
            ev.number("target_cpu"),
            Err(LoaderError::MissingField {
                field: "target_cpu",
                event_index: 3,
            })
        );
    }

    #[test]
    fn test_optional_fields() {
        let ev = Event::new(0, 0, 0, "sched_wakeup")
            .with_number("prio", 120)
            .with_text("comm", "bash");
        assert_eq!(ev.optional_number("prio"), Some(120));
        assert_eq!(ev.optional_number("nope"), None);
        assert_eq!(ev.text("comm"), Some("bash"));
        assert_eq!(ev.text("nope"), None);
    }

    #[test]
    fn test_deserialize_with_missing_maps() {
        let ev: Event = serde_json::from_str(
            r#"{"index": 7, "timestamp": 1000, "cpu": 2, "name": "sched_switch"}"#,
        )
        .unwrap();
        assert_eq!(ev.index, 7);
        assert!(!ev.clipped);
        assert!(ev.number_properties.is_empty());
        assert!(ev.text_properties.is_empty());
    }
}
