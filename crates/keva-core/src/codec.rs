//! Annotation text codec
//!
//! Current format, newest event first:
//!
//! ```text
//! {"events":[{"type":"set","key":"foo","value":"bar"},{"type":"unset","key":"key"}]}
//! ```
//!
//! Older annotations hold a flat snapshot instead
//! (`{"foo":{"data":"bar","source":"abcd1234"}}`). Those are still decoded
//! but never written.

use serde::{Deserialize, Serialize};
use serde_json::Map;

use crate::errors::{KevaError, Result};
use crate::model::{Change, Event, EventType, Snapshot, Value};

/// Decoded contents of one annotation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationBody {
    /// Event log, newest first
    Events(Vec<Event>),
    /// Complete snapshot written by the pre-event format
    Legacy(Snapshot),
}

impl AnnotationBody {
    /// Event view of the annotation, newest first
    ///
    /// A legacy snapshot becomes one Set per stored key, ordered by key.
    pub fn into_events(self) -> Vec<Event> {
        match self {
            AnnotationBody::Events(events) => events,
            AnnotationBody::Legacy(snapshot) => snapshot
                .iter()
                .map(|(key, value)| Event::from_stored(key.clone(), Change::Set(value.data.clone())))
                .collect(),
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, AnnotationBody::Legacy(_))
    }
}

#[derive(Serialize)]
struct EventLogRef<'a> {
    events: &'a [Event],
}

#[derive(Deserialize)]
struct StoredEvent {
    #[serde(rename = "type")]
    event_type: Option<String>,
    key: Option<String>,
    value: Option<String>,
}

/// Serialize an event sequence (newest first) into annotation text
///
/// # Errors
///
/// Returns `Serialization` if JSON encoding fails.
pub fn encode_events(events: &[Event]) -> Result<String> {
    let json = serde_json::to_string(&EventLogRef { events })?;
    Ok(format!("{}\n", json))
}

/// Parse annotation text
///
/// Empty text decodes to an empty event log.
///
/// # Errors
///
/// - `UnknownType` for a missing or unrecognized type tag
/// - `ValueMissing` for a set event without a value
/// - `KeyMissing` for an event with a missing or empty key
/// - `MalformedAnnotation` for text that is neither format
pub fn decode_annotation(text: &str) -> Result<AnnotationBody> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(AnnotationBody::Events(Vec::new()));
    }

    let root: Map<String, serde_json::Value> =
        serde_json::from_str(text).map_err(|e| KevaError::MalformedAnnotation {
            message: e.to_string(),
        })?;

    match root.get("events") {
        Some(serde_json::Value::Array(_)) => decode_event_log(root),
        _ => decode_legacy(root),
    }
}

/// Parse annotation text into events, newest first
///
/// # Errors
///
/// Same as [`decode_annotation`].
pub fn decode_events(text: &str) -> Result<Vec<Event>> {
    decode_annotation(text).map(AnnotationBody::into_events)
}

fn decode_event_log(mut root: Map<String, serde_json::Value>) -> Result<AnnotationBody> {
    let raw = root
        .remove("events")
        .unwrap_or(serde_json::Value::Array(Vec::new()));
    let records = match raw {
        serde_json::Value::Array(records) => records,
        _ => Vec::new(),
    };

    let mut events = Vec::with_capacity(records.len());
    for record in records {
        let rendered = record.to_string();
        let stored: StoredEvent =
            serde_json::from_value(record).map_err(|e| KevaError::MalformedAnnotation {
                message: format!("{}: {}", e, rendered),
            })?;
        events.push(check_stored_event(stored, rendered)?);
    }
    Ok(AnnotationBody::Events(events))
}

fn check_stored_event(stored: StoredEvent, rendered: String) -> Result<Event> {
    let tag = stored.event_type.unwrap_or_default();
    let event_type = EventType::from_tag(&tag).ok_or(KevaError::UnknownType { event_type: tag })?;

    let key = stored.key.unwrap_or_default();
    let change = match (event_type, stored.value) {
        (EventType::Set, Some(value)) => Change::Set(value),
        (EventType::Set, None) => return Err(KevaError::ValueMissing { key }),
        (EventType::Unset, _) => Change::Unset,
    };
    if key.is_empty() {
        return Err(KevaError::KeyMissing { record: rendered });
    }

    Ok(Event::from_stored(key, change))
}

fn decode_legacy(root: Map<String, serde_json::Value>) -> Result<AnnotationBody> {
    let mut snapshot = Snapshot::new();
    for (key, entry) in root {
        let value: Value =
            serde_json::from_value(entry).map_err(|e| KevaError::MalformedAnnotation {
                message: format!("legacy entry '{}': {}", key, e),
            })?;
        snapshot.insert(key, value);
    }
    Ok(AnnotationBody::Legacy(snapshot))
}
