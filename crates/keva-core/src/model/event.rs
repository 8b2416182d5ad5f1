use serde::{Deserialize, Serialize, Serializer};

use crate::errors::Result;
use crate::rules::key::validate_key;

/// Kind of operation recorded in an annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    /// Set or overwrite the value of a key
    Set,
    /// Remove a key if present
    Unset,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Set => "set",
            EventType::Unset => "unset",
        }
    }

    /// Parse a stored type tag; `None` for tags this build does not know
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "set" => Some(EventType::Set),
            "unset" => Some(EventType::Unset),
            _ => None,
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an event does to its key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Set(String),
    Unset,
}

/// A single Set or Unset operation
///
/// Events built through [`Event::set`] and [`Event::unset`] have a validated
/// key; events decoded from storage only have a non-empty one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    key: String,
    change: Change,
}

#[derive(Serialize)]
struct StoredForm<'a> {
    #[serde(rename = "type")]
    event_type: EventType,
    key: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<&'a str>,
}

impl Serialize for Event {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        StoredForm {
            event_type: self.event_type(),
            key: &self.key,
            value: self.value(),
        }
        .serialize(serializer)
    }
}

impl Event {
    /// Build a Set event after validating the key
    ///
    /// # Errors
    ///
    /// Returns `InvalidKey` when the key breaks the key rules.
    pub fn set(key: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        let key = key.into();
        validate_key(&key)?;
        Ok(Self {
            key,
            change: Change::Set(value.into()),
        })
    }

    /// Build an Unset event after validating the key
    ///
    /// # Errors
    ///
    /// Returns `InvalidKey` when the key breaks the key rules.
    pub fn unset(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        validate_key(&key)?;
        Ok(Self {
            key,
            change: Change::Unset,
        })
    }

    /// Rebuild a stored event; the codec has already checked the key
    pub(crate) fn from_stored(key: String, change: Change) -> Self {
        Self { key, change }
    }

    pub fn change(&self) -> &Change {
        &self.change
    }

    pub fn event_type(&self) -> EventType {
        match self.change {
            Change::Set(_) => EventType::Set,
            Change::Unset => EventType::Unset,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> Option<&str> {
        match &self.change {
            Change::Set(value) => Some(value.as_str()),
            Change::Unset => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_event_carries_value() {
        let event = Event::set("foo", "bar").unwrap();
        assert_eq!(event.event_type(), EventType::Set);
        assert_eq!(event.key(), "foo");
        assert_eq!(event.value(), Some("bar"));
        assert_eq!(event.change(), &Change::Set("bar".to_string()));
    }

    #[test]
    fn test_unset_event_has_no_value() {
        let event = Event::unset("foo").unwrap();
        assert_eq!(event.event_type(), EventType::Unset);
        assert_eq!(event.value(), None);
    }

    #[test]
    fn test_constructors_reject_invalid_keys() {
        assert!(Event::set("", "bar").is_err());
        assert!(Event::unset("2BeOrNot2Be").is_err());
    }

    #[test]
    fn test_serialized_form_omits_unset_value() {
        let set = serde_json::to_string(&Event::set("k", "v").unwrap()).unwrap();
        assert_eq!(set, r#"{"type":"set","key":"k","value":"v"}"#);
        let unset = serde_json::to_string(&Event::unset("k").unwrap()).unwrap();
        assert_eq!(unset, r#"{"type":"unset","key":"k"}"#);
    }

    #[test]
    fn test_type_tags() {
        assert_eq!(EventType::from_tag("set"), Some(EventType::Set));
        assert_eq!(EventType::from_tag("unset"), Some(EventType::Unset));
        assert_eq!(EventType::from_tag("SET"), None);
        assert_eq!(EventType::Unset.to_string(), "unset");
    }
}
