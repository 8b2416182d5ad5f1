use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Length of the commit prefix recorded as a value's source
pub const SOURCE_PREFIX_LEN: usize = 8;

/// Shorten a commit id to the prefix used for `Value::source`
pub fn short_commit(commit_id: &str) -> String {
    commit_id.chars().take(SOURCE_PREFIX_LEN).collect()
}

/// A resolved value and the commit whose annotation last set it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Value {
    pub data: String,
    pub source: String,
}

impl Value {
    pub fn new(data: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            source: source.into(),
        }
    }
}

/// Materialized key/value state
///
/// Keys iterate in sorted order so every rendering of a snapshot is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    values: BTreeMap<String, Value>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    pub fn as_map(&self) -> &BTreeMap<String, Value> {
        &self.values
    }
}

impl From<BTreeMap<String, Value>> for Snapshot {
    fn from(values: BTreeMap<String, Value>) -> Self {
        Self { values }
    }
}
