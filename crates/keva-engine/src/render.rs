//! Text renderings of resolved state

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use keva_core::errors::{KevaError, Result};
use keva_core::model::{Snapshot, Value};

/// Output format for `list`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// `key=value` lines, sorted by key
    #[default]
    Plain,
    /// Values with their source commit prefix
    Json,
    /// Flat `{"key":"value"}` map
    Raw,
}

impl FromStr for OutputFormat {
    type Err = KevaError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "plain" => Ok(OutputFormat::Plain),
            "json" => Ok(OutputFormat::Json),
            "raw" => Ok(OutputFormat::Raw),
            other => Err(KevaError::InvalidOutputFormat {
                format: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Plain => "plain",
            OutputFormat::Json => "json",
            OutputFormat::Raw => "raw",
        })
    }
}

/// Render a snapshot
///
/// # Errors
///
/// `Serialization` if JSON encoding fails.
pub fn render_snapshot(snapshot: &Snapshot, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Plain => Ok(snapshot
            .iter()
            .map(|(key, value)| format!("{}={}\n", key, value.data))
            .collect()),
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string(snapshot)?)),
        OutputFormat::Raw => {
            let flat: BTreeMap<&str, &str> = snapshot
                .iter()
                .map(|(key, value)| (key.as_str(), value.data.as_str()))
                .collect();
            Ok(format!("{}\n", serde_json::to_string(&flat)?))
        }
    }
}

/// `get` output: the bare value, nothing when unset
pub fn render_value(value: Option<&Value>) -> String {
    value.map(|v| v.data.clone()).unwrap_or_default()
}
