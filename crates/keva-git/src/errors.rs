//! Error helpers for keva-git
//!
//! Wraps keva-core's `KevaError` for process-level failures.

use keva_core::errors::KevaError;

/// git ran but failed in a way with no dedicated kind
pub fn tool_failure(op: &str, output: impl Into<String>) -> KevaError {
    KevaError::ExternalTool {
        op: op.to_string(),
        output: output.into(),
    }
}

/// git could not be started at all
pub fn spawn_failure(op: &str, err: std::io::Error) -> KevaError {
    KevaError::Io {
        op: op.to_string(),
        message: format!("failed to run git: {}", err),
    }
}
