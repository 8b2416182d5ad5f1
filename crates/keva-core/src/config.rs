//! Explicit configuration passed into the locator and the sync controller

use crate::errors::{KevaError, Result};

pub const DEFAULT_NOTES_REF: &str = "keva";
pub const DEFAULT_REMOTE: &str = "origin";
pub const DEFAULT_MAX_DEPTH: u32 = 50;
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;

/// Per-invocation settings
///
/// Built once by the caller (usually from CLI flags and environment) and
/// borrowed by everything that needs it. Nothing reads process-wide state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KevaConfig {
    /// Name under `refs/notes/` holding the annotations
    pub notes_ref: String,
    /// Remote to fetch from and push to
    pub remote: String,
    /// How many ancestors of HEAD the locator may look at (0 = HEAD only)
    pub max_depth: u32,
    /// Fetch the notes ref before resolving
    pub fetch: bool,
    /// Total attempts for a command whose push keeps getting rejected
    pub max_attempts: usize,
}

impl Default for KevaConfig {
    fn default() -> Self {
        Self {
            notes_ref: DEFAULT_NOTES_REF.to_string(),
            remote: DEFAULT_REMOTE.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            fetch: true,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl KevaConfig {
    pub fn with_notes_ref(mut self, notes_ref: impl Into<String>) -> Self {
        self.notes_ref = notes_ref.into();
        self
    }

    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = remote.into();
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_fetch(mut self, fetch: bool) -> Self {
        self.fetch = fetch;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Reject settings that would make every git invocation fail
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for an empty or whitespace-bearing ref or
    /// remote name, and for a zero attempt ceiling.
    pub fn validate(&self) -> Result<()> {
        check_name("notes ref", &self.notes_ref)?;
        check_name("remote", &self.remote)?;
        if self.max_attempts == 0 {
            return Err(KevaError::InvalidConfig {
                reason: "max attempts must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

fn check_name(what: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(KevaError::InvalidConfig {
            reason: format!("{} cannot be empty", what),
        });
    }
    if name.chars().any(|c| c.is_whitespace() || c == ':') {
        return Err(KevaError::InvalidConfig {
            reason: format!("{} '{}' contains whitespace or ':'", what, name),
        });
    }
    Ok(())
}
