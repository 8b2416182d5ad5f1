//! Annotation storage collaborators
//!
//! The engine never touches git directly. Everything it needs from a
//! repository goes through [`NotesBackend`]; `keva-git` provides the real
//! implementation and [`memory`] a simulated one.

pub mod memory;

use crate::errors::{KevaError, Result};

/// Repository operations used by fetch, resolve, mutate and push
///
/// Methods return the raw text git would print, so parsing stays in one
/// place ([`parse_commit_log`], [`parse_notes_list`]) for every backend.
pub trait NotesBackend {
    /// Fetch `refs/notes/<notes_ref>` from the remote
    ///
    /// A forced fetch overwrites local annotations that were never pushed.
    ///
    /// # Errors
    ///
    /// `NoRemoteRef` when the remote has no such ref, `UpstreamChanged` when
    /// a non-forced fetch is rejected as non-fast-forward, `ExternalTool`
    /// otherwise.
    fn fetch_notes(&mut self, notes_ref: &str, force: bool) -> Result<()>;

    /// Push `refs/notes/<notes_ref>` to the remote
    ///
    /// # Errors
    ///
    /// `UpstreamChanged` when the remote rejects the update, `ExternalTool`
    /// otherwise.
    fn push_notes(&mut self, notes_ref: &str) -> Result<()>;

    /// Up to `max_count` commit ids reachable from HEAD, newest first, one per line
    ///
    /// # Errors
    ///
    /// `ExternalTool` if the history cannot be read.
    fn log_commits(&self, max_count: usize) -> Result<String>;

    /// One `<note object id> <commit id>` line per annotated commit
    ///
    /// # Errors
    ///
    /// `ExternalTool` if the ref cannot be listed.
    fn notes_list(&self, notes_ref: &str) -> Result<String>;

    /// Annotation text attached to `commit_id`
    ///
    /// # Errors
    ///
    /// `NoAnnotationPresent` when the commit has none.
    fn notes_show(&self, notes_ref: &str, commit_id: &str) -> Result<String>;

    /// Attach `text` to HEAD, replacing any annotation already there
    ///
    /// # Errors
    ///
    /// `ExternalTool` if the annotation cannot be written.
    fn notes_add(&mut self, notes_ref: &str, text: &str) -> Result<()>;

    /// Full id of the HEAD commit
    ///
    /// # Errors
    ///
    /// `ExternalTool` if HEAD does not resolve.
    fn rev_parse_head(&self) -> Result<String>;
}

/// One line of a notes listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteEntry {
    pub object_id: String,
    pub commit_id: String,
}

/// Split commit log output into ids, newest first
pub fn parse_commit_log(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse `notes list` output
///
/// # Errors
///
/// Returns `Internal` for a line that is not exactly two ids.
pub fn parse_notes_list(output: &str) -> Result<Vec<NoteEntry>> {
    let mut entries = Vec::new();
    for line in output.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let mut parts = line.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(object_id), Some(commit_id), None) => entries.push(NoteEntry {
                object_id: object_id.to_string(),
                commit_id: commit_id.to_string(),
            }),
            _ => {
                return Err(KevaError::Internal {
                    message: format!("unexpected notes list line: '{}'", line),
                })
            }
        }
    }
    Ok(entries)
}
