//! In-memory simulated repository
//!
//! Reproduces the parts of git's notes behavior the engine depends on:
//! a missing remote ref, non-fast-forward rejection on fetch and push,
//! forced fetch, and overwrite on add. Several repos can share one
//! [`MemoryRemote`] to act as independent clones.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::rc::Rc;

use sha2::{Digest, Sha256};

use crate::errors::{KevaError, Result};
use crate::store::NotesBackend;

fn digest_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

#[derive(Debug, Default)]
struct RemoteRef {
    version: u64,
    notes: BTreeMap<String, String>,
}

#[derive(Debug, Default)]
struct RemoteState {
    refs: HashMap<String, RemoteRef>,
    pending_writes: VecDeque<(String, String, String)>,
    push_failures: VecDeque<KevaError>,
    push_count: usize,
}

/// Shared remote, cheap to clone
#[derive(Debug, Clone, Default)]
pub struct MemoryRemote {
    state: Rc<RefCell<RemoteState>>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write an annotation as if another clone had pushed it
    pub fn publish(&self, notes_ref: &str, commit_id: &str, text: &str) {
        let mut state = self.state.borrow_mut();
        let remote_ref = state.refs.entry(notes_ref.to_string()).or_default();
        remote_ref.notes.insert(commit_id.to_string(), text.to_string());
        remote_ref.version += 1;
    }

    /// Queue a foreign write that lands just before the next push to `notes_ref`
    ///
    /// Each push lands at most one queued write.
    pub fn queue_concurrent_write(&self, notes_ref: &str, commit_id: &str, text: &str) {
        self.state.borrow_mut().pending_writes.push_back((
            notes_ref.to_string(),
            commit_id.to_string(),
            text.to_string(),
        ));
    }

    /// Make the next push fail with `err` without touching the remote
    pub fn fail_next_push(&self, err: KevaError) {
        self.state.borrow_mut().push_failures.push_back(err);
    }

    /// Annotation text the remote holds for a commit
    pub fn note(&self, notes_ref: &str, commit_id: &str) -> Option<String> {
        self.state
            .borrow()
            .refs
            .get(notes_ref)
            .and_then(|r| r.notes.get(commit_id).cloned())
    }

    pub fn has_ref(&self, notes_ref: &str) -> bool {
        self.state.borrow().refs.contains_key(notes_ref)
    }

    /// Number of pushes the remote accepted
    pub fn push_count(&self) -> usize {
        self.state.borrow().push_count
    }

    fn apply_pending_write(&self, notes_ref: &str) {
        let next = {
            let mut state = self.state.borrow_mut();
            state
                .pending_writes
                .iter()
                .position(|(r, _, _)| r == notes_ref)
                .and_then(|i| state.pending_writes.remove(i))
        };
        if let Some((r, commit_id, text)) = next {
            self.publish(&r, &commit_id, &text);
        }
    }
}

#[derive(Debug, Default)]
struct LocalRef {
    notes: BTreeMap<String, String>,
    base_version: Option<u64>,
    dirty: bool,
}

/// A linear history with per-ref local annotations
#[derive(Debug, Default)]
pub struct MemoryRepo {
    commits: Vec<String>,
    refs: HashMap<String, LocalRef>,
    remote: Option<MemoryRemote>,
}

impl MemoryRepo {
    /// Repository without commits or remote
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository with `count` commits
    pub fn with_commits(count: usize) -> Self {
        let mut repo = Self::new();
        for _ in 0..count {
            repo.commit();
        }
        repo
    }

    pub fn with_remote(mut self, remote: MemoryRemote) -> Self {
        self.remote = Some(remote);
        self
    }

    /// Another clone of the same history and remote, with no local annotations
    pub fn fork(&self) -> Self {
        Self {
            commits: self.commits.clone(),
            refs: HashMap::new(),
            remote: self.remote.clone(),
        }
    }

    /// Append a commit on top of HEAD and return its id
    pub fn commit(&mut self) -> String {
        let parent = self.commits.last().cloned().unwrap_or_default();
        let id = digest_hex(&format!("commit {} parent {}", self.commits.len(), parent));
        self.commits.push(id.clone());
        id
    }

    /// Commit ids, oldest first
    pub fn commits(&self) -> &[String] {
        &self.commits
    }

    /// Commit `depth` steps below HEAD
    pub fn ancestor(&self, depth: usize) -> Option<&str> {
        self.commits
            .len()
            .checked_sub(depth + 1)
            .map(|i| self.commits[i].as_str())
    }

    /// Attach raw text to any commit without going through the engine
    pub fn put_note(&mut self, notes_ref: &str, commit_id: &str, text: &str) {
        let local = self.refs.entry(notes_ref.to_string()).or_default();
        local.notes.insert(commit_id.to_string(), text.to_string());
        local.dirty = true;
    }

    /// Local annotation text for a commit
    pub fn note(&self, notes_ref: &str, commit_id: &str) -> Option<&str> {
        self.refs
            .get(notes_ref)
            .and_then(|r| r.notes.get(commit_id))
            .map(String::as_str)
    }

    fn remote(&self, op: &str) -> Result<&MemoryRemote> {
        self.remote.as_ref().ok_or_else(|| KevaError::ExternalTool {
            op: op.to_string(),
            output: "fatal: 'origin' does not appear to be a git repository".to_string(),
        })
    }
}

impl NotesBackend for MemoryRepo {
    fn fetch_notes(&mut self, notes_ref: &str, force: bool) -> Result<()> {
        let remote = self.remote("fetch_notes")?.clone();
        let state = remote.state.borrow();
        let remote_ref = state
            .refs
            .get(notes_ref)
            .ok_or_else(|| KevaError::NoRemoteRef {
                notes_ref: notes_ref.to_string(),
            })?;

        let local = self.refs.entry(notes_ref.to_string()).or_default();
        // Moving a locally advanced ref back to the remote value is not a
        // fast-forward, even when the remote has not moved
        if local.dirty && !force {
            return Err(KevaError::UpstreamChanged {
                notes_ref: notes_ref.to_string(),
            });
        }

        local.notes = remote_ref.notes.clone();
        local.base_version = Some(remote_ref.version);
        local.dirty = false;
        Ok(())
    }

    fn push_notes(&mut self, notes_ref: &str) -> Result<()> {
        let remote = self.remote("push_notes")?.clone();
        remote.apply_pending_write(notes_ref);

        let mut state = remote.state.borrow_mut();
        if let Some(err) = state.push_failures.pop_front() {
            return Err(err);
        }

        let local = self.refs.entry(notes_ref.to_string()).or_default();
        let remote_version = state.refs.get(notes_ref).map(|r| r.version);
        if remote_version.is_some() && remote_version != local.base_version {
            return Err(KevaError::UpstreamChanged {
                notes_ref: notes_ref.to_string(),
            });
        }
        if !local.dirty {
            return Ok(());
        }

        let remote_ref = state.refs.entry(notes_ref.to_string()).or_default();
        remote_ref.notes = local.notes.clone();
        remote_ref.version += 1;
        local.base_version = Some(remote_ref.version);
        local.dirty = false;
        state.push_count += 1;
        Ok(())
    }

    fn log_commits(&self, max_count: usize) -> Result<String> {
        let ids: Vec<&str> = self
            .commits
            .iter()
            .rev()
            .take(max_count)
            .map(String::as_str)
            .collect();
        Ok(ids.join("\n"))
    }

    fn notes_list(&self, notes_ref: &str) -> Result<String> {
        let lines: Vec<String> = self
            .refs
            .get(notes_ref)
            .map(|r| {
                r.notes
                    .iter()
                    .map(|(commit_id, text)| format!("{} {}", digest_hex(text), commit_id))
                    .collect()
            })
            .unwrap_or_default();
        Ok(lines.join("\n"))
    }

    fn notes_show(&self, notes_ref: &str, commit_id: &str) -> Result<String> {
        self.note(notes_ref, commit_id)
            .map(str::to_string)
            .ok_or_else(|| KevaError::NoAnnotationPresent {
                commit_id: commit_id.to_string(),
            })
    }

    fn notes_add(&mut self, notes_ref: &str, text: &str) -> Result<()> {
        let head = self.rev_parse_head()?;
        self.put_note(notes_ref, &head, text);
        Ok(())
    }

    fn rev_parse_head(&self) -> Result<String> {
        self.commits
            .last()
            .cloned()
            .ok_or_else(|| KevaError::ExternalTool {
                op: "rev_parse_head".to_string(),
                output: "fatal: ambiguous argument 'HEAD': unknown revision".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commits_are_listed_newest_first() {
        let repo = MemoryRepo::with_commits(3);
        let log = repo.log_commits(10).unwrap();
        let ids: Vec<&str> = log.lines().collect();
        assert_eq!(ids[0], repo.ancestor(0).unwrap());
        assert_eq!(ids[2], repo.ancestor(2).unwrap());
        assert_eq!(repo.log_commits(2).unwrap().lines().count(), 2);
    }

    #[test]
    fn test_empty_repo_has_no_head() {
        let repo = MemoryRepo::new();
        assert_eq!(repo.log_commits(5).unwrap(), "");
        assert!(matches!(
            repo.rev_parse_head(),
            Err(KevaError::ExternalTool { .. })
        ));
    }

    #[test]
    fn test_fetch_missing_ref() {
        let mut repo = MemoryRepo::with_commits(1).with_remote(MemoryRemote::new());
        assert!(matches!(
            repo.fetch_notes("keva", false),
            Err(KevaError::NoRemoteRef { .. })
        ));
    }

    #[test]
    fn test_add_overwrites_head_note() {
        let mut repo = MemoryRepo::with_commits(1);
        repo.notes_add("keva", "first").unwrap();
        repo.notes_add("keva", "second").unwrap();
        let head = repo.rev_parse_head().unwrap();
        assert_eq!(repo.notes_show("keva", &head).unwrap(), "second");
        assert_eq!(repo.notes_list("keva").unwrap().lines().count(), 1);
    }

    #[test]
    fn test_unpushed_notes_reject_diverged_fetch() {
        let remote = MemoryRemote::new();
        let mut alice = MemoryRepo::with_commits(1).with_remote(remote.clone());
        let mut bob = alice.fork();

        alice.notes_add("keva", "alice").unwrap();
        alice.push_notes("keva").unwrap();

        bob.notes_add("keva", "bob").unwrap();
        assert!(matches!(
            bob.fetch_notes("keva", false),
            Err(KevaError::UpstreamChanged { .. })
        ));

        bob.fetch_notes("keva", true).unwrap();
        let head = bob.rev_parse_head().unwrap();
        assert_eq!(bob.notes_show("keva", &head).unwrap(), "alice");
    }

    #[test]
    fn test_concurrent_write_rejects_push() {
        let remote = MemoryRemote::new();
        let mut repo = MemoryRepo::with_commits(1).with_remote(remote.clone());
        let head = repo.rev_parse_head().unwrap();
        remote.publish("keva", &head, "base");
        repo.fetch_notes("keva", false).unwrap();

        remote.queue_concurrent_write("keva", &head, "theirs");
        repo.notes_add("keva", "ours").unwrap();
        assert!(matches!(
            repo.push_notes("keva"),
            Err(KevaError::UpstreamChanged { .. })
        ));
        assert_eq!(remote.note("keva", &head).as_deref(), Some("theirs"));
        assert_eq!(remote.push_count(), 0);
    }
}
