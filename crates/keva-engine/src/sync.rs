//! Fetch-before-read, push-after-write, with whole-command retry
//!
//! A command moves through
//! `Idle → Fetching → Resolving → [Mutating] → [Pushing] → Done`.
//! When the remote rejects a push because it moved, the write is replayed
//! from `Fetching` (through `Retrying`) until the attempt ceiling is hit.

use keva_core::config::KevaConfig;
use keva_core::errors::{KevaError, Result};
use keva_core::model::Snapshot;
use keva_core::mutate::{apply_mutation, Mutation};
use keva_core::resolve::load_snapshot;
use keva_core::store::NotesBackend;

/// Where a command currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Fetching,
    Resolving,
    Mutating,
    Pushing,
    Retrying,
    Done,
}

impl SyncState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncState::Idle => "idle",
            SyncState::Fetching => "fetching",
            SyncState::Resolving => "resolving",
            SyncState::Mutating => "mutating",
            SyncState::Pushing => "pushing",
            SyncState::Retrying => "retrying",
            SyncState::Done => "done",
        }
    }
}

/// Result of a successful write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome {
    /// Annotation text now on HEAD
    pub annotation: String,
    /// Attempts used, starting at 1
    pub attempts: usize,
    pub pushed: bool,
}

/// Run `op` until it succeeds, fails for good, or `max_attempts` is reached
///
/// `op` receives the 1-based attempt number. Only errors accepted by
/// `should_retry` trigger another attempt; the last error is returned once
/// the ceiling is hit.
///
/// # Errors
///
/// Returns the error of the final attempt.
pub fn retry_bounded<T, P, F>(max_attempts: usize, should_retry: P, mut op: F) -> Result<T>
where
    P: Fn(&KevaError) -> bool,
    F: FnMut(usize) -> Result<T>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match op(attempt) {
            Ok(value) => return Ok(value),
            Err(err) if should_retry(&err) && attempt < max_attempts => {
                tracing::warn!(
                    attempt,
                    attempts_left = max_attempts - attempt,
                    error = %err,
                    "Retrying command"
                );
                attempt += 1;
            }
            Err(err) => {
                if should_retry(&err) {
                    tracing::warn!(attempt, error = %err, "Retry limit exceeded");
                }
                return Err(err);
            }
        }
    }
}

/// Per-command sync state machine over a backend
pub struct SyncController<'a, B: NotesBackend + ?Sized> {
    backend: &'a mut B,
    config: &'a KevaConfig,
    state: SyncState,
    history: Vec<SyncState>,
}

impl<'a, B: NotesBackend + ?Sized> SyncController<'a, B> {
    pub fn new(backend: &'a mut B, config: &'a KevaConfig) -> Self {
        Self {
            backend,
            config,
            state: SyncState::Idle,
            history: vec![SyncState::Idle],
        }
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Every state entered so far, in order
    pub fn history(&self) -> &[SyncState] {
        &self.history
    }

    fn enter(&mut self, state: SyncState) {
        tracing::trace!(
            phase = state.as_str(),
            from = self.state.as_str(),
            "Sync state change"
        );
        self.state = state;
        self.history.push(state);
    }

    /// Bring the local notes ref up to date with the remote
    ///
    /// Skipped when fetching is disabled. A missing remote ref is an empty
    /// remote; a diverged local ref is replaced by the remote one.
    ///
    /// # Errors
    ///
    /// Any fetch failure other than the two recoverable ones.
    pub fn fetch(&mut self) -> Result<()> {
        if !self.config.fetch {
            return Ok(());
        }
        self.enter(SyncState::Fetching);
        let notes_ref = &self.config.notes_ref;

        match self.backend.fetch_notes(notes_ref, false) {
            Ok(()) => Ok(()),
            Err(KevaError::NoRemoteRef { .. }) => {
                tracing::debug!(
                    notes_ref = %notes_ref,
                    remote = %self.config.remote,
                    "Remote has no notes ref yet"
                );
                Ok(())
            }
            Err(KevaError::UpstreamChanged { .. }) => {
                tracing::warn!(
                    notes_ref = %notes_ref,
                    force = true,
                    "Local annotations diverged from remote; discarding unpushed changes"
                );
                self.backend.fetch_notes(notes_ref, true)
            }
            Err(err) => Err(err),
        }
    }

    /// Replay the located annotations into a snapshot
    ///
    /// # Errors
    ///
    /// Backend, locator and corruption errors.
    pub fn resolve(&mut self) -> Result<Snapshot> {
        self.enter(SyncState::Resolving);
        load_snapshot(&*self.backend, self.config)
    }

    /// Record `mutation` on HEAD locally
    ///
    /// # Errors
    ///
    /// `InvalidKey`, backend and corruption errors.
    pub fn mutate(&mut self, mutation: &Mutation) -> Result<String> {
        self.enter(SyncState::Mutating);
        apply_mutation(self.backend, &self.config.notes_ref, mutation)
    }

    /// # Errors
    ///
    /// `UpstreamChanged` when the remote rejects the update, otherwise any
    /// push failure.
    pub fn push(&mut self) -> Result<()> {
        self.enter(SyncState::Pushing);
        self.backend.push_notes(&self.config.notes_ref)?;
        tracing::info!(
            notes_ref = %self.config.notes_ref,
            remote = %self.config.remote,
            "Pushed annotations"
        );
        Ok(())
    }

    /// Fetch and resolve
    ///
    /// # Errors
    ///
    /// See [`SyncController::fetch`] and [`SyncController::resolve`].
    pub fn run_read(&mut self) -> Result<Snapshot> {
        self.fetch()?;
        let snapshot = self.resolve()?;
        self.enter(SyncState::Done);
        Ok(snapshot)
    }

    /// Fetch, resolve, mutate and optionally push, replaying on conflict
    ///
    /// Replays only happen when fetching is enabled; without a fetch the
    /// next attempt would see the same stale remote state.
    ///
    /// # Errors
    ///
    /// `UpstreamChanged` once the attempt ceiling is reached, or the first
    /// error of any other kind.
    pub fn run_write(&mut self, mutation: &Mutation, push: bool) -> Result<WriteOutcome> {
        let config = self.config;
        let can_retry = config.fetch;

        retry_bounded(
            config.max_attempts,
            |err| can_retry && err.is_upstream_changed(),
            |attempt| {
                if attempt > 1 {
                    self.enter(SyncState::Retrying);
                }
                let annotation = self.write_once(mutation, push)?;
                Ok(WriteOutcome {
                    annotation,
                    attempts: attempt,
                    pushed: push,
                })
            },
        )
    }

    fn write_once(&mut self, mutation: &Mutation, push: bool) -> Result<String> {
        self.fetch()?;
        let snapshot = self.resolve()?;
        if let Some(previous) = snapshot.get(mutation.key()) {
            tracing::debug!(
                key = %mutation.key(),
                previous_source = %previous.source,
                "Key currently set"
            );
        }

        let annotation = self.mutate(mutation)?;
        if push {
            self.push()?;
        }
        self.enter(SyncState::Done);
        Ok(annotation)
    }
}
