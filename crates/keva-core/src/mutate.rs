//! Mutator: prepend a new event to the head commit's annotation

use crate::codec::{decode_annotation, encode_events};
use crate::errors::{KevaError, Result};
use crate::model::Event;
use crate::store::NotesBackend;

/// A requested write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Set { key: String, value: String },
    Unset { key: String },
}

impl Mutation {
    pub fn key(&self) -> &str {
        match self {
            Mutation::Set { key, .. } | Mutation::Unset { key } => key,
        }
    }

    /// Validate the key and build the event to record
    ///
    /// # Errors
    ///
    /// Returns `InvalidKey` when the key breaks the key rules.
    pub fn to_event(&self) -> Result<Event> {
        match self {
            Mutation::Set { key, value } => Event::set(key.clone(), value.clone()),
            Mutation::Unset { key } => Event::unset(key.clone()),
        }
    }
}

/// Annotation text for HEAD after recording `event`
///
/// Returns the head commit id and the full new annotation text. The event
/// goes in front of whatever HEAD already carries; a legacy snapshot there is
/// rewritten as events first.
///
/// # Errors
///
/// Backend failures, plus corruption errors from the existing annotation.
pub fn prepare_annotation<B>(backend: &B, notes_ref: &str, event: Event) -> Result<(String, String)>
where
    B: NotesBackend + ?Sized,
{
    let head = backend.rev_parse_head()?;

    let existing = match backend.notes_show(notes_ref, &head) {
        Ok(text) => Some(text),
        Err(KevaError::NoAnnotationPresent { .. }) => None,
        Err(err) => return Err(err),
    };

    let mut events = match existing {
        Some(text) => {
            let body = decode_annotation(&text)?;
            if body.is_legacy() {
                tracing::info!(
                    notes_ref = %notes_ref,
                    commit_id = %head,
                    "Converting legacy snapshot annotation to events"
                );
            }
            body.into_events()
        }
        None => Vec::new(),
    };
    events.insert(0, event);

    let text = encode_events(&events)?;
    Ok((head, text))
}

/// Validate, prepend and persist a mutation on HEAD
///
/// Returns the annotation text that was written.
///
/// # Errors
///
/// `InvalidKey` before any repository access; otherwise backend failures
/// and corruption errors from the existing annotation.
pub fn apply_mutation<B>(backend: &mut B, notes_ref: &str, mutation: &Mutation) -> Result<String>
where
    B: NotesBackend + ?Sized,
{
    let event = mutation.to_event()?;
    let (head, text) = prepare_annotation(&*backend, notes_ref, event)?;
    backend.notes_add(notes_ref, &text)?;

    tracing::debug!(
        notes_ref = %notes_ref,
        commit_id = %head,
        key = %mutation.key(),
        "Recorded event on head annotation"
    );
    Ok(text)
}

/// # Errors
///
/// See [`apply_mutation`].
pub fn apply_set<B>(backend: &mut B, notes_ref: &str, key: &str, value: &str) -> Result<String>
where
    B: NotesBackend + ?Sized,
{
    apply_mutation(
        backend,
        notes_ref,
        &Mutation::Set {
            key: key.to_string(),
            value: value.to_string(),
        },
    )
}

/// # Errors
///
/// See [`apply_mutation`].
pub fn apply_unset<B>(backend: &mut B, notes_ref: &str, key: &str) -> Result<String>
where
    B: NotesBackend + ?Sized,
{
    apply_mutation(
        backend,
        notes_ref,
        &Mutation::Unset {
            key: key.to_string(),
        },
    )
}
