use crate::codec::{decode_annotation, AnnotationBody};
use crate::errors::{KevaError, Result};
use crate::model::{short_commit, Change, Event, Snapshot, Value};

/// Apply one event to the accumulator
///
/// `source` is the full id of the commit whose annotation holds the event.
pub fn apply_event(snapshot: &mut Snapshot, event: &Event, source: &str) {
    match event.change() {
        Change::Set(data) => {
            snapshot.insert(event.key(), Value::new(data, short_commit(source)));
        }
        Change::Unset => {
            snapshot.remove(event.key());
        }
    }
}

/// Replay the annotations of `relevant` (head first) into a snapshot
///
/// Annotations are applied oldest commit first, and the events of each one
/// oldest event first. A legacy snapshot annotation replaces everything
/// accumulated so far.
///
/// # Errors
///
/// - `InconsistentAnnotationSet` if `fetch` finds no annotation for a commit
/// - any decoding error from the stored text
pub fn reconstruct<F>(relevant: &[String], mut fetch: F) -> Result<Snapshot>
where
    F: FnMut(&str) -> Result<String>,
{
    let mut snapshot = Snapshot::new();

    for commit_id in relevant.iter().rev() {
        let text = fetch(commit_id.as_str()).map_err(|err| match err {
            KevaError::NoAnnotationPresent { commit_id } => {
                KevaError::InconsistentAnnotationSet { commit_id }
            }
            other => other,
        })?;

        match decode_annotation(&text)? {
            AnnotationBody::Events(events) => {
                for event in events.iter().rev() {
                    apply_event(&mut snapshot, event, commit_id);
                }
            }
            AnnotationBody::Legacy(stored) => snapshot = stored,
        }
    }

    Ok(snapshot)
}
