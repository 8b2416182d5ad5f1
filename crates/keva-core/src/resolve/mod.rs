//! Snapshot resolution: locate the relevant annotations, then replay them

pub mod locator;
pub mod replay;

pub use locator::{ancestry_request_len, locate, Located, LocatorOutcome};
pub use replay::{apply_event, reconstruct};

use crate::config::KevaConfig;
use crate::errors::Result;
use crate::model::Snapshot;
use crate::store::{parse_commit_log, parse_notes_list, NotesBackend};

/// Find the annotations relevant to HEAD under `config`
///
/// # Errors
///
/// Propagates backend failures and `DuplicateAnnotation`.
pub fn locate_in<B>(backend: &B, config: &KevaConfig) -> Result<Located>
where
    B: NotesBackend + ?Sized,
{
    let ancestry = parse_commit_log(&backend.log_commits(ancestry_request_len(config.max_depth))?);
    let annotated: Vec<String> = parse_notes_list(&backend.notes_list(&config.notes_ref)?)?
        .into_iter()
        .map(|entry| entry.commit_id)
        .collect();

    let located = locate(&annotated, &ancestry, config.max_depth)?;

    match located.outcome {
        LocatorOutcome::Found => tracing::debug!(
            notes_ref = %config.notes_ref,
            annotation_count = annotated.len(),
            ancestry_len = ancestry.len(),
            relevant_count = located.relevant.len(),
            "Located relevant annotations"
        ),
        LocatorOutcome::RootReached => tracing::debug!(
            notes_ref = %config.notes_ref,
            ancestry_len = ancestry.len(),
            "No prior annotation, root reached"
        ),
        LocatorOutcome::DepthExhausted => tracing::warn!(
            notes_ref = %config.notes_ref,
            max_depth = config.max_depth,
            "No annotation found within max depth; consider raising --max-depth"
        ),
    }

    Ok(located)
}

/// Resolve the current snapshot for `config.notes_ref`
///
/// # Errors
///
/// Backend failures, `DuplicateAnnotation`, `InconsistentAnnotationSet`
/// and any corruption found while decoding annotations.
pub fn load_snapshot<B>(backend: &B, config: &KevaConfig) -> Result<Snapshot>
where
    B: NotesBackend + ?Sized,
{
    let located = locate_in(backend, config)?;
    reconstruct(&located.relevant, |commit_id| {
        backend.notes_show(&config.notes_ref, commit_id)
    })
}
