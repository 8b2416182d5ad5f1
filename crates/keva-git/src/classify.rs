use keva_core::errors::KevaError;

use crate::errors::tool_failure;

const NO_REMOTE_REF_PREFIX: &str = "fatal: couldn't find remote ref refs/notes/";
const NO_NOTE_PREFIX: &str = "error: no note found for object ";
const REJECTED_MARKERS: [&str; 2] = ["! [rejected]", "! [remote rejected]"];

/// Map the output of a failed git invocation to an error kind
///
/// `output` is stdout followed by stderr. Anything unrecognized becomes
/// `ExternalTool` with the output untouched.
pub fn classify_failure(
    op: &str,
    notes_ref: &str,
    commit_id: Option<&str>,
    output: &str,
) -> KevaError {
    let trimmed = output.trim_start();

    if trimmed.to_lowercase().starts_with(NO_REMOTE_REF_PREFIX) {
        return KevaError::NoRemoteRef {
            notes_ref: notes_ref.to_string(),
        };
    }

    if trimmed.starts_with(NO_NOTE_PREFIX) {
        return KevaError::NoAnnotationPresent {
            commit_id: commit_id.unwrap_or_default().to_string(),
        };
    }

    if REJECTED_MARKERS.iter().any(|marker| output.contains(marker)) {
        return KevaError::UpstreamChanged {
            notes_ref: notes_ref.to_string(),
        };
    }

    tool_failure(op, output)
}
