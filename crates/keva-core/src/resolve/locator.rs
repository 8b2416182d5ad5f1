use std::collections::HashSet;

use crate::errors::{KevaError, Result};

/// Why the locator stopped where it did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocatorOutcome {
    /// At least one annotated commit lies within the bound
    Found,
    /// The whole history fits within the bound and none of it is annotated
    RootReached,
    /// The bound was hit before the root without finding an annotation
    DepthExhausted,
}

/// Annotated commits that contribute to the current state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    /// Head first
    pub relevant: Vec<String>,
    pub outcome: LocatorOutcome,
}

/// Number of commits to request from the history so that [`locate`] can
/// tell a reached root from an exhausted bound
pub fn ancestry_request_len(max_depth: u32) -> usize {
    (max_depth as usize).saturating_add(2)
}

/// Select the annotated commits among the first `max_depth + 1` ancestors
///
/// `ancestry` is newest first and may be longer than the window; one extra
/// entry past the window means the search stopped short of the root.
/// The result keeps ancestry order.
///
/// # Errors
///
/// Returns `DuplicateAnnotation` if a commit appears twice in `annotated`.
pub fn locate(annotated: &[String], ancestry: &[String], max_depth: u32) -> Result<Located> {
    let mut annotated_set = HashSet::with_capacity(annotated.len());
    for commit_id in annotated {
        if !annotated_set.insert(commit_id.as_str()) {
            return Err(KevaError::DuplicateAnnotation {
                commit_id: commit_id.clone(),
            });
        }
    }

    let window = (max_depth as usize).saturating_add(1).min(ancestry.len());
    let relevant: Vec<String> = ancestry[..window]
        .iter()
        .filter(|commit_id| annotated_set.contains(commit_id.as_str()))
        .cloned()
        .collect();

    let outcome = if !relevant.is_empty() {
        LocatorOutcome::Found
    } else if ancestry.len() > window {
        LocatorOutcome::DepthExhausted
    } else {
        LocatorOutcome::RootReached
    };

    Ok(Located { relevant, outcome })
}
