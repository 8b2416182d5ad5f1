//! Canonical schema constants for structured logging
//!
//! Every tracing event emitted by keva uses these field keys so log output
//! can be filtered the same way regardless of which crate produced it.

// Operation envelope
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Repository coordinates
pub const FIELD_NOTES_REF: &str = "notes_ref";
pub const FIELD_REMOTE: &str = "remote";
pub const FIELD_COMMIT_ID: &str = "commit_id";
pub const FIELD_KEY: &str = "key";

// Sync progress
pub const FIELD_ATTEMPT: &str = "attempt";
pub const FIELD_ATTEMPTS_LEFT: &str = "attempts_left";
pub const FIELD_FORCE: &str = "force";
pub const FIELD_PHASE: &str = "phase";

// Collection sizes
pub const FIELD_ANNOTATION_COUNT: &str = "annotation_count";
pub const FIELD_ANCESTRY_LEN: &str = "ancestry_len";
pub const FIELD_RELEVANT_COUNT: &str = "relevant_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_distinct() {
        assert_ne!(EVENT_START, EVENT_END);
        assert_ne!(EVENT_START, EVENT_END_ERROR);
        assert_ne!(EVENT_END, EVENT_END_ERROR);
    }

    #[test]
    fn test_field_keys_are_unique() {
        let keys = [
            FIELD_COMPONENT,
            FIELD_OP,
            FIELD_EVENT,
            FIELD_DURATION_MS,
            FIELD_NOTES_REF,
            FIELD_REMOTE,
            FIELD_COMMIT_ID,
            FIELD_KEY,
            FIELD_ATTEMPT,
            FIELD_ATTEMPTS_LEFT,
            FIELD_FORCE,
            FIELD_PHASE,
            FIELD_ANNOTATION_COUNT,
            FIELD_ANCESTRY_LEN,
            FIELD_RELEVANT_COUNT,
            FIELD_ERR_KIND,
            FIELD_ERR_CODE,
        ];
        let mut sorted = keys.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), keys.len());
    }
}
