use thiserror::Error;

/// Result type alias using KevaError
pub type Result<T> = std::result::Result<T, KevaError>;

// ========== Error Facility ==========

/// How the caller is expected to react to an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Bad user input. Surfaced immediately, never retried.
    Validation,
    /// Normal absence of data. Normalized to empty state by the flow.
    ExpectedAbsence,
    /// The remote moved underneath us. Recovered by whole-command retry.
    Conflict,
    /// Previously stored data cannot be trusted. Fatal.
    Corruption,
    /// A collaborator (git, the OS) failed in an unclassified way.
    External,
    /// The engine broke one of its own invariants.
    Internal,
}

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code usable for programmatic handling,
/// in tests, and in the CLI's error output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Validation
    InvalidKey,
    InvalidOutputFormat,
    InvalidConfig,

    // Expected absence
    NoRemoteRef,
    NoAnnotationPresent,

    // Concurrency
    UpstreamChanged,

    // Corruption of stored annotations
    UnknownType,
    KeyMissing,
    ValueMissing,
    MalformedAnnotation,

    // Collaborators
    ExternalTool,
    Io,
    Serialization,

    // Internal
    DuplicateAnnotation,
    InconsistentAnnotationSet,
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidKey => "ERR_INVALID_KEY",
            ExErrorKind::InvalidOutputFormat => "ERR_INVALID_OUTPUT_FORMAT",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::NoRemoteRef => "ERR_NO_REMOTE_REF",
            ExErrorKind::NoAnnotationPresent => "ERR_NO_ANNOTATION_PRESENT",
            ExErrorKind::UpstreamChanged => "ERR_UPSTREAM_CHANGED",
            ExErrorKind::UnknownType => "ERR_UNKNOWN_TYPE",
            ExErrorKind::KeyMissing => "ERR_KEY_MISSING",
            ExErrorKind::ValueMissing => "ERR_VALUE_MISSING",
            ExErrorKind::MalformedAnnotation => "ERR_MALFORMED_ANNOTATION",
            ExErrorKind::ExternalTool => "ERR_EXTERNAL_TOOL",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::DuplicateAnnotation => "ERR_DUPLICATE_ANNOTATION",
            ExErrorKind::InconsistentAnnotationSet => "ERR_INCONSISTENT_ANNOTATION_SET",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Get the handling class for this kind
    pub fn class(&self) -> ErrorClass {
        match self {
            ExErrorKind::InvalidKey
            | ExErrorKind::InvalidOutputFormat
            | ExErrorKind::InvalidConfig => ErrorClass::Validation,

            ExErrorKind::NoRemoteRef | ExErrorKind::NoAnnotationPresent => {
                ErrorClass::ExpectedAbsence
            }

            ExErrorKind::UpstreamChanged => ErrorClass::Conflict,

            ExErrorKind::UnknownType
            | ExErrorKind::KeyMissing
            | ExErrorKind::ValueMissing
            | ExErrorKind::MalformedAnnotation => ErrorClass::Corruption,

            ExErrorKind::ExternalTool | ExErrorKind::Io | ExErrorKind::Serialization => {
                ErrorClass::External
            }

            ExErrorKind::DuplicateAnnotation
            | ExErrorKind::InconsistentAnnotationSet
            | ExErrorKind::Internal => ErrorClass::Internal,
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification plus whatever repository coordinates were known
/// when the error was raised.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    notes_ref: Option<String>,
    commit_id: Option<String>,
    key: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            notes_ref: None,
            commit_id: None,
            key: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add notes ref context
    pub fn with_notes_ref(mut self, notes_ref: impl Into<String>) -> Self {
        self.notes_ref = Some(notes_ref.into());
        self
    }

    /// Add commit context
    pub fn with_commit_id(mut self, commit_id: impl Into<String>) -> Self {
        self.commit_id = Some(commit_id.into());
        self
    }

    /// Add key context
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn class(&self) -> ErrorClass {
        self.kind.class()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn notes_ref(&self) -> Option<&str> {
        self.notes_ref.as_deref()
    }

    pub fn commit_id(&self) -> Option<&str> {
        self.commit_id.as_deref()
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(key) = &self.key {
            write!(f, " (key: {})", key)?;
        }
        if let Some(commit_id) = &self.commit_id {
            write!(f, " (commit: {})", commit_id)?;
        }
        if let Some(notes_ref) = &self.notes_ref {
            write!(f, " (ref: {})", notes_ref)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for keva operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KevaError {
    // ===== Validation =====
    /// Key failed the syntactic key rules
    #[error("Invalid key: {reason}")]
    InvalidKey { key: String, reason: String },

    /// Unknown rendering requested for a snapshot
    #[error("Invalid output format: {format}")]
    InvalidOutputFormat { format: String },

    /// Configuration value rejected before any repository access
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // ===== Expected absence =====
    /// The remote has no such notes ref yet
    #[error("No remote reference found for refs/notes/{notes_ref}")]
    NoRemoteRef { notes_ref: String },

    /// The commit carries no annotation under the ref
    #[error("No annotation present on commit {commit_id}")]
    NoAnnotationPresent { commit_id: String },

    // ===== Concurrency =====
    /// The remote notes ref moved since it was last fetched
    #[error("Upstream has changed in the meanwhile (refs/notes/{notes_ref})")]
    UpstreamChanged { notes_ref: String },

    // ===== Corruption =====
    /// A stored event carries a type tag this build does not know
    #[error("Unknown event type: {event_type}")]
    UnknownType { event_type: String },

    /// A stored event has a missing or empty key
    #[error("Key missing from event: {record}")]
    KeyMissing { record: String },

    /// A stored set event has no value
    #[error("Value missing from set event for key {key}")]
    ValueMissing { key: String },

    /// Annotation text is not a recognizable record
    #[error("Malformed annotation: {message}")]
    MalformedAnnotation { message: String },

    // ===== Collaborators =====
    /// git (or another external tool) failed; output carried verbatim
    #[error("{op} failed: {output}")]
    ExternalTool { op: String, output: String },

    /// Spawning or talking to a collaborator process failed
    #[error("I/O error during {op}: {message}")]
    Io { op: String, message: String },

    /// Serialization error (JSON encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    // ===== Internal =====
    /// The annotation listing names the same commit twice
    #[error("Commit {commit_id} has more than one annotation")]
    DuplicateAnnotation { commit_id: String },

    /// The locator selected a commit whose annotation cannot be read back
    #[error("Annotation for commit {commit_id} disappeared during replay")]
    InconsistentAnnotationSet { commit_id: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl KevaError {
    /// Canonical kind of this error
    pub fn kind(&self) -> ExErrorKind {
        match self {
            KevaError::InvalidKey { .. } => ExErrorKind::InvalidKey,
            KevaError::InvalidOutputFormat { .. } => ExErrorKind::InvalidOutputFormat,
            KevaError::InvalidConfig { .. } => ExErrorKind::InvalidConfig,
            KevaError::NoRemoteRef { .. } => ExErrorKind::NoRemoteRef,
            KevaError::NoAnnotationPresent { .. } => ExErrorKind::NoAnnotationPresent,
            KevaError::UpstreamChanged { .. } => ExErrorKind::UpstreamChanged,
            KevaError::UnknownType { .. } => ExErrorKind::UnknownType,
            KevaError::KeyMissing { .. } => ExErrorKind::KeyMissing,
            KevaError::ValueMissing { .. } => ExErrorKind::ValueMissing,
            KevaError::MalformedAnnotation { .. } => ExErrorKind::MalformedAnnotation,
            KevaError::ExternalTool { .. } => ExErrorKind::ExternalTool,
            KevaError::Io { .. } => ExErrorKind::Io,
            KevaError::Serialization { .. } => ExErrorKind::Serialization,
            KevaError::DuplicateAnnotation { .. } => ExErrorKind::DuplicateAnnotation,
            KevaError::InconsistentAnnotationSet { .. } => ExErrorKind::InconsistentAnnotationSet,
            KevaError::Internal { .. } => ExErrorKind::Internal,
        }
    }

    pub fn class(&self) -> ErrorClass {
        self.kind().class()
    }

    /// True for the divergence condition that whole-command retry recovers from
    pub fn is_upstream_changed(&self) -> bool {
        matches!(self, KevaError::UpstreamChanged { .. })
    }
}

/// Conversion from KevaError to ExError
impl From<KevaError> for ExError {
    fn from(err: KevaError) -> Self {
        let kind = err.kind();
        let message = err.to_string();
        let ex = ExError::new(kind).with_message(message);
        match err {
            KevaError::InvalidKey { key, .. } => ex.with_op("validate_key").with_key(key),
            KevaError::InvalidOutputFormat { .. } => ex.with_op("render"),
            KevaError::InvalidConfig { .. } => ex.with_op("config"),
            KevaError::NoRemoteRef { notes_ref } => ex.with_op("fetch").with_notes_ref(notes_ref),
            KevaError::NoAnnotationPresent { commit_id } => {
                ex.with_op("notes_show").with_commit_id(commit_id)
            }
            KevaError::UpstreamChanged { notes_ref } => ex.with_op("sync").with_notes_ref(notes_ref),
            KevaError::UnknownType { .. }
            | KevaError::KeyMissing { .. }
            | KevaError::MalformedAnnotation { .. } => ex.with_op("decode_annotation"),
            KevaError::ValueMissing { key } => ex.with_op("decode_annotation").with_key(key),
            KevaError::ExternalTool { op, .. } | KevaError::Io { op, .. } => ex.with_op(op),
            KevaError::Serialization { .. } => ex,
            KevaError::DuplicateAnnotation { commit_id } => {
                ex.with_op("locate").with_commit_id(commit_id)
            }
            KevaError::InconsistentAnnotationSet { commit_id } => {
                ex.with_op("reconstruct").with_commit_id(commit_id)
            }
            KevaError::Internal { .. } => ex,
        }
    }
}

/// Conversion from serde_json::Error to KevaError
impl From<serde_json::Error> for KevaError {
    fn from(err: serde_json::Error) -> Self {
        KevaError::Serialization {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corruption_kinds_share_a_class() {
        for kind in [
            ExErrorKind::UnknownType,
            ExErrorKind::KeyMissing,
            ExErrorKind::ValueMissing,
            ExErrorKind::MalformedAnnotation,
        ] {
            assert_eq!(kind.class(), ErrorClass::Corruption, "{:?}", kind);
        }
    }

    #[test]
    fn test_only_upstream_changed_is_a_conflict() {
        let err = KevaError::UpstreamChanged {
            notes_ref: "keva".to_string(),
        };
        assert!(err.is_upstream_changed());
        assert_eq!(err.class(), ErrorClass::Conflict);

        let other = KevaError::NoRemoteRef {
            notes_ref: "keva".to_string(),
        };
        assert!(!other.is_upstream_changed());
    }

    #[test]
    fn test_ex_error_display_includes_code_and_context() {
        let ex: ExError = KevaError::InvalidKey {
            key: "foo!".to_string(),
            reason: "key contains invalid characters".to_string(),
        }
        .into();

        let rendered = ex.to_string();
        assert!(rendered.starts_with("[ERR_INVALID_KEY]"));
        assert!(rendered.contains("key contains invalid characters"));
        assert!(rendered.contains("(key: foo!)"));
    }
}
