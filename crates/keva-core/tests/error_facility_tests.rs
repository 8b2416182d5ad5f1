#![allow(clippy::unwrap_used, clippy::expect_used)]

use keva_core::errors::{ErrorClass, ExError, ExErrorKind, KevaError};

#[test]
fn test_every_variant_maps_to_its_kind() {
    let cases = vec![
        (
            KevaError::InvalidKey {
                key: "foo!".to_string(),
                reason: "key contains invalid characters".to_string(),
            },
            ExErrorKind::InvalidKey,
        ),
        (
            KevaError::InvalidOutputFormat {
                format: "yaml".to_string(),
            },
            ExErrorKind::InvalidOutputFormat,
        ),
        (
            KevaError::NoRemoteRef {
                notes_ref: "keva".to_string(),
            },
            ExErrorKind::NoRemoteRef,
        ),
        (
            KevaError::UnknownType {
                event_type: "append".to_string(),
            },
            ExErrorKind::UnknownType,
        ),
        (
            KevaError::ExternalTool {
                op: "push_notes".to_string(),
                output: "fatal: unable to access".to_string(),
            },
            ExErrorKind::ExternalTool,
        ),
        (
            KevaError::DuplicateAnnotation {
                commit_id: "abc".to_string(),
            },
            ExErrorKind::DuplicateAnnotation,
        ),
    ];

    for (err, kind) in cases {
        assert_eq!(err.kind(), kind);
        let ex: ExError = err.clone().into();
        assert_eq!(ex.kind(), kind);
        assert_eq!(ex.message(), err.to_string());
    }
}

#[test]
fn test_error_codes_are_stable() {
    assert_eq!(ExErrorKind::InvalidKey.code(), "ERR_INVALID_KEY");
    assert_eq!(ExErrorKind::UpstreamChanged.code(), "ERR_UPSTREAM_CHANGED");
    assert_eq!(
        ExErrorKind::InconsistentAnnotationSet.code(),
        "ERR_INCONSISTENT_ANNOTATION_SET"
    );
}

#[test]
fn test_classes_follow_taxonomy() {
    assert_eq!(ExErrorKind::InvalidConfig.class(), ErrorClass::Validation);
    assert_eq!(
        ExErrorKind::NoAnnotationPresent.class(),
        ErrorClass::ExpectedAbsence
    );
    assert_eq!(ExErrorKind::ValueMissing.class(), ErrorClass::Corruption);
    assert_eq!(ExErrorKind::Io.class(), ErrorClass::External);
    assert_eq!(ExErrorKind::DuplicateAnnotation.class(), ErrorClass::Internal);
}

#[test]
fn test_external_tool_output_is_carried_verbatim() {
    let output = "error: failed to push some refs to 'origin'\nhint: weird";
    let ex: ExError = KevaError::ExternalTool {
        op: "push_notes".to_string(),
        output: output.to_string(),
    }
    .into();

    assert_eq!(ex.op(), Some("push_notes"));
    assert!(ex.to_string().contains(output));
}

#[test]
fn test_invalid_key_context() {
    let ex: ExError = KevaError::InvalidKey {
        key: "2BeOrNot2Be".to_string(),
        reason: "first character is not a letter".to_string(),
    }
    .into();

    assert_eq!(ex.key(), Some("2BeOrNot2Be"));
    let rendered = ex.to_string();
    assert!(rendered.starts_with("[ERR_INVALID_KEY]"));
    assert!(rendered.contains("(key: 2BeOrNot2Be)"));
}
