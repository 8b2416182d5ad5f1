#![allow(clippy::unwrap_used, clippy::expect_used)]

use keva_core::logging_facility::test_capture::init_test_capture;
use keva_core::store::memory::MemoryRepo;
use keva_core::KevaConfig;
use keva_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_ERR_CODE, FIELD_NOTES_REF,
};
use keva_engine::{apply_engine_command, EngineCommand};

#[test]
fn test_commands_log_start_and_end() {
    let capture = init_test_capture();
    let mut repo = MemoryRepo::with_commits(1);
    let config = KevaConfig::default().with_fetch(false);

    apply_engine_command(EngineCommand::List, &mut repo, &config).unwrap();

    capture.assert_event_exists("list", EVENT_START);
    capture.assert_event_exists("list", EVENT_END);
    let start = capture
        .events_for_op("list")
        .into_iter()
        .find(|e| e.event.as_deref() == Some(EVENT_START))
        .unwrap();
    assert_eq!(start.field(FIELD_NOTES_REF), Some("keva"));
}

#[test]
fn test_failed_command_logs_error_code() {
    let capture = init_test_capture();
    let mut repo = MemoryRepo::with_commits(1);
    let config = KevaConfig::default().with_fetch(false);

    let cmd = EngineCommand::Unset {
        key: "bad!".to_string(),
        push: false,
    };
    assert!(apply_engine_command(cmd, &mut repo, &config).is_err());

    let error_event = capture
        .events_for_op("unset")
        .into_iter()
        .find(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .expect("Should have error event");
    assert_eq!(error_event.field(FIELD_ERR_CODE), Some("ERR_INVALID_KEY"));
}
