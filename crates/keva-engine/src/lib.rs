//! keva Engine - Orchestration layer
//!
//! Drives a command through fetch, resolve, mutate and push against any
//! `NotesBackend`, retrying whole writes when the remote moves underneath.

pub mod commands;
pub mod render;
pub mod sync;

pub use commands::engine_command::{apply_engine_command, EngineCommand, EngineCommandResult};
pub use render::{render_snapshot, render_value, OutputFormat};
pub use sync::{retry_bounded, SyncController, SyncState, WriteOutcome};
