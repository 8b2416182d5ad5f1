//! Engine-level commands that touch the repository.

use std::time::Instant;

use keva_core::config::KevaConfig;
use keva_core::errors::Result;
use keva_core::model::{Snapshot, Value};
use keva_core::mutate::Mutation;
use keva_core::rules::validate_key;
use keva_core::store::NotesBackend;
use keva_core::{log_op_end, log_op_error, log_op_start};

use crate::sync::{SyncController, WriteOutcome};

/// A user-facing command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    /// Look up one key
    Get { key: String },
    /// Resolve the whole snapshot
    List,
    /// Set a key on HEAD
    Set {
        key: String,
        value: String,
        push: bool,
    },
    /// Unset a key on HEAD; unsetting an absent key is still recorded
    Unset { key: String, push: bool },
}

impl EngineCommand {
    pub fn op_name(&self) -> &'static str {
        match self {
            EngineCommand::Get { .. } => "get",
            EngineCommand::List => "list",
            EngineCommand::Set { .. } => "set",
            EngineCommand::Unset { .. } => "unset",
        }
    }
}

/// Result of applying an engine command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommandResult {
    /// `Get`: the value, if the key is set
    Value(Option<Value>),
    /// `List`: the resolved snapshot
    Snapshot(Snapshot),
    /// `Set` / `Unset`
    Written(WriteOutcome),
}

/// Apply a command against `backend` with `config`
///
/// # Errors
///
/// `InvalidConfig` before any repository access; otherwise whatever the
/// sync controller surfaces.
pub fn apply_engine_command<B>(
    cmd: EngineCommand,
    backend: &mut B,
    config: &KevaConfig,
) -> Result<EngineCommandResult>
where
    B: NotesBackend + ?Sized,
{
    let op = cmd.op_name();
    log_op_start!(op, notes_ref = %config.notes_ref);
    let start = Instant::now();

    let result = apply_engine_command_impl(cmd, backend, config).map_err(|e| {
        log_op_error!(
            op,
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(op, duration_ms = start.elapsed().as_millis() as u64);
    Ok(result)
}

fn apply_engine_command_impl<B>(
    cmd: EngineCommand,
    backend: &mut B,
    config: &KevaConfig,
) -> Result<EngineCommandResult>
where
    B: NotesBackend + ?Sized,
{
    config.validate()?;
    let mut controller = SyncController::new(backend, config);

    match cmd {
        EngineCommand::Get { key } => {
            validate_key(&key)?;
            let snapshot = controller.run_read()?;
            Ok(EngineCommandResult::Value(snapshot.get(&key).cloned()))
        }
        EngineCommand::List => Ok(EngineCommandResult::Snapshot(controller.run_read()?)),
        EngineCommand::Set { key, value, push } => {
            let outcome = controller.run_write(&Mutation::Set { key, value }, push)?;
            Ok(EngineCommandResult::Written(outcome))
        }
        EngineCommand::Unset { key, push } => {
            let outcome = controller.run_write(&Mutation::Unset { key }, push)?;
            Ok(EngineCommandResult::Written(outcome))
        }
    }
}
