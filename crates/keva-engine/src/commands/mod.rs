//! Command orchestration layer.
//!
//! The engine owns lifecycle logging for every command:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! Lower layers (core, git) use only `tracing::debug!()` and friends for
//! internal details.

pub mod engine_command;
