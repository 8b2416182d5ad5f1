//! keva Core - event-sourced key/value resolution over commit annotations
//!
//! This crate provides:
//! - Event and snapshot models with key validation
//! - The annotation codec (event log, legacy snapshots read-only)
//! - The `NotesBackend` collaborator trait and an in-memory repository
//! - Relevant-annotation location and snapshot reconstruction
//! - The mutator that records new events on HEAD
//! - Error facility, configuration and structured logging shared by all crates

pub mod codec;
pub mod config;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod mutate;
pub mod resolve;
pub mod rules;
pub mod store;

// Re-export commonly used types
pub use config::KevaConfig;
pub use errors::{ErrorClass, ExError, ExErrorKind, KevaError, Result};
pub use model::{Change, Event, EventType, Snapshot, Value};
pub use mutate::{apply_mutation, Mutation};
pub use resolve::load_snapshot;
pub use store::NotesBackend;
