//! Types shared across keva facilities
//!
//! Holds the canonical structured-logging vocabulary used by the logging
//! macros in `keva-core` and by every crate that emits tracing events.

pub mod schema;
