//! Structured logging facility for keva
//!
//! - Single initialization point via `init(profile)`
//! - Operation macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode for asserting on emitted events
//!
//! All output goes to stderr; stdout belongs to command results.
//!
//! # Usage
//!
//! ```rust
//! use keva_core::logging_facility::{init, Profile};
//!
//! init(Profile::Human);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
