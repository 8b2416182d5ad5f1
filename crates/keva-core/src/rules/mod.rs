pub mod key;

pub use key::{sanitize_key, validate_key};
