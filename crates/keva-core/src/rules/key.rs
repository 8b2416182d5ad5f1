use crate::errors::{KevaError, Result};

/// Normalize a key: hyphens become underscores, letters are upper-cased
///
/// `"This-key_is-valid"` becomes `"THIS_KEY_IS_VALID"`.
pub fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| if c == '-' { '_' } else { c.to_ascii_uppercase() })
        .collect()
}

/// Validate a key against the key rules
///
/// The rules run against the sanitized form of the key, in order, and the
/// first one that fails is reported:
///
/// 1. the key is non-empty
/// 2. every character is an ASCII letter, digit or underscore
/// 3. the first character is a letter
/// 4. the last character is a letter or digit
///
/// # Errors
///
/// Returns `InvalidKey` naming the first broken rule. The error carries the
/// key as given, not its sanitized form.
pub fn validate_key(key: &str) -> Result<()> {
    let sanitized = sanitize_key(key);
    let reject = |reason: &str| {
        Err(KevaError::InvalidKey {
            key: key.to_string(),
            reason: reason.to_string(),
        })
    };

    let (first, last) = match (sanitized.chars().next(), sanitized.chars().last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return reject("key cannot be empty"),
    };

    if !sanitized
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return reject("key contains invalid characters");
    }

    if !first.is_ascii_alphabetic() {
        return reject("first character is not a letter");
    }

    if !last.is_ascii_alphanumeric() {
        return reject("last character is not a letter or number");
    }

    Ok(())
}
