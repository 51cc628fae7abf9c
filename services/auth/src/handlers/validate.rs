//! Transport-level field checks: presence and maximum length only.

use crate::error::AuthServiceError;

/// Whitespace-only counts as missing. The value itself is never trimmed.
pub(crate) fn required(field: &str, value: &str, max_len: usize) -> Result<(), AuthServiceError> {
    if value.trim().is_empty() {
        return Err(AuthServiceError::InvalidRequest(format!(
            "{field} is required"
        )));
    }
    max_length(field, value, max_len)
}

pub(crate) fn optional(
    field: &str,
    value: Option<&str>,
    max_len: usize,
) -> Result<(), AuthServiceError> {
    match value {
        Some(value) => max_length(field, value, max_len),
        None => Ok(()),
    }
}

fn max_length(field: &str, value: &str, max_len: usize) -> Result<(), AuthServiceError> {
    if value.chars().count() > max_len {
        return Err(AuthServiceError::InvalidRequest(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(())
}
