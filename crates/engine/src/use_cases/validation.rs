//! Common validation helpers for use cases.

/// Validation error type.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("{field_name} cannot be empty")]
    Empty { field_name: &'static str },

    #[error("{field_name} exceeds maximum length of {max}")]
    TooLong { field_name: &'static str, max: usize },

    #[error("{field_name} is invalid: {reason}")]
    Invalid {
        field_name: &'static str,
        reason: String,
    },
}

/// Validate a string is non-empty after trimming.
pub fn require_non_empty(value: &str, field_name: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field_name });
    }
    Ok(())
}

/// Validate a string doesn't exceed max length.
pub fn require_max_length(
    value: &str,
    max: usize,
    field_name: &'static str,
) -> Result<(), ValidationError> {
    if value.len() > max {
        return Err(ValidationError::TooLong { field_name, max });
    }
    Ok(())
}

/// Validate an integer is at least `min`.
pub fn require_at_least(
    value: u32,
    min: u32,
    field_name: &'static str,
) -> Result<(), ValidationError> {
    if value < min {
        return Err(ValidationError::Invalid {
            field_name,
            reason: format!("must be at least {min}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_non_empty_rejects_whitespace() {
        assert!(require_non_empty("  ", "description").is_err());
        assert!(require_non_empty("ok", "description").is_ok());
    }

    #[test]
    fn test_require_max_length() {
        assert!(require_max_length(&"x".repeat(101), 100, "description").is_err());
        assert!(require_max_length("short", 100, "description").is_ok());
    }

    #[test]
    fn test_require_at_least() {
        assert!(require_at_least(0, 1, "target").is_err());
        assert!(require_at_least(1, 1, "target").is_ok());
    }
}
