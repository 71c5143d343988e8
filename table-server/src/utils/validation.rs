//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement except where the schema adds a CHECK.

use crate::core::{EngineError, EngineResult};
use shared::error::ErrorCode;

// ── Text length limits ──────────────────────────────────────────────

/// Customer names
pub const MAX_NAME_LEN: usize = 200;

/// Reservation notes
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: national id, phone
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Customer feedback comments
pub const MAX_COMMENT_LEN: usize = 150;

/// Party size accepted for a single table
pub const MAX_PARTY_SIZE: i32 = 100;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> EngineResult<()> {
    if value.trim().is_empty() {
        return Err(EngineError::InvalidInput {
            code: ErrorCode::RequiredField,
            message: format!("{field} must not be empty"),
        });
    }
    check_len(value, field, max_len)
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(value: &Option<String>, field: &str, max_len: usize) -> EngineResult<()> {
    match value {
        Some(v) => check_len(v, field, max_len),
        None => Ok(()),
    }
}

/// Validate a comment body (counted in characters, not bytes)
pub fn validate_comment(comment: &str) -> EngineResult<()> {
    if comment.trim().is_empty() {
        return Err(EngineError::InvalidInput {
            code: ErrorCode::RequiredField,
            message: "comment must not be empty".into(),
        });
    }
    let chars = comment.chars().count();
    if chars > MAX_COMMENT_LEN {
        return Err(EngineError::InvalidInput {
            code: ErrorCode::CommentTooLong,
            message: format!("comment is too long ({chars} chars, max {MAX_COMMENT_LEN})"),
        });
    }
    Ok(())
}

/// Validate an optional party size
pub fn validate_party_size(party_size: Option<i32>) -> EngineResult<()> {
    if let Some(size) = party_size
        && !(1..=MAX_PARTY_SIZE).contains(&size)
    {
        return Err(EngineError::InvalidInput {
            code: ErrorCode::ValueOutOfRange,
            message: format!("party_size must be between 1 and {MAX_PARTY_SIZE}, got {size}"),
        });
    }
    Ok(())
}

/// Normalize an optional string: trimmed, empty becomes `None`
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn check_len(value: &str, field: &str, max_len: usize) -> EngineResult<()> {
    if value.len() > max_len {
        return Err(EngineError::InvalidInput {
            code: ErrorCode::ValueOutOfRange,
            message: format!("{field} is too long ({} chars, max {max_len})", value.len()),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("  ", "national_id", 10).is_err());
        assert!(validate_required_text("123", "national_id", 2).is_err());
        assert!(validate_required_text("123", "national_id", 3).is_ok());
    }

    #[test]
    fn test_comment_limit_counts_chars() {
        let exactly = "ñ".repeat(MAX_COMMENT_LEN);
        assert!(validate_comment(&exactly).is_ok());

        let err = validate_comment(&"a".repeat(MAX_COMMENT_LEN + 1)).unwrap_err();
        assert_eq!(err.code(), ErrorCode::CommentTooLong);
    }

    #[test]
    fn test_party_size_range() {
        assert!(validate_party_size(None).is_ok());
        assert!(validate_party_size(Some(4)).is_ok());
        assert!(validate_party_size(Some(0)).is_err());
    }

    #[test]
    fn test_normalize_optional() {
        assert_eq!(normalize_optional(Some("  ".into())), None);
        assert_eq!(normalize_optional(Some(" Ana ".into())), Some("Ana".into()));
    }
}
