//! Identifier validation

use crate::errors::{Error, Result};

/// Check an identifier against the allowed pattern `[A-Za-z0-9_-]+`
///
/// Applies to permission actions, permission resources, and role names.
pub fn validate_identifier(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::validation(field, "must not be empty"));
    }

    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(Error::validation(
            field,
            format!("{value:?} may only contain letters, digits, underscores, and hyphens"),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_allowed_characters() {
        for value in ["read", "POST", "user_account", "blog-post", "v2", "_", "-"] {
            assert!(validate_identifier("action", value).is_ok(), "{value}");
        }
    }

    #[test]
    fn test_rejects_empty() {
        let err = validate_identifier("action", "").unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[test]
    fn test_rejects_disallowed_characters() {
        for value in ["a b", "a b!", "post/comment", "naïve", "read\n", " "] {
            let err = validate_identifier("resource", value).unwrap_err();
            assert!(matches!(err, Error::Validation { .. }), "{value}");
        }
    }

    #[test]
    fn test_error_names_the_field() {
        let err = validate_identifier("name", "a b").unwrap_err();
        assert!(err.to_string().contains("name"));
    }
}
