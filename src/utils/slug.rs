//! Slug validation.
//!
//! Slugs are opaque identifiers, but they share the path namespace with the
//! service's own routes, so route names are reserved.

use crate::error::AppError;
use serde_json::json;

/// Maximum slug length in characters.
pub const MAX_SLUG_LENGTH: usize = 100;

/// Route names that cannot be used as slugs.
pub const RESERVED_SLUGS: &[&str] = &["admin", "health"];

/// Validates a slug and returns its trimmed form.
///
/// # Validation Rules
///
/// - 1 to [`MAX_SLUG_LENGTH`] characters after trimming
/// - ASCII letters, digits, `_`, `.` and `-` only (case is preserved)
/// - Not one of [`RESERVED_SLUGS`] (compared case-insensitively)
///
/// # Errors
///
/// Returns [`AppError::Validation`] describing the first rule that failed.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(validate_slug(" promo ").unwrap(), "promo");
/// assert!(validate_slug("spring-2025.v2").is_ok());
/// assert!(validate_slug("a/b").is_err());
/// assert!(validate_slug("admin").is_err());
/// ```
pub fn validate_slug(slug: &str) -> Result<String, AppError> {
    let slug = slug.trim();

    if slug.is_empty() || slug.len() > MAX_SLUG_LENGTH {
        return Err(AppError::bad_request(
            format!("Slug must be 1-{} characters", MAX_SLUG_LENGTH),
            json!({ "provided_length": slug.len() }),
        ));
    }

    if !slug
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err(AppError::bad_request(
            "Slug can only contain letters, digits, '-', '_' and '.'",
            json!({ "slug": slug }),
        ));
    }

    if RESERVED_SLUGS
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(slug))
    {
        return Err(AppError::bad_request(
            "This slug is reserved",
            json!({ "slug": slug }),
        ));
    }

    Ok(slug.to_string())
}
