//! Destination URL validation and normalization.
//!
//! Destinations end up verbatim in the `Location` header, so they must be
//! absolute HTTP(S) URLs serialized in their ASCII form.

use url::Url;

/// Errors that can occur while normalizing a destination.
#[derive(Debug, thiserror::Error)]
pub enum UrlNormalizationError {
    #[error("Destination is empty")]
    Empty,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("Failed to normalize URL: {0}")]
    NormalizationFailed(String),
}

/// Normalizes a destination URL.
///
/// # Normalization Rules
///
/// 1. **Whitespace**: surrounding whitespace is trimmed
/// 2. **Protocol**: only HTTP and HTTPS are allowed
/// 3. **Hostname**: lowercased, IDNs converted to punycode
/// 4. **Default ports**: removed (80 for HTTP, 443 for HTTPS)
/// 5. **Path, query, fragment**: preserved
///
/// Fragments are kept because browsers apply them after following the redirect.
///
/// # Errors
///
/// Returns [`UrlNormalizationError::Empty`] for blank input,
/// [`UrlNormalizationError::InvalidFormat`] for malformed URLs and
/// [`UrlNormalizationError::UnsupportedProtocol`] for non-HTTP(S) schemes.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(
///     normalize_destination(" HTTPS://EXAMPLE.COM:443/Path#top ").unwrap(),
///     "https://example.com/Path#top"
/// );
/// ```
pub fn normalize_destination(input: &str) -> Result<String, UrlNormalizationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlNormalizationError::Empty);
    }

    let mut url =
        Url::parse(trimmed).map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlNormalizationError::UnsupportedProtocol),
    }

    if let Some(host) = url.host_str() {
        let host_lowercase = host.to_ascii_lowercase();
        url.set_host(Some(&host_lowercase)).map_err(|_| {
            UrlNormalizationError::NormalizationFailed("Failed to set normalized host".to_string())
        })?;
    }

    let is_default_port = matches!(
        (url.scheme(), url.port()),
        ("http", Some(80)) | ("https", Some(443))
    );
    if is_default_port {
        url.set_port(None).map_err(|_| {
            UrlNormalizationError::NormalizationFailed("Failed to remove default port".to_string())
        })?;
    }

    Ok(url.to_string())
}
