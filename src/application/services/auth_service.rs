//! Shared-secret authentication for the admin surface.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::AppError;
use serde_json::json;

type HmacSha256 = Hmac<Sha256>;

const TOKEN_LABEL: &[u8] = b"click-tracker/admin";

/// Service checking presented tokens against the configured admin secret.
///
/// Only an HMAC-SHA256 tag keyed by the secret is kept; presented tokens are
/// tagged the same way and compared with [`Mac::verify_slice`], which runs in
/// constant time.
pub struct AuthService {
    expected_tag: Vec<u8>,
}

impl AuthService {
    /// Creates an authentication service for `admin_token`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the token is empty.
    pub fn new(admin_token: &str) -> Result<Self, AppError> {
        if admin_token.is_empty() {
            return Err(AppError::bad_request(
                "Admin token must not be empty",
                json!({}),
            ));
        }

        let expected_tag = tag_for(admin_token)?.finalize().into_bytes().to_vec();

        Ok(Self { expected_tag })
    }

    /// Authenticates a presented token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token does not match.
    pub fn authenticate(&self, token: &str) -> Result<(), AppError> {
        tag_for(token)?
            .verify_slice(&self.expected_tag)
            .map_err(|_| {
                AppError::unauthorized("Unauthorized", json!({ "reason": "Invalid token" }))
            })
    }
}

fn tag_for(token: &str) -> Result<HmacSha256, AppError> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(token.as_bytes()).map_err(|e| {
        AppError::internal(
            "Failed to initialise HMAC",
            json!({ "reason": e.to_string() }),
        )
    })?;
    mac.update(TOKEN_LABEL);
    Ok(mac)
}
