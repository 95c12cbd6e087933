//! Administrator authentication for the admin endpoints and purchase override.

use hmac::{Hmac, Mac};
use rand::Rng;
use serde_json::json;
use sha2::Sha256;

use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Checks presented credentials against the configured `ADMIN_TOKEN`.
///
/// The token is kept only as an HMAC-SHA256 digest under a per-process random
/// key, and comparisons go through [`Mac::verify_slice`], which runs in
/// constant time.
///
/// When no token is configured the service is disabled: admin endpoints are
/// open and any non-empty purchase `admin` value counts as an override.
pub struct AuthService {
    key: [u8; 32],
    token_digest: Option<Vec<u8>>,
}

impl AuthService {
    /// Creates the service from an optional admin token.
    pub fn new(admin_token: Option<&str>) -> Self {
        let mut key = [0u8; 32];
        rand::rng().fill(&mut key);

        let token_digest = admin_token
            .filter(|t| !t.is_empty())
            .map(|t| Self::digest(&key, t));

        Self { key, token_digest }
    }

    fn mac(key: &[u8]) -> HmacSha256 {
        HmacSha256::new_from_slice(key).expect("HMAC accepts any key length")
    }

    fn digest(key: &[u8], token: &str) -> Vec<u8> {
        let mut mac = Self::mac(key);
        mac.update(token.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }

    /// Returns true if an admin token is configured.
    pub fn is_enabled(&self) -> bool {
        self.token_digest.is_some()
    }

    /// Returns true if `token` equals the configured admin token.
    ///
    /// Always true when no token is configured.
    pub fn verify(&self, token: &str) -> bool {
        match &self.token_digest {
            None => true,
            Some(expected) => {
                let mut mac = Self::mac(&self.key);
                mac.update(token.as_bytes());
                mac.verify_slice(expected).is_ok()
            }
        }
    }

    /// Authorizes an admin request carrying an optional bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if a token is configured and the
    /// presented one is missing or wrong.
    pub fn authorize(&self, bearer: Option<&str>) -> Result<(), AppError> {
        if !self.is_enabled() {
            return Ok(());
        }

        match bearer {
            Some(token) if self.verify(token) => Ok(()),
            Some(_) => Err(AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "Invalid admin token" }),
            )),
            None => Err(AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "Authorization header is missing or invalid" }),
            )),
        }
    }

    /// Converts the purchase request's `admin` string into an override flag.
    ///
    /// Empty or missing values never override. With a configured token the
    /// value must match it; otherwise any non-empty value does.
    pub fn admin_override(&self, value: Option<&str>) -> bool {
        match value {
            None | Some("") => false,
            Some(v) => self.verify(v),
        }
    }
}
