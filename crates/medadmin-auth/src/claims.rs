//! Unverified inspection of access token claims.
//!
//! The client never holds the signing secret, so it cannot verify tokens.
//! It can still read the payload to show who a stored token belongs to and
//! when it expires. Nothing read here is used for authorization decisions;
//! the backend's `whoami` answer is the only source of identity.

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::Deserialize;

/// Error returned when a token is not a decodable JWT.
#[derive(Debug, thiserror::Error)]
#[error("Malformed access token: {0}")]
pub struct ClaimsError(#[from] jsonwebtoken::errors::Error);

/// Claims commonly present in access tokens issued by the backend.
///
/// Every field is optional; unknown claims are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AccessClaims {
    /// User ID (subject claim)
    #[serde(default)]
    pub sub: Option<serde_json::Value>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    /// Token expiration timestamp (Unix timestamp)
    #[serde(default)]
    pub exp: Option<i64>,
    /// Token issued-at timestamp (Unix timestamp)
    #[serde(default)]
    pub iat: Option<i64>,
}

impl AccessClaims {
    /// Subject as a string, whether the token encodes it as text or number.
    pub fn subject(&self) -> Option<String> {
        match &self.sub {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(serde_json::Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| Utc.timestamp_opt(exp, 0).single())
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.iat.and_then(|iat| Utc.timestamp_opt(iat, 0).single())
    }

    /// `true` if the token carries an expiry that is not after `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|exp| exp <= now)
    }
}

/// Reads the claims of `token` without verifying its signature or expiry.
pub fn peek_claims(token: &str) -> Result<AccessClaims, ClaimsError> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<AccessClaims>(token, &DecodingKey::from_secret(&[]), &validation)?;
    Ok(data.claims)
}
