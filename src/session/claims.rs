//! Unverified access-token claims.
//!
//! The payload segment is decoded without checking the signature. The result
//! only drives UX decisions (which page to show); the server re-validates the
//! token on every data call.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::routes::Role;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClaimsError {
    #[error("no access token")]
    Missing,
    #[error("token has no payload segment")]
    Malformed,
    #[error("payload is not base64url: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("payload is not a JSON claims object: {0}")]
    Json(String),
}

/// Decoded view of an access token's payload.
///
/// Numeric claims are read leniently: a value of the wrong type reads as
/// absent instead of failing the decode, so it can never hide `role`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TokenClaims {
    #[serde(default, deserialize_with = "user_id")]
    pub id: Option<u64>,
    #[serde(default)]
    pub role: Option<String>,
    /// Expiry, epoch seconds. Fractional NumericDates are floored.
    #[serde(default, deserialize_with = "numeric_date")]
    pub exp: Option<i64>,
}

fn user_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64(),
        _ => None,
    })
}

#[allow(clippy::cast_possible_truncation)]
fn numeric_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|secs| secs.floor() as i64)),
        _ => None,
    })
}

impl TokenClaims {
    /// Decode the payload of a compact JWT (`header.payload[.signature]`).
    ///
    /// # Errors
    ///
    /// Returns [`ClaimsError`] when the token has no payload segment or the
    /// segment is not base64url-encoded JSON.
    pub fn decode(token: &str) -> Result<Self, ClaimsError> {
        let payload = token.split('.').nth(1).ok_or(ClaimsError::Malformed)?;
        let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;
        serde_json::from_slice(&bytes).map_err(|e| ClaimsError::Json(e.to_string()))
    }

    /// The role claim, when present and known.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.role.as_deref()?.parse().ok()
    }

    /// Whether `exp` is at or before `now_secs`. Tokens without `exp` never expire.
    #[must_use]
    pub fn is_expired_at(&self, now_secs: i64) -> bool {
        self.exp.is_some_and(|exp| exp <= now_secs)
    }
}

#[cfg(test)]
#[path = "claims_test.rs"]
mod tests;
