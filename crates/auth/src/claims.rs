use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use hbnb_core::UserId;

/// Access token claims model (transport-agnostic).
///
/// This is the set of claims the guard reads once a token has been decoded and
/// its signature checked. Anything else the issuer embedded is kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject / identity of the caller.
    pub sub: UserId,

    /// Administrator flag as of issuance time. Absent means `false`.
    #[serde(default)]
    pub is_admin: bool,

    /// Issued-at, unix seconds.
    pub iat: i64,

    /// Expiration, unix seconds.
    pub exp: i64,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AccessClaims {
    pub fn new(sub: UserId, is_admin: bool, issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            sub,
            is_admin,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            extra: Map::new(),
        }
    }
}

/// Why a presented credential was not accepted.
///
/// These causes are for logs only; every variant surfaces to callers as the
/// same refusal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("credential missing")]
    Missing,

    #[error("authorization scheme is not Bearer")]
    InvalidScheme,

    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (iat is in the future)")]
    NotYetValid,

    #[error("invalid token time window (exp <= iat)")]
    InvalidTimeWindow,
}

/// Deterministically validate the claims time window.
///
/// Note: this validates the *claims* only. Signature verification / decoding is
/// done by the [`CredentialVerifier`](crate::CredentialVerifier) in use.
pub fn validate_claims(claims: &AccessClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    let now = now.timestamp();
    if claims.exp <= claims.iat {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.iat {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.exp {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}
