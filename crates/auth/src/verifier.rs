//! Credential verification: bearer extraction and token decoding.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};

use crate::{AccessClaims, TokenValidationError, validate_claims};

/// Verifies a presented bearer token and yields its claims.
///
/// Implementations must check integrity (signature) and the time window; the
/// guard trusts whatever comes back.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<AccessClaims, TokenValidationError>;
}

/// HMAC-SHA256 signed JWT verifier.
pub struct Hs256CredentialVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl Hs256CredentialVerifier {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // The time window is checked by `validate_claims` against the caller's clock.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Self {
            key: DecodingKey::from_secret(secret.as_ref()),
            validation,
        }
    }
}

impl core::fmt::Debug for Hs256CredentialVerifier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hs256CredentialVerifier").finish_non_exhaustive()
    }
}

impl CredentialVerifier for Hs256CredentialVerifier {
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<AccessClaims, TokenValidationError> {
        let data = jsonwebtoken::decode::<AccessClaims>(token, &self.key, &self.validation)
            .map_err(|e| TokenValidationError::Malformed(e.to_string()))?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

/// Pull the token out of an `Authorization` header value.
pub fn extract_bearer(header: Option<&str>) -> Result<&str, TokenValidationError> {
    let header = header.ok_or(TokenValidationError::Missing)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(TokenValidationError::InvalidScheme)?
        .trim();

    if token.is_empty() {
        return Err(TokenValidationError::Missing);
    }

    Ok(token)
}
