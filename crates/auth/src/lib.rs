//! `hbnb-auth` — request authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: credentials
//! are verified through [`CredentialVerifier`], records are looked up through
//! [`IdentityResolver`], and [`AccessGuard`] combines both into the three
//! access policies.

pub mod claims;
pub mod guard;
pub mod principal;
pub mod resolver;
pub mod scope;
pub mod verifier;

pub use claims::{AccessClaims, TokenValidationError, validate_claims};
pub use guard::{AccessDenied, AccessGuard, AccessRequest, Policy};
pub use principal::Principal;
pub use resolver::IdentityResolver;
pub use scope::{ResourceScope, SCOPE_PRECEDENCE, ScopeParam, ScopeTarget};
pub use verifier::{CredentialVerifier, Hs256CredentialVerifier, extract_bearer};
