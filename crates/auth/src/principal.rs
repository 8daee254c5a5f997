use hbnb_core::UserId;

use crate::AccessClaims;

/// An authenticated caller: verified identity plus the claims it was issued.
#[derive(Debug, Clone, PartialEq)]
pub struct Principal {
    claims: AccessClaims,
}

impl Principal {
    pub fn new(claims: AccessClaims) -> Self {
        Self { claims }
    }

    pub fn user_id(&self) -> UserId {
        self.claims.sub
    }

    /// Admin flag as asserted by the credential (may be stale).
    pub fn claims_admin(&self) -> bool {
        self.claims.is_admin
    }

    pub fn claims(&self) -> &AccessClaims {
        &self.claims
    }
}
