//! The access policies.
//!
//! Every policy follows the same shape: verify the credential exactly once,
//! then (for the scoped policies) inspect claims and consult the resolver.
//! A policy either yields the authenticated [`Principal`] or an
//! [`AccessDenied`] refusal; the wrapped operation only runs on the former.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use hbnb_core::{PlaceId, ReviewId, UserId};

use crate::{CredentialVerifier, IdentityResolver, Principal, ResourceScope, ScopeParam, extract_bearer};

/// One of the three access rules a route can be protected by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Policy {
    /// Any verified caller.
    LoginRequired,
    /// Verified caller that is an administrator.
    AdminRequired,
    /// Verified caller that is an administrator or owns the scoped resource.
    OwnerOrAdminRequired,
}

impl Policy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Policy::LoginRequired => "login_required",
            Policy::AdminRequired => "admin_required",
            Policy::OwnerOrAdminRequired => "owner_or_admin_required",
        }
    }
}

impl core::fmt::Display for Policy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Standardized refusal. `Display` is the exact message returned to callers.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AccessDenied {
    /// Missing, malformed, forged or expired credential. The cause is never disclosed.
    #[error("Token required")]
    Unauthenticated,

    #[error("User not found")]
    UserNotFound,

    #[error("Administrator access required")]
    AdminRequired,

    #[error("Access denied. You must be the owner or an administrator")]
    NotOwner,
}

impl AccessDenied {
    /// HTTP status code for this refusal.
    pub fn status_code(&self) -> u16 {
        match self {
            AccessDenied::Unauthenticated => 401,
            AccessDenied::UserNotFound => 404,
            AccessDenied::AdminRequired | AccessDenied::NotOwner => 403,
        }
    }
}

/// A refusal plus the caller identity, once verification has established it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Denial {
    denied: AccessDenied,
    user_id: Option<UserId>,
}

impl Denial {
    fn anonymous(denied: AccessDenied) -> Self {
        Self { denied, user_id: None }
    }

    fn of(principal: &Principal, denied: AccessDenied) -> Self {
        Self {
            denied,
            user_id: Some(principal.user_id()),
        }
    }
}

/// What a policy sees of the incoming call.
#[derive(Debug, Clone)]
pub struct AccessRequest<'a> {
    authorization: Option<&'a str>,
    scope: ResourceScope,
    at: DateTime<Utc>,
}

impl<'a> AccessRequest<'a> {
    /// `authorization` is the raw `Authorization` header value, if any.
    pub fn new(authorization: Option<&'a str>) -> Self {
        Self {
            authorization,
            scope: ResourceScope::default(),
            at: Utc::now(),
        }
    }

    pub fn with_scope(mut self, scope: ResourceScope) -> Self {
        self.scope = scope;
        self
    }

    /// Evaluate token validity at `now` instead of the wall clock.
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.at = now;
        self
    }

    pub fn authorization(&self) -> Option<&'a str> {
        self.authorization
    }

    pub fn scope(&self) -> &ResourceScope {
        &self.scope
    }
}

/// Authorization guard: credential verification + record lookups + policies.
///
/// Holds no per-request state; share it behind an `Arc` or clone it.
#[derive(Clone)]
pub struct AccessGuard {
    verifier: Arc<dyn CredentialVerifier>,
    resolver: Arc<dyn IdentityResolver>,
}

impl AccessGuard {
    pub fn new(verifier: Arc<dyn CredentialVerifier>, resolver: Arc<dyn IdentityResolver>) -> Self {
        Self { verifier, resolver }
    }

    /// Run `policy` against `request`, logging the outcome.
    pub fn authorize(&self, policy: Policy, request: &AccessRequest<'_>) -> Result<Principal, AccessDenied> {
        let outcome = self.evaluate(policy, request);

        match &outcome {
            Ok(principal) => tracing::debug!(
                policy = policy.as_str(),
                user_id = %principal.user_id(),
                "access granted"
            ),
            Err(denial) => tracing::info!(
                policy = policy.as_str(),
                user_id = denial.user_id.map(tracing::field::display),
                status = denial.denied.status_code(),
                reason = %denial.denied,
                "access denied"
            ),
        }

        outcome.map_err(|denial| denial.denied)
    }

    /// Run `policy`; only when it allows, invoke `op` with the caller.
    pub fn guarded<T, F>(&self, policy: Policy, request: &AccessRequest<'_>, op: F) -> Result<T, AccessDenied>
    where
        F: FnOnce(Principal) -> T,
    {
        let principal = self.authorize(policy, request)?;
        Ok(op(principal))
    }

    /// Authenticated-only.
    pub fn login_required(&self, request: &AccessRequest<'_>) -> Result<Principal, AccessDenied> {
        self.verify(request).map_err(|denial| denial.denied)
    }

    /// Administrator-only.
    ///
    /// An `is_admin` claim is trusted as issued and is not re-checked against
    /// the resolver; only callers without the claim are looked up.
    pub fn admin_required(&self, request: &AccessRequest<'_>) -> Result<Principal, AccessDenied> {
        self.check_admin(request).map_err(|denial| denial.denied)
    }

    /// Administrator, or owner of the resource named by the request scope.
    pub fn owner_or_admin_required(&self, request: &AccessRequest<'_>) -> Result<Principal, AccessDenied> {
        self.check_owner_or_admin(request).map_err(|denial| denial.denied)
    }

    fn evaluate(&self, policy: Policy, request: &AccessRequest<'_>) -> Result<Principal, Denial> {
        match policy {
            Policy::LoginRequired => self.verify(request),
            Policy::AdminRequired => self.check_admin(request),
            Policy::OwnerOrAdminRequired => self.check_owner_or_admin(request),
        }
    }

    fn check_admin(&self, request: &AccessRequest<'_>) -> Result<Principal, Denial> {
        if request.authorization().is_none() {
            return Err(Denial::anonymous(AccessDenied::Unauthenticated));
        }

        let principal = self.verify(request)?;
        if principal.claims_admin() {
            return Ok(principal);
        }

        match self.resolver.get_user(&principal.user_id()) {
            Some(user) if user.is_admin => Ok(principal),
            _ => Err(Denial::of(&principal, AccessDenied::AdminRequired)),
        }
    }

    fn check_owner_or_admin(&self, request: &AccessRequest<'_>) -> Result<Principal, Denial> {
        let principal = self.verify(request)?;
        if principal.claims_admin() {
            return Ok(principal);
        }

        let Some(user) = self.resolver.get_user(&principal.user_id()) else {
            return Err(Denial::of(&principal, AccessDenied::UserNotFound));
        };
        if user.is_admin {
            return Ok(principal);
        }

        if self.owns_target(principal.user_id(), request.scope()) {
            Ok(principal)
        } else {
            Err(Denial::of(&principal, AccessDenied::NotOwner))
        }
    }

    fn verify(&self, request: &AccessRequest<'_>) -> Result<Principal, Denial> {
        let claims = extract_bearer(request.authorization())
            .and_then(|token| self.verifier.verify(token, request.at))
            .map_err(|cause| {
                tracing::debug!(%cause, "credential rejected");
                Denial::anonymous(AccessDenied::Unauthenticated)
            })?;

        Ok(Principal::new(claims))
    }

    // Only the first present parameter is consulted; an unparsable id counts as absent.
    fn owns_target(&self, identity: UserId, scope: &ResourceScope) -> bool {
        let Some(target) = scope.target() else {
            return false;
        };

        match target.param {
            ScopeParam::UserId => target
                .value
                .parse::<UserId>()
                .is_ok_and(|user_id| user_id == identity),
            ScopeParam::PlaceId => target
                .value
                .parse::<PlaceId>()
                .ok()
                .and_then(|place_id| self.resolver.get_place(&place_id))
                .is_some_and(|place| place.owner_id == identity),
            ScopeParam::ReviewId => target
                .value
                .parse::<ReviewId>()
                .ok()
                .and_then(|review_id| self.resolver.get_review(&review_id))
                .is_some_and(|review| review.user_id == identity),
        }
    }
}

impl core::fmt::Debug for AccessGuard {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AccessGuard").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::Duration;
    use hbnb_core::{Place, Review, User};
    use jsonwebtoken::{Algorithm, EncodingKey, Header};
    use proptest::prelude::*;

    use super::*;
    use crate::{AccessClaims, Hs256CredentialVerifier};

    const SECRET: &str = "test-secret";

    #[derive(Default)]
    struct CountingResolver {
        users: HashMap<UserId, User>,
        places: HashMap<PlaceId, Place>,
        reviews: HashMap<ReviewId, Review>,
        lookups: AtomicUsize,
    }

    impl CountingResolver {
        fn lookups(&self) -> usize {
            self.lookups.load(Ordering::SeqCst)
        }
    }

    impl IdentityResolver for CountingResolver {
        fn get_user(&self, id: &UserId) -> Option<User> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.users.get(id).cloned()
        }

        fn get_place(&self, id: &PlaceId) -> Option<Place> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.places.get(id).cloned()
        }

        fn get_review(&self, id: &ReviewId) -> Option<Review> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.reviews.get(id).cloned()
        }
    }

    struct Fixture {
        member: UserId,
        other: UserId,
        admin: UserId,
        owned_place: PlaceId,
        foreign_place: PlaceId,
        own_review: ReviewId,
        foreign_review: ReviewId,
    }

    fn fixture() -> (Fixture, Arc<CountingResolver>) {
        let member = UserId::new();
        let other = UserId::new();
        let admin = UserId::new();
        let owned_place = PlaceId::new();
        let foreign_place = PlaceId::new();
        let own_review = ReviewId::new();
        let foreign_review = ReviewId::new();

        let mut resolver = CountingResolver::default();
        for (id, email, is_admin) in [
            (member, "member@example.com", false),
            (other, "other@example.com", false),
            (admin, "admin@example.com", true),
        ] {
            let user = User::new(id, email, "Test", "User").unwrap().with_admin(is_admin);
            resolver.users.insert(id, user);
        }
        resolver.places.insert(owned_place, Place::new(owned_place, "Loft", member));
        resolver.places.insert(foreign_place, Place::new(foreign_place, "Cabin", other));
        resolver.reviews.insert(
            own_review,
            Review::new(own_review, foreign_place, member, "Lovely", 5).unwrap(),
        );
        resolver.reviews.insert(
            foreign_review,
            Review::new(foreign_review, owned_place, other, "Noisy", 2).unwrap(),
        );

        let fx = Fixture {
            member,
            other,
            admin,
            owned_place,
            foreign_place,
            own_review,
            foreign_review,
        };
        (fx, Arc::new(resolver))
    }

    fn guard(resolver: Arc<CountingResolver>) -> AccessGuard {
        AccessGuard::new(Arc::new(Hs256CredentialVerifier::new(SECRET)), resolver)
    }

    fn bearer(sub: UserId, is_admin: bool) -> String {
        let now = Utc::now();
        let claims = AccessClaims::new(sub, is_admin, now, now + Duration::minutes(10));
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        format!("Bearer {token}")
    }

    fn scoped(header: &str, param: ScopeParam, value: impl ToString) -> AccessRequest<'_> {
        AccessRequest::new(Some(header)).with_scope(ResourceScope::new().with(param, value.to_string()))
    }

    #[test]
    fn missing_credential_is_401_for_every_policy() {
        let (_, resolver) = fixture();
        let guard = guard(resolver.clone());
        let request = AccessRequest::new(None);

        for policy in [Policy::LoginRequired, Policy::AdminRequired, Policy::OwnerOrAdminRequired] {
            let denied = guard.authorize(policy, &request).unwrap_err();
            assert_eq!(denied, AccessDenied::Unauthenticated);
            assert_eq!(denied.status_code(), 401);
            assert_eq!(denied.to_string(), "Token required");
        }
        assert_eq!(resolver.lookups(), 0);
    }

    #[test]
    fn forged_or_expired_credential_is_indistinguishable() {
        let (fx, resolver) = fixture();
        let guard = guard(resolver);

        let expired_at = Utc::now() + Duration::hours(1);
        let valid = bearer(fx.member, false);
        let requests = [
            AccessRequest::new(Some("Bearer garbage")),
            AccessRequest::new(Some("Token abc")),
            AccessRequest::new(Some(valid.as_str())).at(expired_at),
        ];

        for request in &requests {
            assert_eq!(
                guard.authorize(Policy::LoginRequired, request),
                Err(AccessDenied::Unauthenticated)
            );
        }
    }

    #[test]
    fn login_required_allows_any_verified_caller() {
        let (fx, resolver) = fixture();
        let guard = guard(resolver.clone());
        let header = bearer(fx.member, false);

        let principal = guard
            .authorize(Policy::LoginRequired, &AccessRequest::new(Some(&header)))
            .unwrap();
        assert_eq!(principal.user_id(), fx.member);
        assert_eq!(resolver.lookups(), 0);
    }

    #[test]
    fn admin_claim_short_circuits_without_lookup() {
        let (_, resolver) = fixture();
        let guard = guard(resolver.clone());
        // Identity unknown to the resolver: the claim alone is enough.
        let header = bearer(UserId::new(), true);

        let request = scoped(&header, ScopeParam::PlaceId, PlaceId::new());
        assert!(guard.authorize(Policy::AdminRequired, &request).is_ok());
        assert!(guard.authorize(Policy::OwnerOrAdminRequired, &request).is_ok());
        assert_eq!(resolver.lookups(), 0);
    }

    #[test]
    fn admin_required_falls_back_to_resolved_user() {
        let (fx, resolver) = fixture();
        let guard = guard(resolver);

        let admin = bearer(fx.admin, false);
        assert!(guard.admin_required(&AccessRequest::new(Some(&admin))).is_ok());

        let member = bearer(fx.member, false);
        assert_eq!(
            guard.admin_required(&AccessRequest::new(Some(&member))),
            Err(AccessDenied::AdminRequired)
        );

        let ghost = bearer(UserId::new(), false);
        let denied = guard.admin_required(&AccessRequest::new(Some(&ghost))).unwrap_err();
        assert_eq!(denied, AccessDenied::AdminRequired);
        assert_eq!(denied.status_code(), 403);
    }

    #[test]
    fn owner_or_admin_unknown_user_is_404() {
        let (fx, resolver) = fixture();
        let guard = guard(resolver);
        let ghost = bearer(UserId::new(), false);

        let denied = guard
            .owner_or_admin_required(&scoped(&ghost, ScopeParam::UserId, fx.member))
            .unwrap_err();
        assert_eq!(denied, AccessDenied::UserNotFound);
        assert_eq!(denied.status_code(), 404);
        assert_eq!(denied.to_string(), "User not found");
    }

    #[test]
    fn owner_or_admin_resolved_admin_is_allowed_anywhere() {
        let (fx, resolver) = fixture();
        let guard = guard(resolver);
        let admin = bearer(fx.admin, false);

        assert!(
            guard
                .owner_or_admin_required(&scoped(&admin, ScopeParam::UserId, fx.other))
                .is_ok()
        );
        assert!(guard.owner_or_admin_required(&AccessRequest::new(Some(&admin))).is_ok());
    }

    #[test]
    fn self_access_by_user_id() {
        let (fx, resolver) = fixture();
        let guard = guard(resolver);
        let member = bearer(fx.member, false);

        assert!(
            guard
                .owner_or_admin_required(&scoped(&member, ScopeParam::UserId, fx.member))
                .is_ok()
        );
        assert_eq!(
            guard.owner_or_admin_required(&scoped(&member, ScopeParam::UserId, fx.other)),
            Err(AccessDenied::NotOwner)
        );
    }

    #[test]
    fn place_ownership() {
        let (fx, resolver) = fixture();
        let guard = guard(resolver);
        let member = bearer(fx.member, false);

        assert!(
            guard
                .owner_or_admin_required(&scoped(&member, ScopeParam::PlaceId, fx.owned_place))
                .is_ok()
        );
        assert_eq!(
            guard.owner_or_admin_required(&scoped(&member, ScopeParam::PlaceId, fx.foreign_place)),
            Err(AccessDenied::NotOwner)
        );
        assert_eq!(
            guard.owner_or_admin_required(&scoped(&member, ScopeParam::PlaceId, PlaceId::new())),
            Err(AccessDenied::NotOwner)
        );
        assert_eq!(
            guard.owner_or_admin_required(&scoped(&member, ScopeParam::PlaceId, "not-a-uuid")),
            Err(AccessDenied::NotOwner)
        );
    }

    #[test]
    fn review_authorship() {
        let (fx, resolver) = fixture();
        let guard = guard(resolver);
        let member = bearer(fx.member, false);

        assert!(
            guard
                .owner_or_admin_required(&scoped(&member, ScopeParam::ReviewId, fx.own_review))
                .is_ok()
        );
        assert_eq!(
            guard.owner_or_admin_required(&scoped(&member, ScopeParam::ReviewId, fx.foreign_review)),
            Err(AccessDenied::NotOwner)
        );
        assert_eq!(
            guard.owner_or_admin_required(&scoped(&member, ScopeParam::ReviewId, ReviewId::new())),
            Err(AccessDenied::NotOwner)
        );
    }

    #[test]
    fn unscoped_call_is_denied_for_non_admin() {
        let (fx, resolver) = fixture();
        let guard = guard(resolver);
        let member = bearer(fx.member, false);

        let denied = guard
            .owner_or_admin_required(&AccessRequest::new(Some(&member)))
            .unwrap_err();
        assert_eq!(denied, AccessDenied::NotOwner);
        assert_eq!(
            denied.to_string(),
            "Access denied. You must be the owner or an administrator"
        );
    }

    #[test]
    fn user_id_is_evaluated_before_owned_place() {
        let (fx, resolver) = fixture();
        let guard = guard(resolver);
        let member = bearer(fx.member, false);

        let scope = ResourceScope::new()
            .with(ScopeParam::PlaceId, fx.owned_place.to_string())
            .with(ScopeParam::UserId, fx.other.to_string());
        let request = AccessRequest::new(Some(&member)).with_scope(scope);

        assert_eq!(
            guard.owner_or_admin_required(&request),
            Err(AccessDenied::NotOwner)
        );
    }

    #[test]
    fn guarded_only_runs_operation_when_allowed() {
        let (fx, resolver) = fixture();
        let guard = guard(resolver);
        let member = bearer(fx.member, false);
        let calls = AtomicUsize::new(0);

        let allowed = guard.guarded(Policy::LoginRequired, &AccessRequest::new(Some(&member)), |p| {
            calls.fetch_add(1, Ordering::SeqCst);
            p.user_id()
        });
        assert_eq!(allowed, Ok(fx.member));

        let denied = guard.guarded(Policy::AdminRequired, &AccessRequest::new(Some(&member)), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(denied, Err(AccessDenied::AdminRequired));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn denials_after_verification_carry_the_caller() {
        let (fx, resolver) = fixture();
        let guard = guard(resolver);
        let member = bearer(fx.member, false);
        let ghost_id = UserId::new();
        let ghost = bearer(ghost_id, false);

        let denial = guard
            .evaluate(Policy::AdminRequired, &AccessRequest::new(Some(&member)))
            .unwrap_err();
        assert_eq!(denial, Denial { denied: AccessDenied::AdminRequired, user_id: Some(fx.member) });

        let denial = guard
            .evaluate(Policy::OwnerOrAdminRequired, &scoped(&member, ScopeParam::UserId, fx.other))
            .unwrap_err();
        assert_eq!(denial, Denial { denied: AccessDenied::NotOwner, user_id: Some(fx.member) });

        let denial = guard
            .evaluate(Policy::OwnerOrAdminRequired, &AccessRequest::new(Some(&ghost)))
            .unwrap_err();
        assert_eq!(denial, Denial { denied: AccessDenied::UserNotFound, user_id: Some(ghost_id) });

        let denial = guard
            .evaluate(Policy::LoginRequired, &AccessRequest::new(Some("Bearer garbage")))
            .unwrap_err();
        assert_eq!(denial, Denial::anonymous(AccessDenied::Unauthenticated));
    }

    fn scope_strategy() -> impl Strategy<Value = Vec<(ScopeParam, u8)>> {
        let param = prop_oneof![
            Just(ScopeParam::UserId),
            Just(ScopeParam::PlaceId),
            Just(ScopeParam::ReviewId),
        ];
        prop::collection::vec((param, 0u8..4), 0..4)
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// The decision only ever depends on the highest-precedence parameter,
        /// and repeating a request yields the same decision.
        #[test]
        fn decision_follows_first_parameter_and_is_repeatable(entries in scope_strategy()) {
            let (fx, resolver) = fixture();
            let guard = guard(resolver);
            let member = bearer(fx.member, false);

            // Pick a concrete value per (param, choice): owned, foreign, missing, garbage.
            let value_for = |param: ScopeParam, choice: u8| -> String {
                match (param, choice) {
                    (ScopeParam::UserId, 0) => fx.member.to_string(),
                    (ScopeParam::UserId, 1) => fx.other.to_string(),
                    (ScopeParam::UserId, 2) => UserId::new().to_string(),
                    (ScopeParam::PlaceId, 0) => fx.owned_place.to_string(),
                    (ScopeParam::PlaceId, 1) => fx.foreign_place.to_string(),
                    (ScopeParam::PlaceId, 2) => PlaceId::new().to_string(),
                    (ScopeParam::ReviewId, 0) => fx.own_review.to_string(),
                    (ScopeParam::ReviewId, 1) => fx.foreign_review.to_string(),
                    (ScopeParam::ReviewId, 2) => ReviewId::new().to_string(),
                    _ => "garbage".to_string(),
                }
            };

            let mut scope = ResourceScope::new();
            for (param, choice) in &entries {
                scope = scope.with(*param, value_for(*param, *choice));
            }

            let expected_allowed = scope
                .target()
                .map(|t| {
                    let owned = match t.param {
                        ScopeParam::UserId => fx.member.to_string(),
                        ScopeParam::PlaceId => fx.owned_place.to_string(),
                        ScopeParam::ReviewId => fx.own_review.to_string(),
                    };
                    t.value == owned
                })
                .unwrap_or(false);

            let request = AccessRequest::new(Some(&member)).with_scope(scope);
            let first = guard.owner_or_admin_required(&request).map(|p| p.user_id());
            let second = guard.owner_or_admin_required(&request).map(|p| p.user_id());

            prop_assert_eq!(first, second);
            prop_assert_eq!(first.is_ok(), expected_allowed);
            if !expected_allowed {
                prop_assert_eq!(first, Err(AccessDenied::NotOwner));
            }
        }
    }
}
