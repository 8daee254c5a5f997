//! Access-policy middleware.
//!
//! Each protected route group is layered with [`enforce_policy`] and a
//! [`PolicyState`] naming the policy. The middleware runs the policy before the
//! handler; on success the verified [`Principal`] is placed in the request
//! extensions and the handler runs unchanged, otherwise the refusal is returned.

use std::sync::Arc;

use axum::{
    extract::{Query, RawPathParams, Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};

use hbnb_auth::{AccessGuard, AccessRequest, Policy, Principal, ResourceScope};

use crate::app::errors::Refusal;

#[derive(Clone)]
pub struct PolicyState {
    pub guard: Arc<AccessGuard>,
    pub policy: Policy,
}

impl PolicyState {
    pub fn new(guard: Arc<AccessGuard>, policy: Policy) -> Self {
        Self { guard, policy }
    }
}

pub async fn enforce_policy(
    State(state): State<PolicyState>,
    path_params: Option<RawPathParams>,
    mut req: Request,
    next: Next,
) -> Response {
    let decision = {
        // Path parameters are fed first so they shadow same-named query parameters.
        let query = Query::<Vec<(String, String)>>::try_from_uri(req.uri())
            .map(|Query(pairs)| pairs)
            .unwrap_or_default();
        let scope = ResourceScope::from_params(
            path_params
                .iter()
                .flat_map(|params| params.iter())
                .chain(query.iter().map(|(k, v)| (k.as_str(), v.as_str()))),
        );

        // A non-ASCII header still counts as present; it just fails verification.
        let authorization = req
            .headers()
            .get(header::AUTHORIZATION)
            .map(|value| value.to_str().unwrap_or_default());

        let request = AccessRequest::new(authorization).with_scope(scope);
        state.guard.authorize(state.policy, &request)
    };

    match decision {
        Ok(principal) => {
            req.extensions_mut().insert::<Principal>(principal);
            next.run(req).await
        }
        Err(denied) => Refusal(denied).into_response(),
    }
}
