use std::sync::Arc;

use axum::{Router, middleware::from_fn_with_state, routing::get};

use hbnb_auth::{AccessGuard, Policy};

use crate::middleware::{PolicyState, enforce_policy};

pub mod places;
pub mod reviews;
pub mod system;
pub mod users;

/// Router for all protected endpoints, grouped by the policy guarding them.
pub fn router(guard: Arc<AccessGuard>) -> Router {
    let authenticated = Router::new()
        .route("/whoami", get(system::whoami))
        .route_layer(from_fn_with_state(
            PolicyState::new(guard.clone(), Policy::LoginRequired),
            enforce_policy,
        ));

    let admin_only = Router::new()
        .route("/users", get(users::list_users))
        .route_layer(from_fn_with_state(
            PolicyState::new(guard.clone(), Policy::AdminRequired),
            enforce_policy,
        ));

    let owner_or_admin = Router::new()
        .route("/users/:user_id", get(users::get_user))
        .route("/places/:place_id", get(places::get_place))
        .route("/reviews/:review_id", get(reviews::get_review))
        .route_layer(from_fn_with_state(
            PolicyState::new(guard, Policy::OwnerOrAdminRequired),
            enforce_policy,
        ));

    authenticated.merge(admin_only).merge(owner_or_admin)
}
