//! HTTP API application wiring (Axum router + guard wiring).
//!
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `errors.rs`: consistent `{"error": ...}` responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use hbnb_auth::{AccessGuard, Hs256CredentialVerifier};
use hbnb_infra::Facade;

use crate::config::ApiConfig;

pub mod errors;
pub mod routes;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &ApiConfig, facade: Arc<Facade>) -> Router {
    let verifier = Arc::new(Hs256CredentialVerifier::new(config.jwt_secret.as_bytes()));
    let guard = Arc::new(AccessGuard::new(verifier, facade.clone()));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router(guard))
        .layer(ServiceBuilder::new().layer(Extension(facade)))
}
