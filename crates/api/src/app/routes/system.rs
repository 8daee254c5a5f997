use axum::{Extension, Json, http::StatusCode, response::IntoResponse};

use hbnb_auth::Principal;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(Extension(principal): Extension<Principal>) -> impl IntoResponse {
    let claims = principal.claims();
    Json(serde_json::json!({
        "user_id": claims.sub.to_string(),
        "is_admin": claims.is_admin,
        "expires_at": claims.exp,
    }))
}
