use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use hbnb_auth::IdentityResolver;
use hbnb_core::ReviewId;
use hbnb_infra::Facade;

use crate::app::errors::json_error;

pub async fn get_review(Extension(facade): Extension<Arc<Facade>>, Path(review_id): Path<String>) -> Response {
    let id: ReviewId = match review_id.parse() {
        Ok(v) => v,
        Err(_) => return json_error(StatusCode::BAD_REQUEST, "Invalid review id"),
    };

    match facade.get_review(&id) {
        Some(review) => (StatusCode::OK, Json(review)).into_response(),
        None => json_error(StatusCode::NOT_FOUND, "Review not found"),
    }
}
