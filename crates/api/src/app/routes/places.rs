use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use hbnb_auth::IdentityResolver;
use hbnb_core::PlaceId;
use hbnb_infra::Facade;

use crate::app::errors::json_error;

pub async fn get_place(Extension(facade): Extension<Arc<Facade>>, Path(place_id): Path<String>) -> Response {
    let id: PlaceId = match place_id.parse() {
        Ok(v) => v,
        Err(_) => return json_error(StatusCode::BAD_REQUEST, "Invalid place id"),
    };

    match facade.get_place(&id) {
        Some(place) => (StatusCode::OK, Json(place)).into_response(),
        None => json_error(StatusCode::NOT_FOUND, "Place not found"),
    }
}
