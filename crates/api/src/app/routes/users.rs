use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use hbnb_auth::IdentityResolver;
use hbnb_core::{User, UserId};
use hbnb_infra::Facade;

use crate::app::errors::json_error;

pub async fn list_users(Extension(facade): Extension<Arc<Facade>>) -> Json<Vec<User>> {
    Json(facade.list_users())
}

pub async fn get_user(Extension(facade): Extension<Arc<Facade>>, Path(user_id): Path<String>) -> Response {
    let id: UserId = match user_id.parse() {
        Ok(v) => v,
        Err(_) => return json_error(StatusCode::BAD_REQUEST, "Invalid user id"),
    };

    match facade.get_user(&id) {
        Some(user) => (StatusCode::OK, Json(user)).into_response(),
        None => json_error(StatusCode::NOT_FOUND, "User not found"),
    }
}
