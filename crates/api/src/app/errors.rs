use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use hbnb_auth::AccessDenied;

/// A policy refusal rendered as `{"error": <message>}` with its status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Refusal(pub AccessDenied);

impl IntoResponse for Refusal {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::FORBIDDEN);
        json_error(status, self.0.to_string())
    }
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": message.into(),
        })),
    )
        .into_response()
}
