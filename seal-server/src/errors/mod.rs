pub mod api;
pub mod command;
pub mod connection;
pub mod decode;
pub mod publish;

pub use api::ApiError;
pub use command::CommandError;
pub use connection::ConnectionError;
pub use decode::DecodeError;
pub use publish::PublishError;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::CommandError(e) => (e.status_code(), e.to_string()),
            ApiError::InvalidRequest(message) => (StatusCode::BAD_REQUEST, message),
        };

        if status.is_server_error() {
            tracing::warn!("Request failed with {}: {}", status, error_message);
        }

        let body = Json(json!({
            "error": {
                "code": status.as_u16(),
                "message": error_message
            }
        }));

        (status, body).into_response()
    }
}
