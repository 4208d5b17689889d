use axum::http::StatusCode;

use super::PublishError;

/// Failure of a single operator submission; `Display` is the text shown to
/// the operator.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Please select valid times.")]
    MissingHour,

    #[error("Failed to send: {0}")]
    Publish(#[from] PublishError),
}

impl CommandError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CommandError::MissingHour => StatusCode::BAD_REQUEST,
            CommandError::Publish(PublishError::NotConnected) => StatusCode::SERVICE_UNAVAILABLE,
            CommandError::Publish(PublishError::Send(_)) => StatusCode::BAD_GATEWAY,
        }
    }
}
