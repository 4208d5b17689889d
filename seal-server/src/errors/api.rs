use super::CommandError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Command error: {0}")]
    CommandError(#[from] CommandError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}
