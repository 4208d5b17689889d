#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("payload is not valid text: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}
