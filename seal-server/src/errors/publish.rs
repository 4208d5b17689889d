#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PublishError {
    #[error("not connected to broker")]
    NotConnected,

    #[error("send failed: {0}")]
    Send(String),
}

impl From<rumqttc::ClientError> for PublishError {
    fn from(error: rumqttc::ClientError) -> Self {
        PublishError::Send(error.to_string())
    }
}
