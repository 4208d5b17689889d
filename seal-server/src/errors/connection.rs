use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionError {
    #[error("broker rejected the connection: {0}")]
    Rejected(String),

    #[error("TLS handshake failed: {0}")]
    Tls(String),

    #[error("broker unreachable: {0}")]
    Unreachable(String),

    #[error("no CONNACK within {0:?}")]
    Timeout(Duration),

    #[error("subscription failed: {0}")]
    Subscribe(String),
}

impl From<rumqttc::ConnectionError> for ConnectionError {
    fn from(error: rumqttc::ConnectionError) -> Self {
        match error {
            rumqttc::ConnectionError::ConnectionRefused(code) => ConnectionError::Rejected(format!("{code:?}")),
            rumqttc::ConnectionError::Tls(e) => ConnectionError::Tls(e.to_string()),
            e => ConnectionError::Unreachable(e.to_string()),
        }
    }
}
