use std::fmt;

use crate::errors::DecodeError;

/// Token the device sends when its sensor sees a person.
pub const MOTION_TOKEN: &str = "motion_detected";

/// Latest known detection state reported by the device.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DetectionStatus {
    #[default]
    Unknown,
    PersonDetected,
    NoPersonDetected,
    ParseError(String),
}

impl DetectionStatus {
    /// Classifies a raw payload received on the motion topic.
    pub fn from_payload(payload: &[u8]) -> Self {
        match Self::decode(payload) {
            Ok(status) => status,
            Err(e) => DetectionStatus::ParseError(e.to_string()),
        }
    }

    pub fn decode(payload: &[u8]) -> Result<Self, DecodeError> {
        let text = std::str::from_utf8(payload)?;

        if text.trim() == MOTION_TOKEN {
            Ok(DetectionStatus::PersonDetected)
        } else {
            Ok(DetectionStatus::NoPersonDetected)
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            DetectionStatus::Unknown => "unknown",
            DetectionStatus::PersonDetected => "person_detected",
            DetectionStatus::NoPersonDetected => "no_person_detected",
            DetectionStatus::ParseError(_) => "parse_error",
        }
    }

    pub fn is_alert(&self) -> bool {
        matches!(self, DetectionStatus::PersonDetected)
    }
}

impl fmt::Display for DetectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectionStatus::Unknown => write!(f, "Waiting for data..."),
            DetectionStatus::PersonDetected => write!(f, "ALERT! Person Detected!"),
            DetectionStatus::NoPersonDetected => write!(f, "No Person Detected"),
            DetectionStatus::ParseError(message) => write!(f, "Error parsing: {message}"),
        }
    }
}
