use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::{CommandError, PublishError};
use crate::models::TimeRange;
use crate::services::transport::LinkMonitor;

/// Outbound side the encoder delivers through.
#[async_trait]
pub trait CommandPublisher: LinkMonitor {
    async fn publish(&self, topic: &str, payload: String) -> Result<(), PublishError>;
}

pub struct CommandService {
    publisher: Arc<dyn CommandPublisher>,
    topic: String,
}

impl CommandService {
    pub fn new(publisher: Arc<dyn CommandPublisher>, topic: impl Into<String>) -> Self {
        Self {
            publisher,
            topic: topic.into(),
        }
    }

    /// Encodes the operator's range and makes one delivery attempt.
    ///
    /// Only the hours are required. Missing minutes count as zero, and
    /// nothing beyond that is validated.
    pub async fn submit(
        &self,
        start_hour: Option<u8>,
        start_minute: Option<u8>,
        end_hour: Option<u8>,
        end_minute: Option<u8>,
    ) -> Result<String, CommandError> {
        let (Some(start_hour), Some(end_hour)) = (start_hour, end_hour) else {
            return Err(CommandError::MissingHour);
        };
        let start_minute = start_minute.unwrap_or(0);
        let end_minute = end_minute.unwrap_or(0);

        let range = TimeRange::new(start_hour, start_minute, end_hour, end_minute);
        let payload = range.payload();

        if let Err(e) = self.publisher.publish(&self.topic, payload.clone()).await {
            tracing::error!("Failed to publish time range {}: {}", payload, e);
            return Err(e.into());
        }

        tracing::info!("Published time range {} to {}", payload, self.topic);

        Ok(format!(
            "Time Updated: {start_hour:02}:{start_minute:02} - {end_hour:02}:{end_minute:02}"
        ))
    }
}
