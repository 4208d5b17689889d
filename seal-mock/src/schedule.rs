use std::sync::RwLock;

use chrono::{Timelike, Utc};

use seal_server::models::{TimeRange, MOTION_TOKEN};
use seal_server::services::transport::MessageSink;

pub const CLEAR_TOKEN: &str = "clear";

/// Active window most recently received on the command topic.
#[derive(Debug, Default)]
pub struct Schedule {
    active: RwLock<Option<TimeRange>>,
}

impl Schedule {
    pub fn active(&self) -> Option<TimeRange> {
        *self.active.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Payload to report at `minute_of_day`. Motion is only ever reported
    /// inside the window; with no window yet the sensor is always armed.
    pub fn report(&self, minute_of_day: u32, motion: bool) -> &'static str {
        let armed = self.active().map_or(true, |range| range.contains(minute_of_day));

        if armed && motion { MOTION_TOKEN } else { CLEAR_TOKEN }
    }
}

impl MessageSink for Schedule {
    fn on_message(&self, payload: &[u8]) {
        let parsed = std::str::from_utf8(payload)
            .map_err(|e| e.to_string())
            .and_then(|text| text.trim().parse::<TimeRange>().map_err(|e| e.to_string()));

        match parsed {
            Ok(range) => {
                tracing::info!("Receive schedule {} ({})", range.payload(), range);
                *self.active.write().unwrap_or_else(|e| e.into_inner()) = Some(range);
            }
            Err(e) => tracing::warn!("Ignoring schedule payload: {}", e),
        }
    }
}

pub fn current_minute_of_day() -> u32 {
    Utc::now().num_seconds_from_midnight() / 60
}
