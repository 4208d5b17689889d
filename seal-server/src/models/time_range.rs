use std::fmt;
use std::str::FromStr;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Daily active window as minute-of-day offsets.
///
/// Totals are plain `hour * 60 + minute` arithmetic with no normalisation, so
/// a window with `start > end` wraps past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start_minutes: u32,
    pub end_minutes: u32,
}

impl TimeRange {
    pub fn new(start_hour: u8, start_minute: u8, end_hour: u8, end_minute: u8) -> Self {
        Self {
            start_minutes: minutes(start_hour, start_minute),
            end_minutes: minutes(end_hour, end_minute),
        }
    }

    /// Wire form sent on the command topic, e.g. `"480 720"`.
    pub fn payload(&self) -> String {
        format!("{} {}", self.start_minutes, self.end_minutes)
    }

    pub fn contains(&self, minute_of_day: u32) -> bool {
        if self.start_minutes <= self.end_minutes {
            (self.start_minutes..self.end_minutes).contains(&minute_of_day)
        } else {
            minute_of_day >= self.start_minutes || minute_of_day < self.end_minutes
        }
    }
}

/// Cannot overflow: the largest input gives `255 * 60 + 255`.
fn minutes(hour: u8, minute: u8) -> u32 {
    u32::from(hour) * 60 + u32::from(minute)
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02} - {:02}:{:02}",
            self.start_minutes / 60,
            self.start_minutes % 60,
            self.end_minutes / 60,
            self.end_minutes % 60
        )
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("expected \"<start> <end>\" minute totals, got {0:?}")]
pub struct ParseTimeRangeError(pub String);

impl FromStr for TimeRange {
    type Err = ParseTimeRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseTimeRangeError(s.to_string());

        let (start, end) = s.split_once(' ').ok_or_else(invalid)?;
        let start_minutes = start.parse::<u32>().map_err(|_| invalid())?;
        let end_minutes = end.parse::<u32>().map_err(|_| invalid())?;

        Ok(Self { start_minutes, end_minutes })
    }
}
