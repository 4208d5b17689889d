use std::time::Duration;

/// Caps the exponent so the multiplier stays well inside `u32`.
const MAX_EXPONENT: u32 = 16;

/// Exponential reconnect delay driven by a failure streak.
///
/// The n-th consecutive failure waits `initial * 2^(n-1)`, never more than
/// `max`. A successful CONNACK resets the streak.
#[derive(Debug, Clone)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    failure_streak: u32,
}

impl Backoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self {
            initial,
            max: max.max(initial),
            failure_streak: 0,
        }
    }

    pub fn next_delay(&mut self) -> Duration {
        let exponent = self.failure_streak.min(MAX_EXPONENT);
        self.failure_streak = self.failure_streak.saturating_add(1);

        self.initial.saturating_mul(2u32.pow(exponent)).min(self.max)
    }

    pub fn failure_streak(&self) -> u32 {
        self.failure_streak
    }

    pub fn reset(&mut self) {
        self.failure_streak = 0;
    }
}
