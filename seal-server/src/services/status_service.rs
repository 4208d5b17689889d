use std::sync::RwLock;

use crate::models::DetectionStatus;
use crate::services::transport::MessageSink;

/// Single-slot holder for the latest detection status.
///
/// Writers replace the whole value under the write lock, readers clone it
/// under the read lock, so a reader only ever sees a value some writer
/// stored. The lock is never held across I/O.
#[derive(Debug, Default)]
pub struct StatusSynchronizer {
    latest: RwLock<DetectionStatus>,
}

impl StatusSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read_status(&self) -> DetectionStatus {
        self.latest.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn replace(&self, status: DetectionStatus) -> DetectionStatus {
        let mut latest = self.latest.write().unwrap_or_else(|e| e.into_inner());
        std::mem::replace(&mut *latest, status)
    }
}

impl MessageSink for StatusSynchronizer {
    fn on_message(&self, payload: &[u8]) {
        let status = DetectionStatus::from_payload(payload);

        if let DetectionStatus::ParseError(cause) = &status {
            tracing::warn!("Failed to decode motion payload: {}", cause);
        }

        let previous = self.replace(status.clone());
        if previous != status {
            tracing::info!(status = status.kind(), "detection status changed");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn test_starts_unknown() {
        assert_eq!(StatusSynchronizer::new().read_status(), DetectionStatus::Unknown);
    }

    #[test]
    fn test_latest_message_wins() {
        let status = StatusSynchronizer::new();

        status.on_message(b"motion_detected");
        assert_eq!(status.read_status(), DetectionStatus::PersonDetected);

        status.on_message(b"clear");
        assert_eq!(status.read_status(), DetectionStatus::NoPersonDetected);

        status.on_message(&[0xc3, 0x28]);
        assert!(matches!(status.read_status(), DetectionStatus::ParseError(_)));
    }

    #[test]
    fn test_repeated_reads_are_stable() {
        let status = StatusSynchronizer::new();
        status.on_message(b" motion_detected\n");

        let first = status.read_status();
        for _ in 0..10 {
            assert_eq!(status.read_status(), first);
        }
    }

    #[test]
    fn test_concurrent_readers_never_see_torn_values() {
        let status = Arc::new(StatusSynchronizer::new());
        let payloads: [&[u8]; 3] = [b"motion_detected", b"clear", &[0xff]];
        let parse_error = DetectionStatus::from_payload(&[0xff]);

        let writers: Vec<_> = (0..4)
            .map(|i| {
                let status = Arc::clone(&status);
                thread::spawn(move || {
                    for n in 0..500 {
                        status.on_message(payloads[(i + n) % payloads.len()]);
                    }
                })
            })
            .collect();

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let status = Arc::clone(&status);
                let parse_error = parse_error.clone();
                thread::spawn(move || {
                    for _ in 0..500 {
                        let observed = status.read_status();
                        assert!(
                            observed == DetectionStatus::Unknown
                                || observed == DetectionStatus::PersonDetected
                                || observed == DetectionStatus::NoPersonDetected
                                || observed == parse_error,
                            "unexpected status {observed:?}"
                        );
                    }
                })
            })
            .collect();

        for handle in writers.into_iter().chain(readers) {
            handle.join().unwrap();
        }

        assert_ne!(status.read_status(), DetectionStatus::Unknown);
    }
}
