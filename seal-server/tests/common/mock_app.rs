use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;

use seal_server::app::{create_app, AppContext};
use seal_server::errors::PublishError;
use seal_server::services::transport::{LinkMonitor, MessageSink};
use seal_server::services::{CommandPublisher, CommandService, StatusSynchronizer};

pub const TIME_RANGE_TOPIC: &str = "esp32/time_range";

/// Stands in for the broker's publish session.
#[derive(Default)]
pub struct MockPublisher {
    pub connected: AtomicBool,
    pub sent: Mutex<Vec<(String, String)>>,
}

impl LinkMonitor for MockPublisher {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CommandPublisher for MockPublisher {
    async fn publish(&self, topic: &str, payload: String) -> Result<(), PublishError> {
        if !self.is_connected() {
            return Err(PublishError::NotConnected);
        }

        self.sent.lock().unwrap().push((topic.to_string(), payload));
        Ok(())
    }
}

/// Subscriber side that is always reported down; messages are injected
/// straight into the status cell instead.
pub struct OfflineLink;

impl LinkMonitor for OfflineLink {
    fn is_connected(&self) -> bool {
        false
    }
}

pub struct MockApp {
    pub router: Router,
    pub status: Arc<StatusSynchronizer>,
    pub publisher: Arc<MockPublisher>,
}

impl MockApp {
    pub fn new() -> Self {
        Self::with_publisher(true)
    }

    pub fn with_publisher(connected: bool) -> Self {
        let status = Arc::new(StatusSynchronizer::new());
        let publisher = Arc::new(MockPublisher {
            connected: AtomicBool::new(connected),
            ..Default::default()
        });
        let commands = Arc::new(CommandService::new(publisher.clone(), TIME_RANGE_TOPIC));

        let router = create_app(&AppContext {
            status: status.clone(),
            commands,
            subscriber: Arc::new(OfflineLink),
            publisher: publisher.clone(),
            poll_interval_ms: 2000,
        });

        Self {
            router,
            status,
            publisher,
        }
    }

    pub fn deliver(&self, payload: &[u8]) {
        self.status.on_message(payload);
    }

    #[allow(dead_code)]
    pub fn sent_payloads(&self) -> Vec<String> {
        self.publisher
            .sent
            .lock()
            .unwrap()
            .iter()
            .map(|(_, payload)| payload.clone())
            .collect()
    }
}
