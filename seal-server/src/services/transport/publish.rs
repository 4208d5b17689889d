use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rumqttc::{AsyncClient, QoS};
use tokio::task::JoinHandle;

use super::{
    await_connack, drive_event_loop, shutdown_driver, ConnectParams, LinkMonitor, LinkState, Role, REQUEST_CAPACITY,
};
use crate::errors::{ConnectionError, PublishError};
use crate::services::CommandPublisher;

/// Outbound broker session. The background driver answers keep-alive pings
/// whether or not anything is being published.
pub struct PublishSession {
    client: AsyncClient,
    link: Arc<LinkState>,
    driver: Mutex<Option<JoinHandle<()>>>,
}

impl PublishSession {
    /// Connects once, failing if the broker does not accept the session
    /// within `params.connect_timeout`.
    pub async fn connect(params: ConnectParams) -> Result<Self, ConnectionError> {
        let (client, mut event_loop) = AsyncClient::new(params.mqtt_options()?, REQUEST_CAPACITY);
        await_connack(&mut event_loop, params.connect_timeout).await?;

        tracing::info!("publish session connected to {}:{}", params.host, params.port);

        let link = Arc::new(LinkState::default());
        link.set_connected(true);

        let driver = tokio::spawn(drive_event_loop(
            event_loop,
            Arc::clone(&link),
            params.backoff(),
            Role::Publish,
            |_| {},
        ));

        Ok(Self {
            client,
            link,
            driver: Mutex::new(Some(driver)),
        })
    }

    /// Starts the session without waiting for the broker; failed attempts
    /// are retried in the background and `publish` reports `NotConnected`
    /// until one succeeds.
    pub fn start(params: ConnectParams) -> Result<Self, ConnectionError> {
        let (client, event_loop) = AsyncClient::new(params.mqtt_options()?, REQUEST_CAPACITY);
        let link = Arc::new(LinkState::default());

        let driver = tokio::spawn(drive_event_loop(
            event_loop,
            Arc::clone(&link),
            params.backoff(),
            Role::Publish,
            |_| {},
        ));

        Ok(Self {
            client,
            link,
            driver: Mutex::new(Some(driver)),
        })
    }

    /// Queues one QoS 1 message. Never waits on the network: a full request
    /// queue is reported as a send failure.
    pub fn publish(&self, topic: &str, payload: impl Into<Vec<u8>>) -> Result<(), PublishError> {
        if !self.link.is_connected() {
            return Err(PublishError::NotConnected);
        }

        self.client.try_publish(topic, QoS::AtLeastOnce, false, payload)?;

        Ok(())
    }

    pub async fn disconnect(&self) {
        let driver = self.driver.lock().unwrap_or_else(|e| e.into_inner()).take();
        shutdown_driver(&self.client, &self.link, driver).await;
    }
}

impl LinkMonitor for PublishSession {
    fn is_connected(&self) -> bool {
        self.link.is_connected()
    }
}

#[async_trait]
impl CommandPublisher for PublishSession {
    async fn publish(&self, topic: &str, payload: String) -> Result<(), PublishError> {
        PublishSession::publish(self, topic, payload)
    }
}

impl Drop for PublishSession {
    fn drop(&mut self) {
        if let Some(driver) = self.driver.get_mut().unwrap_or_else(|e| e.into_inner()).take() {
            driver.abort();
        }
    }
}
