use std::sync::{Arc, Mutex};

use rumqttc::{AsyncClient, Event, Packet, QoS, SubscribeReasonCode};
use tokio::task::JoinHandle;

use super::{
    await_connack, drive_event_loop, shutdown_driver, ConnectParams, LinkMonitor, LinkState, MessageSink, Role,
    REQUEST_CAPACITY,
};
use crate::errors::ConnectionError;

/// Inbound broker session bound to a single topic.
///
/// The receive loop runs on its own task and hands each payload to the sink
/// as it arrives. After every reconnect the subscription is issued again
/// before further deliveries.
pub struct SubscribeSession {
    client: AsyncClient,
    topic: String,
    link: Arc<LinkState>,
    driver: Mutex<Option<JoinHandle<()>>>,
}

impl SubscribeSession {
    pub async fn connect(
        params: ConnectParams,
        topic: impl Into<String>,
        sink: Arc<dyn MessageSink>,
    ) -> Result<Self, ConnectionError> {
        let topic = topic.into();
        let (client, mut event_loop) = AsyncClient::new(params.mqtt_options()?, REQUEST_CAPACITY);
        await_connack(&mut event_loop, params.connect_timeout).await?;

        client
            .subscribe(topic.as_str(), QoS::AtLeastOnce)
            .await
            .map_err(|e| ConnectionError::Subscribe(e.to_string()))?;

        tracing::info!("subscribe session connected to {}:{}, topic {}", params.host, params.port, topic);

        let link = Arc::new(LinkState::default());
        link.set_connected(true);

        Ok(Self::spawn(client, event_loop, topic, link, &params, sink))
    }

    /// Starts the session without waiting for the broker. The first
    /// subscription goes out on the first CONNACK, however long that takes.
    pub fn start(
        params: ConnectParams,
        topic: impl Into<String>,
        sink: Arc<dyn MessageSink>,
    ) -> Result<Self, ConnectionError> {
        let (client, event_loop) = AsyncClient::new(params.mqtt_options()?, REQUEST_CAPACITY);
        let link = Arc::new(LinkState::default());

        Ok(Self::spawn(client, event_loop, topic.into(), link, &params, sink))
    }

    fn spawn(
        client: AsyncClient,
        event_loop: rumqttc::EventLoop,
        topic: String,
        link: Arc<LinkState>,
        params: &ConnectParams,
        sink: Arc<dyn MessageSink>,
    ) -> Self {
        let resubscriber = client.clone();
        let filter = topic.clone();

        let driver = tokio::spawn(drive_event_loop(
            event_loop,
            Arc::clone(&link),
            params.backoff(),
            Role::Subscribe,
            move |event| match event {
                Event::Incoming(Packet::ConnAck(_)) => {
                    match resubscriber.try_subscribe(filter.as_str(), QoS::AtLeastOnce) {
                        Ok(()) => tracing::debug!("subscribe topic {}", filter),
                        Err(e) => tracing::error!("Error subscribing to {}: {}", filter, e),
                    }
                }
                Event::Incoming(Packet::SubAck(ack)) => {
                    if ack.return_codes.iter().any(|code| matches!(code, SubscribeReasonCode::Failure)) {
                        tracing::error!("broker refused subscription to {}", filter);
                    }
                }
                Event::Incoming(Packet::Publish(publish)) => {
                    tracing::debug!("Receive on {}: {} bytes", publish.topic, publish.payload.len());
                    sink.on_message(&publish.payload);
                }
                _ => {}
            },
        ));

        Self {
            client,
            topic,
            link,
            driver: Mutex::new(Some(driver)),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub async fn disconnect(&self) {
        let driver = self.driver.lock().unwrap_or_else(|e| e.into_inner()).take();
        shutdown_driver(&self.client, &self.link, driver).await;
    }
}

impl LinkMonitor for SubscribeSession {
    fn is_connected(&self) -> bool {
        self.link.is_connected()
    }
}

impl Drop for SubscribeSession {
    fn drop(&mut self) {
        if let Some(driver) = self.driver.get_mut().unwrap_or_else(|e| e.into_inner()).take() {
            driver.abort();
        }
    }
}
