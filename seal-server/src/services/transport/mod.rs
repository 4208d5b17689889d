mod backoff;
mod publish;
mod subscribe;

pub use backoff::*;
pub use publish::*;
pub use subscribe::*;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use rumqttc::tokio_rustls::rustls::{ClientConfig, RootCertStore};
use rumqttc::{ConnectReturnCode, Event, EventLoop, MqttOptions, Outgoing, Packet, TlsConfiguration, Transport};
use tokio::time;

use crate::errors::ConnectionError;

/// Request queue depth between an `AsyncClient` and its event loop.
pub(crate) const REQUEST_CAPACITY: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Subscribe,
    Publish,
}

impl Role {
    pub fn suffix(&self) -> &'static str {
        match self {
            Role::Subscribe => "sub",
            Role::Publish => "pub",
        }
    }
}

/// Everything needed to open one broker session.
#[derive(Debug, Clone)]
pub struct ConnectParams {
    pub client_id: String,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub tls: bool,
    pub connect_timeout: Duration,
    pub keep_alive: Duration,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl ConnectParams {
    pub fn mqtt_options(&self) -> Result<MqttOptions, ConnectionError> {
        let mut options = MqttOptions::new(&self.client_id, &self.host, self.port);
        options.set_keep_alive(self.keep_alive);
        options.set_clean_session(true);

        if !self.username.is_empty() {
            options.set_credentials(&self.username, &self.password);
        }

        if self.tls {
            options.set_transport(tls_transport()?);
        }

        Ok(options)
    }

    pub fn backoff(&self) -> Backoff {
        Backoff::new(self.initial_backoff, self.max_backoff)
    }
}

/// Receives every payload delivered on a subscribed topic.
pub trait MessageSink: Send + Sync {
    fn on_message(&self, payload: &[u8]);
}

/// Reports whether a session currently holds a live broker connection.
pub trait LinkMonitor: Send + Sync {
    fn is_connected(&self) -> bool;
}

#[derive(Debug, Default)]
pub(crate) struct LinkState {
    connected: AtomicBool,
    closing: AtomicBool,
}

impl LinkState {
    pub(crate) fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    pub(crate) fn set_connected(&self, connected: bool) -> bool {
        self.connected.swap(connected, Ordering::AcqRel)
    }

    pub(crate) fn close(&self) {
        self.closing.store(true, Ordering::Release);
        self.connected.store(false, Ordering::Release);
    }

    pub(crate) fn is_closing(&self) -> bool {
        self.closing.load(Ordering::Acquire)
    }
}

fn tls_transport() -> Result<Transport, ConnectionError> {
    let mut root_cert_store = RootCertStore::empty();
    let native_certs = rustls_native_certs::load_native_certs()
        .map_err(|e| ConnectionError::Tls(format!("cannot load platform root certificates: {e}")))?;
    root_cert_store.add_parsable_certificates(native_certs);

    let tls_config = ClientConfig::builder()
        .with_root_certificates(root_cert_store)
        .with_no_client_auth();

    Ok(Transport::Tls(TlsConfiguration::from(tls_config)))
}

/// Polls a fresh event loop until the broker answers CONNACK.
pub(crate) async fn await_connack(event_loop: &mut EventLoop, timeout: Duration) -> Result<(), ConnectionError> {
    time::timeout(timeout, handshake(event_loop))
        .await
        .map_err(|_| ConnectionError::Timeout(timeout))?
}

async fn handshake(event_loop: &mut EventLoop) -> Result<(), ConnectionError> {
    loop {
        if let Event::Incoming(Packet::ConnAck(ack)) = event_loop.poll().await? {
            return match ack.code {
                ConnectReturnCode::Success => Ok(()),
                code => Err(ConnectionError::Rejected(format!("{code:?}"))),
            };
        }
    }
}

/// Drives an event loop for the lifetime of a session.
///
/// `rumqttc` reconnects on the poll following an error; the loop only spaces
/// those attempts out with `backoff` and keeps `link` current. Every event,
/// including each CONNACK after a reconnect, is passed to `on_event`.
pub(crate) async fn drive_event_loop<F>(
    mut event_loop: EventLoop,
    link: Arc<LinkState>,
    mut backoff: Backoff,
    role: Role,
    mut on_event: F,
) where
    F: FnMut(Event) + Send,
{
    loop {
        match event_loop.poll().await {
            Ok(event) => {
                match &event {
                    Event::Incoming(Packet::ConnAck(_)) => {
                        if !link.set_connected(true) {
                            tracing::info!(
                                role = role.suffix(),
                                failure_streak = backoff.failure_streak(),
                                "broker session established"
                            );
                        }
                        backoff.reset();
                    }
                    Event::Outgoing(Outgoing::Disconnect) => {
                        link.close();
                        tracing::info!(role = role.suffix(), "broker session closed");
                        break;
                    }
                    _ => {}
                }

                on_event(event);
            }
            Err(e) => {
                link.set_connected(false);

                if link.is_closing() {
                    break;
                }

                let delay = backoff.next_delay();
                tracing::warn!(
                    role = role.suffix(),
                    error = %ConnectionError::from(e),
                    failure_streak = backoff.failure_streak(),
                    backoff_ms = delay.as_millis() as u64,
                    "broker connection lost, reconnecting"
                );
                time::sleep(delay).await;
            }
        }
    }
}

/// Sends DISCONNECT and gives the driver a moment to flush it.
pub(crate) async fn shutdown_driver(
    client: &rumqttc::AsyncClient,
    link: &LinkState,
    driver: Option<tokio::task::JoinHandle<()>>,
) {
    link.close();

    if let Err(e) = client.try_disconnect() {
        tracing::debug!("disconnect request not queued: {}", e);
    }

    if let Some(mut driver) = driver {
        if time::timeout(Duration::from_secs(1), &mut driver).await.is_err() {
            driver.abort();
        }
    }
}
