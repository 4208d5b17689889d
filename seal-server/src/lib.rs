use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use crate::app::{create_app, AppContext};
use crate::configs::Settings;
use crate::services::transport::{PublishSession, Role, SubscribeSession};
use crate::services::{CommandService, StatusSynchronizer};

pub mod app;
pub mod configs;
pub mod errors;
pub mod handles;
pub mod models;
pub mod services;

/// Opens both broker sessions and serves the dashboard until Ctrl-C.
pub async fn run(settings: &Arc<Settings>) -> anyhow::Result<()> {
    let status = Arc::new(StatusSynchronizer::new());

    let subscriber = Arc::new(SubscribeSession::start(
        settings.broker.connect_params(Role::Subscribe),
        settings.topics.motion.clone(),
        status.clone(),
    )?);
    let publisher = Arc::new(PublishSession::start(settings.broker.connect_params(Role::Publish))?);

    tracing::info!(
        "bridging {}:{} (tls: {})",
        settings.broker.host,
        settings.broker.port,
        settings.broker.tls_required()
    );

    let commands = Arc::new(CommandService::new(publisher.clone(), settings.topics.time_range.clone()));

    let app = create_app(&AppContext {
        status,
        commands,
        subscriber: subscriber.clone(),
        publisher: publisher.clone(),
        poll_interval_ms: settings.dashboard.poll_interval_ms,
    });

    let ip_addr = settings
        .server
        .host
        .parse::<IpAddr>()
        .with_context(|| format!("invalid server host {}", settings.server.host))?;

    let address = SocketAddr::from((ip_addr, settings.server.port));

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("cannot bind {address}"))?;

    tracing::info!("listening on {:?}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    subscriber.disconnect().await;
    publisher.disconnect().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }

    tracing::info!("shutting down");
}
