use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handles::*;
use crate::services::transport::LinkMonitor;
use crate::services::{CommandService, StatusSynchronizer};

/// Shared handles the HTTP surface needs.
#[derive(Clone)]
pub struct AppContext {
    pub status: Arc<StatusSynchronizer>,
    pub commands: Arc<CommandService>,
    pub subscriber: Arc<dyn LinkMonitor>,
    pub publisher: Arc<dyn LinkMonitor>,
    pub poll_interval_ms: u64,
}

pub fn create_app(context: &AppContext) -> Router {
    let api = Router::new()
        .route("/status", get(get_status))
        .route("/health", get(get_health))
        .with_state(StatusState {
            status: Arc::clone(&context.status),
            subscriber: Arc::clone(&context.subscriber),
            publisher: Arc::clone(&context.publisher),
        })
        .merge(
            Router::new()
                .route("/time-range", post(set_time_range))
                .with_state(CommandState {
                    commands: Arc::clone(&context.commands),
                }),
        );

    Router::new()
        .route("/", get(index))
        .with_state(PageState {
            poll_interval_ms: context.poll_interval_ms,
        })
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
