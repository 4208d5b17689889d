use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::models::DetectionStatus;
use crate::services::transport::LinkMonitor;
use crate::services::StatusSynchronizer;

#[derive(Clone)]
pub struct StatusState {
    pub status: Arc<StatusSynchronizer>,
    pub subscriber: Arc<dyn LinkMonitor>,
    pub publisher: Arc<dyn LinkMonitor>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusBody {
    pub status: String,
    pub text: String,
    pub alert: bool,
}

impl From<&DetectionStatus> for StatusBody {
    fn from(status: &DetectionStatus) -> Self {
        Self {
            status: status.kind().to_string(),
            text: status.to_string(),
            alert: status.is_alert(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthBody {
    pub subscriber_connected: bool,
    pub publisher_connected: bool,
}

pub async fn get_status(State(state): State<StatusState>) -> Json<StatusBody> {
    Json(StatusBody::from(&state.status.read_status()))
}

pub async fn get_health(State(state): State<StatusState>) -> Json<HealthBody> {
    Json(HealthBody {
        subscriber_connected: state.subscriber.is_connected(),
        publisher_connected: state.publisher.is_connected(),
    })
}
