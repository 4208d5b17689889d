use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::ApiError;
use crate::services::CommandService;

#[derive(Clone)]
pub struct CommandState {
    pub commands: Arc<CommandService>,
}

/// Operator form submission; any field may be left unselected. Values
/// outside `0..=255` are rejected while the body is decoded.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TimeRangeBody {
    pub start_hour: Option<u8>,
    pub start_minute: Option<u8>,
    pub end_hour: Option<u8>,
    pub end_minute: Option<u8>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub message: String,
}

pub async fn set_time_range(
    State(state): State<CommandState>,
    body: Result<Json<TimeRangeBody>, JsonRejection>,
) -> Result<Json<CommandResponse>, ApiError> {
    let Json(body) = body.map_err(|rejection| ApiError::InvalidRequest(rejection.body_text()))?;

    let message = state
        .commands
        .submit(body.start_hour, body.start_minute, body.end_hour, body.end_minute)
        .await?;

    Ok(Json(CommandResponse { message }))
}
