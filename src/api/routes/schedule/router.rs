//! Router for the schedule-meeting API

use axum::{
    Json, Router,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    routing::post,
};

use super::public::ScheduleResponse;
use crate::api::public::ApiError;
use crate::api::routes::SharedState;

/// Schedule a meeting and confirm it in the originating channel
async fn schedule_meeting(
    State(state): State<SharedState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ScheduleResponse>, ApiError> {
    tracing::info!("Schedule meeting called");
    let body = body?;
    let config = state.settings.get();
    let scheduled = state.scheduler().schedule(&body, &config).await?;
    if scheduled.post_id.is_none() {
        tracing::warn!(room_url = %scheduled.room_url, "Meeting scheduled without a confirmation post");
    }
    Ok(Json(ScheduleResponse::success(&scheduled.room_url)))
}

async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed("POST")
}

/// Create the schedule-meeting router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", post(schedule_meeting).fallback(method_not_allowed))
}
