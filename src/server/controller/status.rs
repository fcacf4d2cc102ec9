use axum::{extract::State, response::IntoResponse, Json};

use crate::{
    model::{
        api::ErrorDto,
        stats::{StatusDto, UpdateStatusDto},
    },
    server::{error::AppError, scheduler::status_rotation, state::AppState},
};

pub static STATUS_TAG: &str = "status";

async fn current_status(state: &AppState) -> StatusDto {
    StatusDto {
        online: state.stats.is_online(),
        activity: state.presence.current().await,
        pinned: state.presence.pinned().await,
        uptime_secs: state.stats.uptime().as_secs(),
    }
}

/// Online flag and the activity text currently shown.
#[utoipa::path(
    get,
    path = "/api/status",
    tag = STATUS_TAG,
    responses(
        (status = 200, description = "Bot status", body = StatusDto),
        (status = 401, description = "Missing or invalid dashboard token", body = ErrorDto)
    ),
)]
pub async fn get_status(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(current_status(&state).await))
}

/// Pins an activity text, or unpins it when `activity` is missing or empty.
///
/// The new activity is pushed to the gateway immediately.
///
/// # Returns
/// - `200 OK` - Updated status
/// - `400 Bad Request` - Activity text too long
/// - `401 Unauthorized` - Missing or invalid dashboard token
#[utoipa::path(
    post,
    path = "/api/status",
    tag = STATUS_TAG,
    request_body = UpdateStatusDto,
    responses(
        (status = 200, description = "Updated status", body = StatusDto),
        (status = 400, description = "Activity text too long", body = ErrorDto),
        (status = 401, description = "Missing or invalid dashboard token", body = ErrorDto)
    ),
)]
pub async fn update_status(
    State(state): State<AppState>,
    Json(payload): Json<UpdateStatusDto>,
) -> Result<impl IntoResponse, AppError> {
    state.presence.pin(payload.activity).await?;
    status_rotation::refresh(&state).await;

    let pinned = state.presence.pinned().await;
    tracing::info!(pinned = ?pinned, "Status updated from dashboard");

    Ok(Json(current_status(&state).await))
}
