use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    model::api::{ErrorDto, HealthDto},
    server::state::AppState,
};

pub static HEALTH_TAG: &str = "health";

/// Service health and database reachability.
///
/// # Returns
/// - `200 OK` - Database answered
/// - `503 Service Unavailable` - Database ping failed
#[utoipa::path(
    get,
    path = "/api/health",
    tag = HEALTH_TAG,
    responses(
        (status = 200, description = "Healthy", body = HealthDto),
        (status = 401, description = "Missing or invalid dashboard token", body = ErrorDto),
        (status = 503, description = "Database unreachable", body = HealthDto)
    ),
)]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let database = match state.db.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Health check database ping failed: {}", e);
            false
        }
    };

    let status = if database {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthDto {
            status: if database { "ok" } else { "degraded" }.to_string(),
            database,
            uptime_secs: state.stats.uptime().as_secs(),
        }),
    )
}
