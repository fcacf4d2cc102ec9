use axum::{extract::State, response::IntoResponse, Json};

use crate::{
    model::{
        api::ErrorDto,
        stats::{GuildSummaryDto, StatsDto},
    },
    server::{error::AppError, state::AppState},
};

pub static STATS_TAG: &str = "stats";

/// Live bot statistics.
///
/// # Returns
/// - `200 OK` - Guild, member and channel totals, commands run, uptime, memory and latency
/// - `401 Unauthorized` - Missing or invalid dashboard token
#[utoipa::path(
    get,
    path = "/api/stats",
    tag = STATS_TAG,
    responses(
        (status = 200, description = "Current statistics", body = StatsDto),
        (status = 401, description = "Missing or invalid dashboard token", body = ErrorDto)
    ),
)]
pub async fn get_stats(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.stats.snapshot().await))
}

/// Guilds the bot is in, sorted by name.
#[utoipa::path(
    get,
    path = "/api/guilds",
    tag = STATS_TAG,
    responses(
        (status = 200, description = "Guild summaries", body = Vec<GuildSummaryDto>),
        (status = 401, description = "Missing or invalid dashboard token", body = ErrorDto)
    ),
)]
pub async fn get_guilds(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.stats.guild_summaries().await))
}
