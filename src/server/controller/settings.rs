use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};

use crate::{
    model::{
        api::ErrorDto,
        settings::{
            BotSettingsDto, GuildSettingsDto, UpdateBotSettingsDto, UpdateGuildSettingsDto,
        },
    },
    server::{
        error::AppError, model::guild_settings::UpdateGuildSettingsParam,
        service::guild_settings::GuildSettingsService, state::AppState,
    },
};

pub static SETTINGS_TAG: &str = "settings";

/// Settings for one guild, created with defaults on first read.
///
/// # Arguments
/// - `state` - Application state containing the database connection
/// - `guild_id` - Discord guild ID
///
/// # Returns
/// - `200 OK` - The guild's settings
/// - `401 Unauthorized` - Missing or invalid dashboard token
/// - `500 Internal Server Error` - Database error
#[utoipa::path(
    get,
    path = "/api/server-settings/{guild_id}",
    tag = SETTINGS_TAG,
    params(
        ("guild_id" = u64, Path, description = "Discord guild ID")
    ),
    responses(
        (status = 200, description = "Guild settings", body = GuildSettingsDto),
        (status = 401, description = "Missing or invalid dashboard token", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_server_settings(
    State(state): State<AppState>,
    Path(guild_id): Path<u64>,
) -> Result<impl IntoResponse, AppError> {
    let settings = GuildSettingsService::new(&state.db, &state.config.default_prefix)
        .get_or_create(guild_id)
        .await?;

    Ok(Json(settings.into_dto()))
}

/// Applies a partial update to one guild's settings.
///
/// Absent fields are left unchanged; an explicit `null` clears a nullable field.
///
/// # Returns
/// - `200 OK` - The updated settings
/// - `400 Bad Request` - Invalid prefix or malformed id
/// - `401 Unauthorized` - Missing or invalid dashboard token
/// - `500 Internal Server Error` - Database error
#[utoipa::path(
    post,
    path = "/api/server-settings/{guild_id}",
    tag = SETTINGS_TAG,
    params(
        ("guild_id" = u64, Path, description = "Discord guild ID")
    ),
    request_body = UpdateGuildSettingsDto,
    responses(
        (status = 200, description = "Updated guild settings", body = GuildSettingsDto),
        (status = 400, description = "Invalid settings", body = ErrorDto),
        (status = 401, description = "Missing or invalid dashboard token", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_server_settings(
    State(state): State<AppState>,
    Path(guild_id): Path<u64>,
    Json(payload): Json<UpdateGuildSettingsDto>,
) -> Result<impl IntoResponse, AppError> {
    let param = UpdateGuildSettingsParam::from_dto(payload)?;

    let settings = GuildSettingsService::new(&state.db, &state.config.default_prefix)
        .update(guild_id, param)
        .await?;

    tracing::info!(guild_id, "Guild settings updated from dashboard");

    Ok(Json(settings.into_dto()))
}

/// Runtime bot settings.
#[utoipa::path(
    get,
    path = "/api/settings",
    tag = SETTINGS_TAG,
    responses(
        (status = 200, description = "Bot settings", body = BotSettingsDto),
        (status = 401, description = "Missing or invalid dashboard token", body = ErrorDto)
    ),
)]
pub async fn get_bot_settings(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.presence.settings().await))
}

/// Updates status rotation messages, the rotation interval or the embed color.
///
/// Nothing is applied when any field is invalid.
#[utoipa::path(
    post,
    path = "/api/settings",
    tag = SETTINGS_TAG,
    request_body = UpdateBotSettingsDto,
    responses(
        (status = 200, description = "Updated bot settings", body = BotSettingsDto),
        (status = 400, description = "Invalid settings", body = ErrorDto),
        (status = 401, description = "Missing or invalid dashboard token", body = ErrorDto)
    ),
)]
pub async fn update_bot_settings(
    State(state): State<AppState>,
    Json(payload): Json<UpdateBotSettingsDto>,
) -> Result<impl IntoResponse, AppError> {
    let settings = state.presence.update_settings(payload).await?;

    tracing::info!("Bot settings updated from dashboard");

    Ok(Json(settings))
}
