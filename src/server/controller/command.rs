use axum::{extract::State, response::IntoResponse, Json};

use crate::{
    model::{api::ErrorDto, command::CommandDto},
    server::{error::AppError, state::AppState},
};

pub static COMMAND_TAG: &str = "command";

/// Registered commands grouped by category.
#[utoipa::path(
    get,
    path = "/api/commands",
    tag = COMMAND_TAG,
    responses(
        (status = 200, description = "Every registered command", body = Vec<CommandDto>),
        (status = 401, description = "Missing or invalid dashboard token", body = ErrorDto)
    ),
)]
pub async fn get_commands(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.registry.command_dtos()))
}
