use axum::{middleware, routing::get, Json, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::{
    model::{
        api::{ErrorDto, HealthDto},
        command::CommandDto,
        settings::{
            AutomodDto, BotSettingsDto, GuildSettingsDto, LoggingTogglesDto,
            UpdateBotSettingsDto, UpdateGuildSettingsDto,
        },
        stats::{GuildSummaryDto, PushEventDto, StatsDto, StatusDto, UpdateStatusDto},
    },
    server::{
        controller::{
            command::{self, get_commands},
            health::{self, health},
            settings::{
                self, get_bot_settings, get_server_settings, update_bot_settings,
                update_server_settings,
            },
            stats::{self, get_guilds, get_stats},
            status::{self, get_status, update_status},
            ws::stats_socket,
        },
        middleware::auth::require_dashboard_token,
        state::AppState,
    },
};

#[derive(OpenApi)]
#[openapi(
    info(title = "Warden dashboard API"),
    paths(
        stats::get_stats,
        stats::get_guilds,
        command::get_commands,
        status::get_status,
        status::update_status,
        settings::get_server_settings,
        settings::update_server_settings,
        settings::get_bot_settings,
        settings::update_bot_settings,
        health::health,
    ),
    components(schemas(
        ErrorDto,
        HealthDto,
        StatsDto,
        PushEventDto,
        GuildSummaryDto,
        StatusDto,
        UpdateStatusDto,
        CommandDto,
        GuildSettingsDto,
        LoggingTogglesDto,
        AutomodDto,
        UpdateGuildSettingsDto,
        BotSettingsDto,
        UpdateBotSettingsDto,
    ))
)]
pub struct ApiDoc;

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Builds the dashboard router. Every route requires the dashboard token.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/stats", get(get_stats))
        .route("/api/guilds", get(get_guilds))
        .route("/api/commands", get(get_commands))
        .route("/api/status", get(get_status).post(update_status))
        .route(
            "/api/server-settings/{guild_id}",
            get(get_server_settings).post(update_server_settings),
        )
        .route("/api/settings", get(get_bot_settings).post(update_bot_settings))
        .route("/api/health", get(health))
        .route("/api/openapi.json", get(openapi))
        .route("/api/ws", get(stats_socket))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_dashboard_token,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
