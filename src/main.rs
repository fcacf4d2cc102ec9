mod model;
mod server;

use std::sync::Arc;

use crate::server::{
    bot::{
        self,
        command::{builtin_commands, registry::CommandRegistry},
    },
    config::Config,
    discord::rest::SerenityConnector,
    error::AppError,
    logging, router, scheduler,
    service::poll::store::InMemoryPollStore,
    startup,
    state::AppState,
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    logging::init(config.log_webhook_url.clone());

    if let Err(e) = run(config).await {
        tracing::error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<(), AppError> {
    let db = startup::connect_to_database(&config).await?;
    let registry = CommandRegistry::new(builtin_commands())?;
    let discord = Arc::new(SerenityConnector::new(bot::start::discord_http(&config)));

    let state = AppState::new(
        db,
        config,
        discord,
        Arc::new(InMemoryPollStore::new()),
        registry,
    );

    tracing::info!("Starting warden with {} commands", state.registry.len());

    let client = bot::start::init_bot(state.clone()).await?;
    let shard_manager = client.shard_manager.clone();
    let bot_task = tokio::spawn(async move {
        if let Err(e) = bot::start::start_bot(client).await {
            tracing::error!("Discord bot error: {}", e);
        }
    });

    let mut scheduler = scheduler::start_scheduler(state.clone()).await?;

    let listener = tokio::net::TcpListener::bind(state.config.dashboard_addr).await?;
    tracing::info!("Dashboard listening on {}", state.config.dashboard_addr);

    axum::serve(listener, router::router(state.clone()))
        .with_graceful_shutdown(startup::shutdown_signal(state.shutdown.clone()))
        .await?;

    tracing::info!("Shutting down");

    state.stats.set_online(false);
    shard_manager.shutdown_all().await;
    if let Err(e) = scheduler.shutdown().await {
        tracing::warn!("Failed to stop scheduler: {}", e);
    }
    if let Err(e) = bot_task.await {
        tracing::warn!("Bot task ended abnormally: {}", e);
    }
    if let Err(e) = state.db.clone().close().await {
        tracing::warn!("Failed to close database connection: {}", e);
    }

    Ok(())
}
