use std::sync::Arc;

use serenity::{
    all::{Client, GatewayIntents},
    http::Http,
};

use crate::server::{bot::handler::Handler, config::Config, error::AppError, state::AppState};

/// Gateway events the bot subscribes to.
pub fn intents() -> GatewayIntents {
    GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::GUILD_MESSAGE_REACTIONS
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILD_MODERATION
}

/// REST client for Discord calls made outside gateway events.
///
/// Built before the gateway client so the application state can exist first.
pub fn discord_http(config: &Config) -> Arc<Http> {
    Arc::new(Http::new(&config.discord_token))
}

/// Builds the gateway client and attaches its shard manager to the bot stats.
///
/// # Arguments
/// - `state` - Application state handed to the event handler
///
/// # Returns
/// - `Ok(Client)` - Client ready to be started with [`start_bot`]
/// - `Err(AppError)` - The token was rejected while building the client
pub async fn init_bot(state: AppState) -> Result<Client, AppError> {
    let token = state.config.discord_token.clone();
    let stats = state.stats.clone();

    let client = Client::builder(&token, intents())
        .event_handler(Handler::new(state))
        .await?;

    stats.attach_shard_manager(client.shard_manager.clone());

    Ok(client)
}

/// Runs the gateway connection until the shard manager shuts down.
///
/// Should be called from within a spawned task since it only returns once the
/// bot disconnects.
pub async fn start_bot(mut client: Client) -> Result<(), AppError> {
    tracing::info!("Starting Discord bot...");

    client.start_autosharded().await?;

    Ok(())
}
