//! Ready event handler.
//!
//! Fires once per shard after the gateway handshake. The first one pushes the
//! slash command schemas and marks the bot online.

use std::sync::atomic::{AtomicBool, Ordering};

use serenity::all::{Context, Ready};

use crate::server::{scheduler::status_rotation, state::AppState};

pub async fn handle_ready(state: &AppState, registered: &AtomicBool, ctx: Context, ready: Ready) {
    tracing::info!(
        shard = ?ready.shard.map(|s| s.id.0),
        guilds = ready.guilds.len(),
        "{} is connected to Discord",
        ready.user.name
    );
    state.stats.set_online(true);

    if !registered.swap(true, Ordering::SeqCst) {
        match state
            .registry
            .register(&ctx.http, state.config.dev_guild_id)
            .await
        {
            Ok(count) => match state.config.dev_guild_id {
                Some(guild_id) => {
                    tracing::info!(guild_id, "Registered {} slash commands to dev guild", count)
                }
                None => tracing::info!("Registered {} global slash commands", count),
            },
            Err(e) => {
                registered.store(false, Ordering::SeqCst);
                tracing::error!("Failed to register slash commands: {}", e);
            }
        }
    }

    status_rotation::refresh(state).await;
}
