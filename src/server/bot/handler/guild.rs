//! Guild availability events keep the dashboard's guild list current.

use serenity::all::{Guild, UnavailableGuild};

use crate::server::{service::stats::GuildSnapshot, state::AppState};

pub async fn handle_guild_create(state: &AppState, guild: Guild) {
    tracing::debug!(
        "Guild create event: {} ({}) - member_count: {}",
        guild.name,
        guild.id,
        guild.member_count
    );

    state
        .stats
        .upsert_guild(GuildSnapshot {
            id: guild.id.get(),
            icon_url: guild.icon_url(),
            name: guild.name,
            member_count: guild.member_count,
            channel_count: guild.channels.len() as u64,
        })
        .await;
}

/// An outage only makes the guild unavailable; the bot is still a member then.
pub async fn handle_guild_delete(state: &AppState, incomplete: UnavailableGuild) {
    if incomplete.unavailable {
        tracing::warn!("Guild {} became unavailable", incomplete.id);
        return;
    }

    tracing::info!("Removed from guild {}", incomplete.id);
    state.stats.remove_guild(incomplete.id.get()).await;
}
