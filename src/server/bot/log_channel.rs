//! Mirrors guild events into the configured log channel.

use serenity::all::CreateEmbed;

use crate::server::{
    discord::connector::OutgoingMessage,
    model::guild_settings::{GuildSettings, LogEvent},
    service::guild_settings::GuildSettingsService,
    state::AppState,
};

/// Posts `embed` to the guild's log channel when `event` logging is on.
///
/// Failures are logged and swallowed.
pub async fn post(state: &AppState, guild_id: u64, event: LogEvent, embed: CreateEmbed) {
    let service = GuildSettingsService::new(&state.db, &state.config.default_prefix);

    match service.get_or_create(guild_id).await {
        Ok(settings) => post_with(state, &settings, event, embed).await,
        Err(e) => tracing::warn!(guild_id, "Failed to load settings for log event: {}", e),
    }
}

/// Same as [`post`] with settings the caller already loaded.
pub async fn post_with(
    state: &AppState,
    settings: &GuildSettings,
    event: LogEvent,
    embed: CreateEmbed,
) {
    if !settings.logs(event) {
        return;
    }
    let Some(channel_id) = settings.log_channel_id else {
        return;
    };

    if let Err(e) = state
        .discord
        .send_message(channel_id, OutgoingMessage::new().embed(embed))
        .await
    {
        tracing::warn!(
            guild_id = settings.guild_id,
            channel_id,
            "Failed to post to log channel: {}",
            e
        );
    }
}
