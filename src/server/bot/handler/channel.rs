use serenity::all::GuildChannel;

use crate::server::state::AppState;

pub async fn handle_channel_create(state: &AppState, channel: GuildChannel) {
    state.stats.adjust_channels(channel.guild_id.get(), 1).await;
}

pub async fn handle_channel_delete(state: &AppState, channel: GuildChannel) {
    state.stats.adjust_channels(channel.guild_id.get(), -1).await;
}
