//! Member join/leave: member counts, welcome messages and join/leave logging.

use serenity::all::{Context, GuildId, Member, User};

use crate::server::{
    bot::log_channel,
    discord::{
        connector::OutgoingMessage,
        embed::{neutral_embed, primary_embed, success_embed},
    },
    model::guild_settings::LogEvent,
    service::guild_settings::GuildSettingsService,
    state::AppState,
};

const DEFAULT_WELCOME: &str = "Welcome to {server}, {user}!";

/// Handles the guild_member_addition event when a member joins a guild
pub async fn handle_guild_member_addition(state: &AppState, ctx: Context, new_member: Member) {
    let guild_id = new_member.guild_id.get();
    let user = &new_member.user;
    state.stats.adjust_members(guild_id, 1).await;

    let settings = match GuildSettingsService::new(&state.db, &state.config.default_prefix)
        .get_or_create(guild_id)
        .await
    {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!(guild_id, "Failed to load settings for member join: {}", e);
            return;
        }
    };

    if let Some(channel_id) = settings.welcome_channel_id {
        let server = ctx
            .cache
            .guild(new_member.guild_id)
            .map(|g| g.name.clone())
            .unwrap_or_else(|| "the server".to_string());
        let text = welcome_text(
            settings.welcome_message.as_deref().unwrap_or(DEFAULT_WELCOME),
            user.id.get(),
            &server,
        );
        let message = OutgoingMessage::new().embed(
            primary_embed()
                .description(text)
                .thumbnail(user.face()),
        );
        if let Err(e) = state.discord.send_message(channel_id, message).await {
            tracing::warn!(guild_id, channel_id, "Failed to send welcome message: {}", e);
        }
    }

    let embed = success_embed()
        .title("Member Joined")
        .description(format!("<@{}> ({})", user.id, user.tag()))
        .field(
            "Account created",
            format!("<t:{}:R>", user.id.created_at().unix_timestamp()),
            true,
        )
        .thumbnail(user.face());
    log_channel::post_with(state, &settings, LogEvent::MemberJoin, embed).await;
}

/// Handles the guild_member_removal event when a member leaves a guild
pub async fn handle_guild_member_removal(state: &AppState, guild_id: GuildId, user: User) {
    state.stats.adjust_members(guild_id.get(), -1).await;

    let embed = neutral_embed()
        .title("Member Left")
        .description(format!("<@{}> ({})", user.id, user.tag()))
        .thumbnail(user.face());
    log_channel::post(state, guild_id.get(), LogEvent::MemberLeave, embed).await;
}

/// Fills `{user}` with a mention and `{server}` with the guild name.
pub fn welcome_text(template: &str, user_id: u64, server: &str) -> String {
    template
        .replace("{user}", &format!("<@{}>", user_id))
        .replace("{server}", server)
}
