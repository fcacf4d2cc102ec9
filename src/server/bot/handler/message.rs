//! Message events: auto-moderation, prefix commands and edit/delete logging.

use serenity::all::{
    ChannelId, Context, CreateMessage, GuildId, Message, MessageId, MessageUpdateEvent,
    Permissions, RoleId, UserId,
};

use crate::server::{
    bot::{command::dispatch, log_channel},
    discord::embed::{moderation_embed, neutral_embed, truncate, warning_embed},
    model::guild_settings::{GuildSettings, LogEvent},
    service::{
        automod::{check_message, MessageFacts, Violation},
        guild_settings::GuildSettingsService,
    },
    state::AppState,
};

/// Handle message creation in a channel
pub async fn handle_message(state: &AppState, ctx: Context, message: Message) {
    if message.author.bot {
        return;
    }

    let Some(guild_id) = message.guild_id else {
        dispatch::handle_prefix(state, &ctx, &message, None).await;
        return;
    };

    let settings = match GuildSettingsService::new(&state.db, &state.config.default_prefix)
        .get_or_create(guild_id.get())
        .await
    {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!(guild_id = guild_id.get(), "Failed to load guild settings: {}", e);
            return;
        }
    };

    if settings.automod.enabled {
        if let Some(violation) = check_automod(&ctx, &settings, guild_id, &message) {
            enforce(state, &ctx, &settings, &message, violation).await;
            return;
        }
    }

    if settings.is_channel_disabled(message.channel_id.get()) {
        return;
    }

    dispatch::handle_prefix(state, &ctx, &message, Some(&settings)).await;
}

fn check_automod(
    ctx: &Context,
    settings: &GuildSettings,
    guild_id: GuildId,
    message: &Message,
) -> Option<Violation> {
    let role_ids: Vec<u64> = message
        .member
        .as_ref()
        .map(|m| m.roles.iter().map(|r| r.get()).collect())
        .unwrap_or_default();

    let permissions = role_permissions(ctx, guild_id, message.author.id, &role_ids);
    let is_moderator = permissions.administrator()
        || permissions.manage_messages()
        || role_ids.iter().any(|id| settings.mod_role_ids.contains(id));

    check_message(
        &settings.automod,
        &MessageFacts {
            content: &message.content,
            mention_count: message.mentions.len() + message.mention_roles.len(),
            author_role_ids: &role_ids,
            author_is_moderator: is_moderator,
        },
    )
}

/// Guild-level permissions from the cached role list.
fn role_permissions(ctx: &Context, guild_id: GuildId, user_id: UserId, role_ids: &[u64]) -> Permissions {
    let Some(guild) = ctx.cache.guild(guild_id) else {
        return Permissions::empty();
    };
    if guild.owner_id == user_id {
        return Permissions::all();
    }

    let everyone = RoleId::new(guild_id.get());
    std::iter::once(everyone)
        .chain(role_ids.iter().map(|id| RoleId::new(*id)))
        .filter_map(|id| guild.roles.get(&id))
        .fold(Permissions::empty(), |acc, role| acc | role.permissions)
}

/// Deletes the offending message, warns the author in-channel and logs it.
async fn enforce(
    state: &AppState,
    ctx: &Context,
    settings: &GuildSettings,
    message: &Message,
    violation: Violation,
) {
    let reason = violation.reason();
    tracing::info!(
        guild_id = settings.guild_id,
        user_id = message.author.id.get(),
        ?violation,
        "Auto-moderation removed a message"
    );

    if let Err(e) = message.delete(&ctx).await {
        tracing::warn!("Failed to delete flagged message: {}", e);
    }

    let notice = CreateMessage::new()
        .content(format!("<@{}>", message.author.id))
        .embed(warning_embed().description(reason.clone()));
    if let Err(e) = message.channel_id.send_message(&ctx.http, notice).await {
        tracing::warn!("Failed to send auto-moderation notice: {}", e);
    }

    let embed = moderation_embed()
        .title("Auto-moderation")
        .field("User", format!("<@{}>", message.author.id), true)
        .field("Channel", format!("<#{}>", message.channel_id), true)
        .field("Reason", reason, false)
        .field("Message", truncate(&message.content, 1024), false);
    log_channel::post_with(state, settings, LogEvent::Moderation, embed).await;
}

/// Handle message deletion. Content is only known when the message was cached.
pub async fn handle_message_delete(
    state: &AppState,
    ctx: Context,
    channel_id: ChannelId,
    message_id: MessageId,
    guild_id: Option<GuildId>,
) {
    let Some(guild_id) = guild_id else {
        return;
    };

    let cached = ctx
        .cache
        .message(channel_id, message_id)
        .map(|m| (m.author.id, m.author.bot, m.content.clone()));
    if matches!(cached, Some((_, true, _))) {
        return;
    }

    let mut embed = neutral_embed()
        .title("Message Deleted")
        .field("Channel", format!("<#{}>", channel_id), true);
    match cached {
        Some((author, _, content)) => {
            embed = embed
                .field("Author", format!("<@{}>", author), true)
                .field("Content", non_empty(truncate(&content, 1024)), false);
        }
        None => {
            embed = embed.field("Message", format!("`{}` (not cached)", message_id), true);
        }
    }

    log_channel::post(state, guild_id.get(), LogEvent::MessageDelete, embed).await;
}

/// Handle message edits. Embed-only updates carry no content change and are skipped.
pub async fn handle_message_update(
    state: &AppState,
    old: Option<Message>,
    event: MessageUpdateEvent,
) {
    let (Some(guild_id), Some(new_content)) = (event.guild_id, event.content.as_ref()) else {
        return;
    };
    if event.author.as_ref().is_some_and(|a| a.bot) {
        return;
    }
    let old_content = old.as_ref().map(|m| m.content.as_str());
    if old_content == Some(new_content.as_str()) {
        return;
    }

    let mut embed = warning_embed()
        .title("Message Edited")
        .field("Channel", format!("<#{}>", event.channel_id), true)
        .field(
            "Jump",
            format!(
                "https://discord.com/channels/{}/{}/{}",
                guild_id, event.channel_id, event.id
            ),
            true,
        );
    if let Some(author) = &event.author {
        embed = embed.field("Author", format!("<@{}>", author.id), true);
    }
    embed = embed
        .field(
            "Before",
            old_content
                .map(|c| non_empty(truncate(c, 1024)))
                .unwrap_or_else(|| "(not cached)".to_string()),
            false,
        )
        .field("After", non_empty(truncate(new_content, 1024)), false);

    log_channel::post(state, guild_id.get(), LogEvent::MessageEdit, embed).await;
}

fn non_empty(text: String) -> String {
    if text.is_empty() {
        "(empty)".to_string()
    } else {
        text
    }
}
