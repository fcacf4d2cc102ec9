//! Member moderation commands.

use async_trait::async_trait;
use chrono::Utc;
use serenity::all::{
    ChannelId, EditMember, GetMessages, GuildId, MessageId, Permissions, Timestamp, UserId,
};

use crate::server::{
    bot::{
        command::{
            context::{CommandContext, CommandSource, Reply},
            ArgKind, ArgSpec, Command, CommandCategory, CommandInput, CommandSpec,
        },
        log_channel,
    },
    discord::{
        connector::OutgoingMessage,
        embed::{moderation_embed, success_embed, truncate, warning_embed},
    },
    error::{command::CommandError, AppError},
    model::{guild_settings::LogEvent, warning::CreateWarningParam},
    service::moderation::{normalize_reason, ModerationService},
};

/// Discord caps member timeouts at 28 days.
pub const MAX_TIMEOUT_MINUTES: i64 = 40_320;
pub const MAX_PURGE: i64 = 100;
/// Bulk deletion only accepts messages younger than two weeks.
const BULK_DELETE_MAX_AGE_SECS: i64 = 14 * 24 * 3_600;
const WARNINGS_SHOWN: usize = 10;

/// Resolves the `user` argument and rejects self-targeting.
fn target(ctx: &CommandContext<'_>, input: &CommandInput) -> Result<(u64, u64), AppError> {
    let guild_id = ctx.require_guild()?;
    let user_id = input.args.require_user("user")?;
    if user_id == ctx.caller.user_id {
        return Err(CommandError::SelfTarget.into());
    }
    Ok((guild_id, user_id))
}

/// Writes a moderation action to the log channel.
async fn log_action(ctx: &CommandContext<'_>, guild_id: u64, action: &str, user_id: u64, reason: &str) {
    let embed = moderation_embed()
        .title(format!("Member {}", action))
        .field("User", format!("<@{}> ({})", user_id, user_id), true)
        .field("Moderator", format!("<@{}>", ctx.caller.user_id), true)
        .field("Reason", truncate(reason, 1024), false);

    log_channel::post(ctx.state, guild_id, LogEvent::Moderation, embed).await;
}

/// Tells the target what happened. Members with closed DMs are skipped.
async fn notify_target(ctx: &CommandContext<'_>, user_id: u64, text: String) {
    let message = OutgoingMessage::new().embed(warning_embed().description(text));
    if let Err(e) = ctx.state.discord.send_dm(user_id, message).await {
        tracing::debug!(user_id, "Could not DM moderation notice: {}", e);
    }
}

fn guild_name(ctx: &CommandContext<'_>, guild_id: u64) -> String {
    ctx.serenity
        .cache
        .guild(GuildId::new(guild_id))
        .map(|g| g.name.clone())
        .unwrap_or_else(|| "the server".to_string())
}

pub struct Ban;

#[async_trait]
impl Command for Ban {
    fn spec(&self) -> CommandSpec {
        CommandSpec::new("ban", "Ban a member from the server", CommandCategory::Moderation)
            .arg(ArgSpec::required("user", "Member to ban", ArgKind::User))
            .arg(ArgSpec::optional("reason", "Why they are banned", ArgKind::Text))
            .permissions(Permissions::BAN_MEMBERS)
    }

    async fn run(&self, ctx: &CommandContext<'_>, input: CommandInput) -> Result<(), AppError> {
        let (guild_id, user_id) = target(ctx, &input)?;
        let reason = normalize_reason(input.args.string("reason"));

        let server = guild_name(ctx, guild_id);
        notify_target(ctx, user_id, format!("You were banned from {}: {}", server, reason)).await;

        GuildId::new(guild_id)
            .ban_with_reason(ctx.http(), UserId::new(user_id), 0, &reason)
            .await?;
        tracing::info!(guild_id, user_id, moderator = ctx.caller.user_id, "Banned member");

        log_action(ctx, guild_id, "Banned", user_id, &reason).await;
        ctx.reply(Reply::embed_only(
            moderation_embed().description(format!("Banned <@{}>: {}", user_id, reason)),
        ))
        .await
    }
}

pub struct Kick;

#[async_trait]
impl Command for Kick {
    fn spec(&self) -> CommandSpec {
        CommandSpec::new("kick", "Kick a member from the server", CommandCategory::Moderation)
            .arg(ArgSpec::required("user", "Member to kick", ArgKind::User))
            .arg(ArgSpec::optional("reason", "Why they are kicked", ArgKind::Text))
            .permissions(Permissions::KICK_MEMBERS)
    }

    async fn run(&self, ctx: &CommandContext<'_>, input: CommandInput) -> Result<(), AppError> {
        let (guild_id, user_id) = target(ctx, &input)?;
        let reason = normalize_reason(input.args.string("reason"));

        let server = guild_name(ctx, guild_id);
        notify_target(ctx, user_id, format!("You were kicked from {}: {}", server, reason)).await;

        GuildId::new(guild_id)
            .kick_with_reason(ctx.http(), UserId::new(user_id), &reason)
            .await?;
        tracing::info!(guild_id, user_id, moderator = ctx.caller.user_id, "Kicked member");

        log_action(ctx, guild_id, "Kicked", user_id, &reason).await;
        ctx.reply(Reply::embed_only(
            moderation_embed().description(format!("Kicked <@{}>: {}", user_id, reason)),
        ))
        .await
    }
}

pub struct Timeout;

#[async_trait]
impl Command for Timeout {
    fn spec(&self) -> CommandSpec {
        CommandSpec::new("timeout", "Time a member out", CommandCategory::Moderation)
            .arg(ArgSpec::required("user", "Member to time out", ArgKind::User))
            .arg(
                ArgSpec::required("minutes", "Length of the timeout", ArgKind::Integer)
                    .range(1, MAX_TIMEOUT_MINUTES),
            )
            .arg(ArgSpec::optional("reason", "Why they are timed out", ArgKind::Text))
            .permissions(Permissions::MODERATE_MEMBERS)
    }

    async fn run(&self, ctx: &CommandContext<'_>, input: CommandInput) -> Result<(), AppError> {
        let (guild_id, user_id) = target(ctx, &input)?;
        let minutes = input.args.require_integer("minutes")?;
        let reason = normalize_reason(input.args.string("reason"));

        let until = Utc::now() + chrono::Duration::minutes(minutes);
        let until = Timestamp::from_unix_timestamp(until.timestamp())
            .map_err(|e| AppError::InternalError(format!("Invalid timeout end: {}", e)))?;

        GuildId::new(guild_id)
            .edit_member(
                ctx.http(),
                UserId::new(user_id),
                EditMember::new()
                    .disable_communication_until_datetime(until)
                    .audit_log_reason(&reason),
            )
            .await?;
        tracing::info!(guild_id, user_id, minutes, "Timed out member");

        log_action(
            ctx,
            guild_id,
            &format!("Timed Out ({} min)", minutes),
            user_id,
            &reason,
        )
        .await;
        ctx.reply(Reply::embed_only(moderation_embed().description(format!(
            "Timed out <@{}> until <t:{}:f>: {}",
            user_id,
            until.unix_timestamp(),
            reason
        ))))
        .await
    }
}

pub struct Untimeout;

#[async_trait]
impl Command for Untimeout {
    fn spec(&self) -> CommandSpec {
        CommandSpec::new("untimeout", "Remove a member's timeout", CommandCategory::Moderation)
            .arg(ArgSpec::required("user", "Member to release", ArgKind::User))
            .permissions(Permissions::MODERATE_MEMBERS)
    }

    async fn run(&self, ctx: &CommandContext<'_>, input: CommandInput) -> Result<(), AppError> {
        let (guild_id, user_id) = target(ctx, &input)?;

        GuildId::new(guild_id)
            .edit_member(
                ctx.http(),
                UserId::new(user_id),
                EditMember::new().enable_communication(),
            )
            .await?;

        log_action(ctx, guild_id, "Timeout Removed", user_id, "Manual removal").await;
        ctx.reply(Reply::embed_only(
            success_embed().description(format!("Removed the timeout for <@{}>.", user_id)),
        ))
        .await
    }
}

pub struct Warn;

#[async_trait]
impl Command for Warn {
    fn spec(&self) -> CommandSpec {
        CommandSpec::new("warn", "Warn a member", CommandCategory::Moderation)
            .arg(ArgSpec::required("user", "Member to warn", ArgKind::User))
            .arg(ArgSpec::required("reason", "What the warning is for", ArgKind::Text))
            .permissions(Permissions::MODERATE_MEMBERS)
    }

    async fn run(&self, ctx: &CommandContext<'_>, input: CommandInput) -> Result<(), AppError> {
        let (guild_id, user_id) = target(ctx, &input)?;
        let reason = input.args.require_string("reason")?;

        let (warning, total) = ModerationService::new(&ctx.state.db)
            .warn(CreateWarningParam {
                guild_id,
                user_id,
                moderator_id: ctx.caller.user_id,
                reason: reason.to_string(),
            })
            .await?;

        let server = guild_name(ctx, guild_id);
        notify_target(
            ctx,
            user_id,
            format!("You were warned in {}: {}", server, warning.reason),
        )
        .await;

        log_action(ctx, guild_id, "Warned", user_id, &warning.reason).await;
        ctx.reply(Reply::embed_only(moderation_embed().description(format!(
            "Warned <@{}>: {}\nThey now have {} warning(s).",
            user_id, warning.reason, total
        ))))
        .await
    }
}

pub struct Warnings;

#[async_trait]
impl Command for Warnings {
    fn spec(&self) -> CommandSpec {
        CommandSpec::new("warnings", "List a member's warnings", CommandCategory::Moderation)
            .arg(ArgSpec::required("user", "Member to look up", ArgKind::User))
            .permissions(Permissions::MODERATE_MEMBERS)
    }

    async fn run(&self, ctx: &CommandContext<'_>, input: CommandInput) -> Result<(), AppError> {
        let guild_id = ctx.require_guild()?;
        let user_id = input.args.require_user("user")?;

        let warnings = ModerationService::new(&ctx.state.db)
            .warnings(guild_id, user_id)
            .await?;

        let mut embed = ctx
            .embed()
            .await
            .title(format!("Warnings ({})", warnings.len()))
            .description(if warnings.is_empty() {
                format!("<@{}> has no warnings.", user_id)
            } else {
                format!("<@{}>", user_id)
            });
        for warning in warnings.iter().take(WARNINGS_SHOWN) {
            embed = embed.field(
                format!("#{} · <t:{}:d>", warning.id, warning.created_at.timestamp()),
                format!(
                    "{}\nby <@{}>",
                    truncate(&warning.reason, 900),
                    warning.moderator_id
                ),
                false,
            );
        }

        ctx.reply(Reply::embed_only(embed)).await
    }
}

pub struct ClearWarnings;

#[async_trait]
impl Command for ClearWarnings {
    fn spec(&self) -> CommandSpec {
        CommandSpec::new("clearwarnings", "Remove all of a member's warnings", CommandCategory::Moderation)
            .arg(ArgSpec::required("user", "Member to clear", ArgKind::User))
            .permissions(Permissions::MODERATE_MEMBERS)
    }

    async fn run(&self, ctx: &CommandContext<'_>, input: CommandInput) -> Result<(), AppError> {
        let guild_id = ctx.require_guild()?;
        let user_id = input.args.require_user("user")?;

        let removed = ModerationService::new(&ctx.state.db)
            .clear_warnings(guild_id, user_id)
            .await?;

        log_action(
            ctx,
            guild_id,
            "Warnings Cleared",
            user_id,
            &format!("{} warning(s) removed", removed),
        )
        .await;
        ctx.reply(Reply::embed_only(success_embed().description(format!(
            "Removed {} warning(s) from <@{}>.",
            removed, user_id
        ))))
        .await
    }
}

pub struct Purge;

#[async_trait]
impl Command for Purge {
    fn spec(&self) -> CommandSpec {
        CommandSpec::new("purge", "Delete recent messages in this channel", CommandCategory::Moderation)
            .arg(
                ArgSpec::required("amount", "How many messages to delete", ArgKind::Integer)
                    .range(1, MAX_PURGE),
            )
            .permissions(Permissions::MANAGE_MESSAGES)
    }

    async fn run(&self, ctx: &CommandContext<'_>, input: CommandInput) -> Result<(), AppError> {
        let guild_id = ctx.require_guild()?;
        let amount = input.args.require_integer("amount")?.clamp(1, MAX_PURGE) as u8;
        let channel = ChannelId::new(ctx.channel_id);

        ctx.defer(true).await?;
        if let CommandSource::Prefix(message) = ctx.source {
            if let Err(e) = message.delete(ctx.http()).await {
                tracing::debug!("Failed to delete purge command message: {}", e);
            }
        }

        let cutoff = Utc::now().timestamp() - BULK_DELETE_MAX_AGE_SECS;
        let ids: Vec<MessageId> = channel
            .messages(ctx.http(), GetMessages::new().limit(amount))
            .await?
            .into_iter()
            .filter(|m| m.timestamp.unix_timestamp() > cutoff)
            .map(|m| m.id)
            .collect();

        match ids.as_slice() {
            [] => {}
            [single] => channel.delete_message(ctx.http(), *single).await?,
            many => channel.delete_messages(ctx.http(), many).await?,
        }
        tracing::info!(guild_id, channel_id = ctx.channel_id, count = ids.len(), "Purged messages");

        log_action(
            ctx,
            guild_id,
            "Messages Purged",
            ctx.caller.user_id,
            &format!("{} message(s) in <#{}>", ids.len(), ctx.channel_id),
        )
        .await;
        ctx.reply(
            Reply::embed_only(
                success_embed().description(format!("Deleted {} message(s).", ids.len())),
            )
            .ephemeral(),
        )
        .await
    }
}
