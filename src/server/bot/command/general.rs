use std::time::Duration;

use async_trait::async_trait;
use serenity::all::{GuildId, Mentionable, UserId};

use crate::server::{
    bot::command::{
        context::{CommandContext, Reply},
        ArgKind, ArgSpec, Command, CommandCategory, CommandInput, CommandSpec,
    },
    error::{command::CommandError, AppError},
};

pub struct Ping;

#[async_trait]
impl Command for Ping {
    fn spec(&self) -> CommandSpec {
        CommandSpec::new("ping", "Check that the bot is responsive", CommandCategory::General)
    }

    async fn run(&self, ctx: &CommandContext<'_>, _input: CommandInput) -> Result<(), AppError> {
        let latency = match ctx.state.stats.latency().await {
            Some(latency) => format!("{} ms", latency.as_millis()),
            None => "not measured yet".to_string(),
        };

        let embed = ctx
            .embed()
            .await
            .title("Pong!")
            .field("Gateway latency", latency, true);

        ctx.reply(Reply::embed_only(embed)).await
    }
}

pub struct Help;

#[async_trait]
impl Command for Help {
    fn spec(&self) -> CommandSpec {
        CommandSpec::new("help", "List commands or show help for one", CommandCategory::General)
            .arg(ArgSpec::optional("command", "Command to describe", ArgKind::String))
    }

    async fn run(&self, ctx: &CommandContext<'_>, input: CommandInput) -> Result<(), AppError> {
        let registry = &ctx.state.registry;

        if let Some(name) = input.args.string("command") {
            let registered = registry
                .get(name)
                .ok_or_else(|| CommandError::UnknownCommand(name.to_string()))?;
            let spec = &registered.spec;

            let mut usage = vec![format!("`{}{}`", ctx.prefix, spec.usage())];
            usage.extend(
                spec.subcommand_usages()
                    .into_iter()
                    .map(|line| format!("`{}{}`", ctx.prefix, line)),
            );

            let mut embed = ctx
                .embed()
                .await
                .title(format!("Help: {}", spec.name))
                .description(spec.description)
                .field("Category", spec.category.name(), true)
                .field("Usage", usage.join("\n"), false);
            if !spec.permissions.is_empty() {
                embed = embed.field("Requires", spec.permissions.to_string(), true);
            }
            if spec.owner_only {
                embed = embed.field("Restricted", "Bot owner only", true);
            }

            return ctx.reply(Reply::embed_only(embed)).await;
        }

        let mut embed = ctx.embed().await.title("Commands").description(format!(
            "Use `/command` or `{}command`. Run `{}help <command>` for details.",
            ctx.prefix, ctx.prefix
        ));
        for category in CommandCategory::ALL {
            if category == CommandCategory::Owner && !ctx.caller.is_owner {
                continue;
            }
            let names: Vec<String> = registry
                .commands_in(category)
                .into_iter()
                .map(|c| format!("`{}`", c.spec.name))
                .collect();
            if !names.is_empty() {
                embed = embed.field(category.name(), names.join(" "), false);
            }
        }

        ctx.reply(Reply::embed_only(embed)).await
    }
}

pub struct About;

#[async_trait]
impl Command for About {
    fn spec(&self) -> CommandSpec {
        CommandSpec::new("about", "Show bot version and uptime", CommandCategory::General)
    }

    async fn run(&self, ctx: &CommandContext<'_>, _input: CommandInput) -> Result<(), AppError> {
        let stats = &ctx.state.stats;

        let embed = ctx
            .embed()
            .await
            .title("About Warden")
            .description("Moderation, tickets and polls for your server.")
            .field("Version", env!("CARGO_PKG_VERSION"), true)
            .field("Uptime", format_duration(stats.uptime()), true)
            .field("Servers", stats.guild_count().await.to_string(), true)
            .field("Commands run", stats.commands_executed().to_string(), true);

        ctx.reply(Reply::embed_only(embed)).await
    }
}

pub struct ServerInfo;

struct GuildFacts {
    name: String,
    owner_id: UserId,
    member_count: u64,
    channel_count: usize,
    role_count: usize,
    icon_url: Option<String>,
}

#[async_trait]
impl Command for ServerInfo {
    fn spec(&self) -> CommandSpec {
        CommandSpec::new("serverinfo", "Show information about this server", CommandCategory::General)
            .guild_only()
    }

    async fn run(&self, ctx: &CommandContext<'_>, _input: CommandInput) -> Result<(), AppError> {
        let guild_id = GuildId::new(ctx.require_guild()?);

        let facts = ctx.serenity.cache.guild(guild_id).map(|guild| GuildFacts {
            name: guild.name.clone(),
            owner_id: guild.owner_id,
            member_count: guild.member_count,
            channel_count: guild.channels.len(),
            role_count: guild.roles.len(),
            icon_url: guild.icon_url(),
        });
        let facts = facts.ok_or_else(|| {
            AppError::NotFound("Server details are not available yet, try again shortly.".to_string())
        })?;

        let mut embed = ctx
            .embed()
            .await
            .title(facts.name)
            .field("Owner", facts.owner_id.mention().to_string(), true)
            .field("Members", facts.member_count.to_string(), true)
            .field("Channels", facts.channel_count.to_string(), true)
            .field("Roles", facts.role_count.to_string(), true)
            .field(
                "Created",
                format!("<t:{}:R>", guild_id.created_at().unix_timestamp()),
                true,
            );
        if let Some(icon) = facts.icon_url {
            embed = embed.thumbnail(icon);
        }

        ctx.reply(Reply::embed_only(embed)).await
    }
}

pub struct UserInfo;

#[async_trait]
impl Command for UserInfo {
    fn spec(&self) -> CommandSpec {
        CommandSpec::new("userinfo", "Show information about a user", CommandCategory::General)
            .arg(ArgSpec::optional("user", "User to look up, defaults to you", ArgKind::User))
    }

    async fn run(&self, ctx: &CommandContext<'_>, input: CommandInput) -> Result<(), AppError> {
        let user_id = UserId::new(input.args.user("user").unwrap_or(ctx.caller.user_id));
        let user = user_id.to_user(ctx.serenity).await?;

        let mut embed = ctx
            .embed()
            .await
            .title(user.tag())
            .thumbnail(user.face())
            .field("ID", user.id.to_string(), true)
            .field("Bot", if user.bot { "Yes" } else { "No" }, true)
            .field(
                "Account created",
                format!("<t:{}:R>", user.id.created_at().unix_timestamp()),
                true,
            );

        if let Some(guild_id) = ctx.guild_id {
            match GuildId::new(guild_id).member(ctx.serenity, user_id).await {
                Ok(member) => {
                    if let Some(joined) = member.joined_at {
                        embed = embed.field(
                            "Joined server",
                            format!("<t:{}:R>", joined.unix_timestamp()),
                            true,
                        );
                    }
                    let roles: Vec<String> =
                        member.roles.iter().map(|r| r.mention().to_string()).collect();
                    if !roles.is_empty() {
                        embed = embed.field(format!("Roles ({})", roles.len()), roles.join(" "), false);
                    }
                }
                Err(e) => tracing::debug!(user_id = user_id.get(), "User is not a member: {}", e),
            }
        }

        ctx.reply(Reply::embed_only(embed)).await
    }
}

/// Formats a duration as `1d 2h 3m 4s`, dropping leading zero units.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let (days, hours, minutes, seconds) = (secs / 86_400, secs / 3_600 % 24, secs / 60 % 60, secs % 60);

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{}d", days));
    }
    if days > 0 || hours > 0 {
        parts.push(format!("{}h", hours));
    }
    if days > 0 || hours > 0 || minutes > 0 {
        parts.push(format!("{}m", minutes));
    }
    parts.push(format!("{}s", seconds));
    parts.join(" ")
}
