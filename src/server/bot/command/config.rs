//! `config`: per-guild settings editable from chat.

use async_trait::async_trait;
use serenity::all::Permissions;

use crate::server::{
    bot::command::{
        context::{CommandContext, Reply},
        ArgKind, ArgSpec, Command, CommandCategory, CommandInput, CommandSpec, SubcommandSpec,
    },
    discord::embed::{success_embed, truncate},
    error::{command::CommandError, AppError},
    model::guild_settings::{
        normalize_words, validate_prefix, AutomodToggle, GuildSettings, LogEvent,
        UpdateGuildSettingsParam,
    },
    service::guild_settings::GuildSettingsService,
};

/// Highest mention limit accepted by `config maxmentions`.
pub const MAX_MENTION_LIMIT: i64 = 50;
const ACTIONS: &[&str] = &["add", "remove"];

pub struct ConfigCommand;

#[async_trait]
impl Command for ConfigCommand {
    fn spec(&self) -> CommandSpec {
        CommandSpec::new("config", "View or change server settings", CommandCategory::Config)
            .subcommand(SubcommandSpec::new("show", "Show the current settings"))
            .subcommand(
                SubcommandSpec::new("prefix", "Set the command prefix")
                    .arg(ArgSpec::required("value", "New prefix, up to 5 characters", ArgKind::String)),
            )
            .subcommand(
                SubcommandSpec::new("logchannel", "Set or clear the log channel").arg(
                    ArgSpec::optional("channel", "Log channel; omit to disable logging", ArgKind::Channel),
                ),
            )
            .subcommand(
                SubcommandSpec::new("logging", "Turn logging of an event on or off")
                    .arg(
                        ArgSpec::required("event", "Event to log", ArgKind::String)
                            .choices(&LogEvent::NAMES),
                    )
                    .arg(ArgSpec::required("enabled", "On or off", ArgKind::Boolean)),
            )
            .subcommand(
                SubcommandSpec::new("automod", "Turn an auto-moderation rule on or off")
                    .arg(
                        ArgSpec::required("toggle", "Rule to change", ArgKind::String)
                            .choices(&AutomodToggle::NAMES),
                    )
                    .arg(ArgSpec::required("enabled", "On or off", ArgKind::Boolean)),
            )
            .subcommand(
                SubcommandSpec::new("maxmentions", "Limit mentions per message").arg(
                    ArgSpec::required("count", "Maximum mentions, 0 to disable", ArgKind::Integer)
                        .range(0, MAX_MENTION_LIMIT),
                ),
            )
            .subcommand(
                SubcommandSpec::new("bannedword", "Add or remove a banned word")
                    .arg(ArgSpec::required("action", "Add or remove", ArgKind::String).choices(ACTIONS))
                    .arg(ArgSpec::required("word", "Word or phrase", ArgKind::Text)),
            )
            .subcommand(
                SubcommandSpec::new("modrole", "Add or remove a moderator role")
                    .arg(ArgSpec::required("action", "Add or remove", ArgKind::String).choices(ACTIONS))
                    .arg(ArgSpec::required("role", "Moderator role", ArgKind::Role)),
            )
            .subcommand(
                SubcommandSpec::new("disablechannel", "Disable or re-enable commands in a channel")
                    .arg(ArgSpec::required("action", "Add or remove", ArgKind::String).choices(ACTIONS))
                    .arg(ArgSpec::required("channel", "Channel", ArgKind::Channel)),
            )
            .subcommand(
                SubcommandSpec::new("welcome", "Set the welcome channel and message")
                    .arg(ArgSpec::required("channel", "Welcome channel", ArgKind::Channel))
                    .arg(ArgSpec::optional(
                        "message",
                        "Message; {user} and {server} are replaced",
                        ArgKind::Text,
                    )),
            )
            .permissions(Permissions::MANAGE_GUILD)
    }

    async fn run(&self, ctx: &CommandContext<'_>, input: CommandInput) -> Result<(), AppError> {
        let guild_id = ctx.require_guild()?;
        let service = GuildSettingsService::new(&ctx.state.db, &ctx.state.config.default_prefix);
        let settings = service.get_or_create(guild_id).await?;
        let args = &input.args;

        let (param, summary) = match input.subcommand.as_deref().unwrap_or("show") {
            "show" => {
                let embed = settings_embed(ctx, &settings).await;
                return ctx.reply(Reply::embed_only(embed)).await;
            }
            "prefix" => {
                let prefix = args.require_string("value")?;
                validate_prefix(prefix)?;
                (
                    UpdateGuildSettingsParam {
                        prefix: Some(prefix.to_string()),
                        ..Default::default()
                    },
                    format!("Prefix set to `{}`.", prefix),
                )
            }
            "logchannel" => {
                let channel = args.channel("channel");
                (
                    UpdateGuildSettingsParam {
                        log_channel_id: Some(channel),
                        ..Default::default()
                    },
                    match channel {
                        Some(id) => format!("Logging to <#{}>.", id),
                        None => "Log channel cleared.".to_string(),
                    },
                )
            }
            "logging" => {
                let event: LogEvent = args.require_string("event")?.parse()?;
                let enabled = args.require_boolean("enabled")?;
                let mut logging = settings.logging;
                event.set_in(&mut logging, enabled);
                (
                    UpdateGuildSettingsParam {
                        logging: Some(logging),
                        ..Default::default()
                    },
                    format!(
                        "Logging of `{}` turned {}.",
                        args.require_string("event")?,
                        on_off(enabled)
                    ),
                )
            }
            "automod" => {
                let toggle: AutomodToggle = args.require_string("toggle")?.parse()?;
                let enabled = args.require_boolean("enabled")?;
                let mut automod = settings.automod.clone();
                toggle.set_in(&mut automod, enabled);
                (
                    UpdateGuildSettingsParam {
                        automod: Some(automod),
                        ..Default::default()
                    },
                    format!(
                        "Auto-moderation `{}` turned {}.",
                        args.require_string("toggle")?,
                        on_off(enabled)
                    ),
                )
            }
            "maxmentions" => {
                let count = args.require_integer("count")?.clamp(0, MAX_MENTION_LIMIT) as u32;
                let mut automod = settings.automod.clone();
                automod.max_mentions = count;
                (
                    UpdateGuildSettingsParam {
                        automod: Some(automod),
                        ..Default::default()
                    },
                    if count == 0 {
                        "Mention limit disabled.".to_string()
                    } else {
                        format!("Messages may mention at most {} users or roles.", count)
                    },
                )
            }
            "bannedword" => {
                let add = is_add(args.require_string("action")?);
                let word = args.require_string("word")?.trim().to_lowercase();
                let mut automod = settings.automod.clone();
                let changed = if add {
                    let before = automod.banned_words.len();
                    let mut words = automod.banned_words;
                    words.push(word.clone());
                    automod.banned_words = normalize_words(words);
                    automod.banned_words.len() != before
                } else {
                    let before = automod.banned_words.len();
                    automod.banned_words.retain(|w| *w != word);
                    automod.banned_words.len() != before
                };
                if !changed {
                    return Err(CommandError::InvalidArgument {
                        name: "word".to_string(),
                        reason: if add {
                            "that word is already banned or empty".to_string()
                        } else {
                            "that word is not on the list".to_string()
                        },
                    }
                    .into());
                }
                (
                    UpdateGuildSettingsParam {
                        automod: Some(automod),
                        ..Default::default()
                    },
                    format!(
                        "{} `{}` {} the banned word list.",
                        if add { "Added" } else { "Removed" },
                        word,
                        if add { "to" } else { "from" }
                    ),
                )
            }
            "modrole" => {
                let add = is_add(args.require_string("action")?);
                let role = args.require_role("role")?;
                let mut ids = settings.mod_role_ids.clone();
                edit_id_list(&mut ids, role, add, "role")?;
                (
                    UpdateGuildSettingsParam {
                        mod_role_ids: Some(ids),
                        ..Default::default()
                    },
                    format!(
                        "<@&{}> {} a moderator role.",
                        role,
                        if add { "is now" } else { "is no longer" }
                    ),
                )
            }
            "disablechannel" => {
                let add = is_add(args.require_string("action")?);
                let channel = args.require_channel("channel")?;
                let mut ids = settings.disabled_channel_ids.clone();
                edit_id_list(&mut ids, channel, add, "channel")?;
                (
                    UpdateGuildSettingsParam {
                        disabled_channel_ids: Some(ids),
                        ..Default::default()
                    },
                    format!(
                        "Commands are now {} in <#{}>.",
                        if add { "disabled" } else { "enabled" },
                        channel
                    ),
                )
            }
            "welcome" => {
                let channel = args.require_channel("channel")?;
                let message = args
                    .string("message")
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
                    .map(|m| truncate(m, 1_000));
                (
                    UpdateGuildSettingsParam {
                        welcome_channel_id: Some(Some(channel)),
                        welcome_message: message.map(Some),
                        ..Default::default()
                    },
                    format!("New members will be welcomed in <#{}>.", channel),
                )
            }
            other => {
                return Err(CommandError::UnknownSubcommand {
                    given: other.to_string(),
                    available: self.spec().subcommand_names(),
                }
                .into())
            }
        };

        service.update(guild_id, param).await?;
        tracing::info!(
            guild_id,
            user_id = ctx.caller.user_id,
            subcommand = input.subcommand.as_deref(),
            "Updated guild settings"
        );

        ctx.reply(Reply::embed_only(success_embed().description(summary)))
            .await
    }
}

fn is_add(action: &str) -> bool {
    action.eq_ignore_ascii_case("add")
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

/// Adds or removes `id`, rejecting no-op changes.
fn edit_id_list(ids: &mut Vec<u64>, id: u64, add: bool, name: &str) -> Result<(), CommandError> {
    let present = ids.contains(&id);
    match (add, present) {
        (true, false) => ids.push(id),
        (false, true) => ids.retain(|existing| *existing != id),
        (true, true) => {
            return Err(CommandError::InvalidArgument {
                name: name.to_string(),
                reason: "it is already on the list".to_string(),
            })
        }
        (false, false) => {
            return Err(CommandError::InvalidArgument {
                name: name.to_string(),
                reason: "it is not on the list".to_string(),
            })
        }
    }
    Ok(())
}

fn mentions(ids: &[u64], format: fn(u64) -> String) -> String {
    if ids.is_empty() {
        "None".to_string()
    } else {
        ids.iter().map(|id| format(*id)).collect::<Vec<_>>().join(" ")
    }
}

async fn settings_embed(ctx: &CommandContext<'_>, settings: &GuildSettings) -> serenity::all::CreateEmbed {
    let logging = &settings.logging;
    let automod = &settings.automod;

    let events: Vec<&str> = [
        ("delete", logging.message_delete),
        ("edit", logging.message_edit),
        ("join", logging.member_join),
        ("leave", logging.member_leave),
        ("moderation", logging.moderation),
    ]
    .into_iter()
    .filter_map(|(name, on)| on.then_some(name))
    .collect();

    ctx.embed()
        .await
        .title("Server Settings")
        .field("Prefix", format!("`{}`", settings.prefix), true)
        .field(
            "Log channel",
            settings
                .log_channel_id
                .map(|id| format!("<#{}>", id))
                .unwrap_or_else(|| "None".to_string()),
            true,
        )
        .field(
            "Logged events",
            if events.is_empty() {
                "None".to_string()
            } else {
                events.join(", ")
            },
            true,
        )
        .field(
            "Auto-moderation",
            format!(
                "Enabled: {}\nInvites: {}\nLinks: {}\nMax mentions: {}\nBanned words: {}",
                on_off(automod.enabled),
                on_off(automod.anti_invite),
                on_off(automod.anti_link),
                if automod.max_mentions == 0 {
                    "off".to_string()
                } else {
                    automod.max_mentions.to_string()
                },
                automod.banned_words.len()
            ),
            false,
        )
        .field(
            "Moderator roles",
            mentions(&settings.mod_role_ids, |id| format!("<@&{}>", id)),
            true,
        )
        .field(
            "Disabled channels",
            mentions(&settings.disabled_channel_ids, |id| format!("<#{}>", id)),
            true,
        )
        .field(
            "Welcome",
            match settings.welcome_channel_id {
                Some(id) => format!(
                    "<#{}>: {}",
                    id,
                    truncate(
                        settings.welcome_message.as_deref().unwrap_or("(default message)"),
                        200
                    )
                ),
                None => "Off".to_string(),
            },
            false,
        )
}
