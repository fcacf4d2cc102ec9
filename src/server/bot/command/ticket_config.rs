//! `ticketconfig`: ticket categories, staff and panel setup.

use async_trait::async_trait;
use serenity::all::Permissions;

use crate::server::{
    bot::command::{
        context::{CommandContext, Reply},
        ArgKind, ArgSpec, AutocompleteChoice, Command, CommandCategory, CommandInput,
        CommandSpec, SubcommandSpec,
    },
    discord::embed::success_embed,
    error::{command::CommandError, AppError},
    model::ticket_config::{TicketCategory, MAX_TICKETS_PER_USER_LIMIT},
    service::{ticket::message::panel_message, ticket_config::TicketConfigService},
    state::AppState,
};

pub struct TicketConfigCommand;

#[async_trait]
impl Command for TicketConfigCommand {
    fn spec(&self) -> CommandSpec {
        CommandSpec::new("ticketconfig", "Configure the ticket system", CommandCategory::Tickets)
            .subcommand(
                SubcommandSpec::new("category-add", "Add a ticket category")
                    .arg(ArgSpec::required("key", "Short id, e.g. billing", ArgKind::String))
                    .arg(ArgSpec::required("name", "Display name", ArgKind::String))
                    .arg(ArgSpec::optional("description", "Shown on the panel", ArgKind::String))
                    .arg(ArgSpec::optional("emoji", "Button emoji", ArgKind::String)),
            )
            .subcommand(
                SubcommandSpec::new("category-remove", "Remove a ticket category").arg(
                    ArgSpec::required("key", "Category to remove", ArgKind::String).autocomplete(),
                ),
            )
            .subcommand(SubcommandSpec::new("category-list", "List ticket categories"))
            .subcommand(
                SubcommandSpec::new("supportrole-add", "Give a role access to all tickets")
                    .arg(ArgSpec::required("role", "Support role", ArgKind::Role)),
            )
            .subcommand(
                SubcommandSpec::new("supportrole-remove", "Remove a support role")
                    .arg(ArgSpec::required("role", "Support role", ArgKind::Role)),
            )
            .subcommand(
                SubcommandSpec::new("maxtickets", "Set how many open tickets a member may have")
                    .arg(
                        ArgSpec::required("count", "Open tickets per member", ArgKind::Integer)
                            .range(1, MAX_TICKETS_PER_USER_LIMIT as i64),
                    ),
            )
            .subcommand(
                SubcommandSpec::new("transcripts", "Set where transcripts are posted").arg(
                    ArgSpec::optional("channel", "Transcript channel; omit to disable", ArgKind::Channel),
                ),
            )
            .subcommand(
                SubcommandSpec::new("parent", "Set the category new tickets are created in").arg(
                    ArgSpec::optional("channel", "Category channel; omit to clear", ArgKind::Channel),
                ),
            )
            .subcommand(
                SubcommandSpec::new("deleteonclose", "Delete ticket channels when closed")
                    .arg(ArgSpec::required("enabled", "On or off", ArgKind::Boolean)),
            )
            .subcommand(
                SubcommandSpec::new("panel", "Post the ticket panel").arg(ArgSpec::optional(
                    "channel",
                    "Where to post, defaults to here",
                    ArgKind::Channel,
                )),
            )
            .permissions(Permissions::MANAGE_GUILD)
    }

    async fn run(&self, ctx: &CommandContext<'_>, input: CommandInput) -> Result<(), AppError> {
        let guild_id = ctx.require_guild()?;
        let service = TicketConfigService::new(&ctx.state.db);
        let args = &input.args;

        let summary = match input.subcommand.as_deref().unwrap_or_default() {
            "category-add" => {
                let key = args.require_string("key")?;
                let config = service
                    .add_category(
                        guild_id,
                        key,
                        TicketCategory {
                            name: args.require_string("name")?.to_string(),
                            description: args.string("description").map(str::to_string),
                            emoji: args.string("emoji").map(str::to_string),
                        },
                    )
                    .await?;
                format!(
                    "Added category `{}`. There are now {} categories.",
                    key.trim().to_lowercase(),
                    config.categories.len()
                )
            }
            "category-remove" => {
                let key = args.require_string("key")?;
                service.remove_category(guild_id, key).await?;
                format!("Removed category `{}`.", key.trim().to_lowercase())
            }
            "category-list" => {
                let config = service.get_or_create(guild_id).await?;
                let mut embed = ctx.embed().await.title("Ticket Categories");
                for (key, category) in &config.categories {
                    embed = embed.field(
                        format!(
                            "{}{} (`{}`)",
                            category
                                .emoji
                                .as_deref()
                                .map(|e| format!("{} ", e))
                                .unwrap_or_default(),
                            category.name,
                            key
                        ),
                        category
                            .description
                            .clone()
                            .unwrap_or_else(|| "No description".to_string()),
                        false,
                    );
                }
                embed = embed.field(
                    "Support roles",
                    if config.support_role_ids.is_empty() {
                        "None".to_string()
                    } else {
                        config
                            .support_role_ids
                            .iter()
                            .map(|id| format!("<@&{}>", id))
                            .collect::<Vec<_>>()
                            .join(" ")
                    },
                    true,
                )
                .field(
                    "Max per member",
                    config.max_tickets_per_user.to_string(),
                    true,
                )
                .field(
                    "Transcripts",
                    config
                        .transcript_channel_id
                        .map(|id| format!("<#{}>", id))
                        .unwrap_or_else(|| "Off".to_string()),
                    true,
                )
                .field(
                    "On close",
                    if config.delete_on_close {
                        "Delete channel"
                    } else {
                        "Lock channel"
                    },
                    true,
                );
                return ctx.reply(Reply::embed_only(embed)).await;
            }
            "supportrole-add" => {
                let role = args.require_role("role")?;
                service.add_support_role(guild_id, role).await?;
                format!("<@&{}> can now see and manage tickets.", role)
            }
            "supportrole-remove" => {
                let role = args.require_role("role")?;
                service.remove_support_role(guild_id, role).await?;
                format!("<@&{}> is no longer a support role.", role)
            }
            "maxtickets" => {
                let count = args.require_integer("count")?;
                service.set_max_tickets(guild_id, count).await?;
                format!("Members may now have {} open ticket(s).", count)
            }
            "transcripts" => {
                let channel = args.channel("channel");
                service.set_transcript_channel(guild_id, channel).await?;
                match channel {
                    Some(id) => format!("Transcripts will be posted in <#{}>.", id),
                    None => "Transcript posting disabled.".to_string(),
                }
            }
            "parent" => {
                let channel = args.channel("channel");
                service.set_parent_category(guild_id, channel).await?;
                match channel {
                    Some(id) => format!("New tickets will be created under <#{}>.", id),
                    None => "New tickets will be created at the top level.".to_string(),
                }
            }
            "deleteonclose" => {
                let enabled = args.require_boolean("enabled")?;
                service.set_delete_on_close(guild_id, enabled).await?;
                if enabled {
                    "Ticket channels will be deleted when closed.".to_string()
                } else {
                    "Ticket channels will be locked when closed.".to_string()
                }
            }
            "panel" => {
                let channel = args.channel("channel").unwrap_or(ctx.channel_id);
                let config = service.get_or_create(guild_id).await?;
                ctx.state
                    .discord
                    .send_message(channel, panel_message(&config))
                    .await?;
                format!("Posted the ticket panel in <#{}>.", channel)
            }
            other => {
                return Err(CommandError::UnknownSubcommand {
                    given: other.to_string(),
                    available: self.spec().subcommand_names(),
                }
                .into())
            }
        };

        tracing::info!(
            guild_id,
            user_id = ctx.caller.user_id,
            subcommand = input.subcommand.as_deref(),
            "Updated ticket configuration"
        );
        ctx.reply(Reply::embed_only(success_embed().description(summary)).ephemeral())
            .await
    }

    async fn autocomplete(
        &self,
        state: &AppState,
        guild_id: Option<u64>,
        option: &str,
        partial: &str,
    ) -> Result<Vec<AutocompleteChoice>, AppError> {
        let (Some(guild_id), "key") = (guild_id, option) else {
            return Ok(Vec::new());
        };
        let config = TicketConfigService::new(&state.db)
            .get_or_create(guild_id)
            .await?;
        let partial = partial.trim().to_lowercase();

        Ok(config
            .categories
            .into_iter()
            .filter(|(key, _)| key.starts_with(&partial))
            .map(|(key, category)| AutocompleteChoice {
                name: category.name,
                value: key,
            })
            .collect())
    }
}
