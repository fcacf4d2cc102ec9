//! `ticket`: opening and working support tickets.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::server::{
    bot::command::{
        context::{CommandContext, Reply},
        ArgKind, ArgSpec, AutocompleteChoice, Command, CommandCategory, CommandInput,
        CommandSpec, SubcommandSpec,
    },
    discord::embed::{success_embed, truncate},
    error::{command::CommandError, AppError},
    model::{ticket::TicketStatus, ticket_config::TicketCategory},
    service::{
        ticket::{message::ticket_embed, CloseOutcome, OpenTicket, TicketService},
        ticket_config::TicketConfigService,
    },
    state::AppState,
};

/// Statuses staff may set directly. Closing goes through `ticket close`.
const SETTABLE_STATUSES: &[&str] = &["open", "in_progress", "waiting", "archived"];
const LISTED_TICKETS: usize = 20;

pub struct TicketCommand;

#[async_trait]
impl Command for TicketCommand {
    fn spec(&self) -> CommandSpec {
        CommandSpec::new("ticket", "Open and manage support tickets", CommandCategory::Tickets)
            .subcommand(
                SubcommandSpec::new("create", "Open a new ticket")
                    .arg(
                        ArgSpec::optional("category", "Ticket category", ArgKind::String)
                            .autocomplete(),
                    )
                    .arg(ArgSpec::optional("subject", "What you need help with", ArgKind::Text)),
            )
            .subcommand(SubcommandSpec::new("close", "Close this ticket"))
            .subcommand(SubcommandSpec::new("reopen", "Reopen this closed ticket"))
            .subcommand(SubcommandSpec::new("claim", "Claim this ticket"))
            .subcommand(
                SubcommandSpec::new("status", "Change this ticket's status").arg(
                    ArgSpec::required("status", "New status", ArgKind::String)
                        .choices(SETTABLE_STATUSES),
                ),
            )
            .subcommand(
                SubcommandSpec::new("add", "Give a member access to this ticket")
                    .arg(ArgSpec::required("user", "Member to add", ArgKind::User)),
            )
            .subcommand(
                SubcommandSpec::new("remove", "Remove a member from this ticket")
                    .arg(ArgSpec::required("user", "Member to remove", ArgKind::User)),
            )
            .subcommand(SubcommandSpec::new("list", "List open tickets"))
            .subcommand(
                SubcommandSpec::new("view", "Show a ticket's details").arg(ArgSpec::optional(
                    "number",
                    "Ticket number, defaults to this channel",
                    ArgKind::Integer,
                )),
            )
            .subcommand(SubcommandSpec::new("transcript", "Export this ticket's messages"))
            .guild_only()
    }

    async fn run(&self, ctx: &CommandContext<'_>, input: CommandInput) -> Result<(), AppError> {
        let guild_id = ctx.require_guild()?;
        let service = TicketService::new(&ctx.state.db, ctx.state.discord.as_ref());
        let actor = ctx.ticket_actor();
        let args = &input.args;

        match input.subcommand.as_deref().unwrap_or_default() {
            "create" => {
                ctx.defer(true).await?;
                let ticket = service
                    .open(
                        OpenTicket {
                            guild_id,
                            category: args.string("category"),
                            subject: args.string("subject").map(str::to_string),
                        },
                        actor,
                    )
                    .await?;
                ctx.reply(
                    Reply::embed_only(success_embed().description(format!(
                        "Your ticket is ready: <#{}>",
                        ticket.channel_id
                    )))
                    .ephemeral(),
                )
                .await
            }
            "close" => {
                ctx.defer(false).await?;
                match service.close(ctx.channel_id, actor).await? {
                    CloseOutcome::Locked(ticket) => {
                        ctx.reply(Reply::text(format!(
                            "Ticket #{} closed.",
                            ticket.padded_number()
                        )))
                        .await
                    }
                    CloseOutcome::Deleted { ticket, .. } => {
                        tracing::debug!(ticket_id = ticket.id, "Ticket channel deleted on close");
                        Ok(())
                    }
                }
            }
            "reopen" => {
                let ticket = service.reopen(ctx.channel_id, actor).await?;
                ctx.reply(
                    Reply::text(format!("Ticket #{} reopened.", ticket.padded_number()))
                        .ephemeral(),
                )
                .await
            }
            "claim" => {
                let ticket = service.claim(ctx.channel_id, actor).await?;
                ctx.reply(
                    Reply::text(format!("You claimed ticket #{}.", ticket.padded_number()))
                        .ephemeral(),
                )
                .await
            }
            "status" => {
                let status: TicketStatus = args.require_string("status")?.parse()?;
                let ticket = service.set_status(ctx.channel_id, actor, status).await?;
                ctx.reply(Reply::embed_only(success_embed().description(format!(
                    "Ticket #{} is now **{}**.",
                    ticket.padded_number(),
                    ticket.status.label()
                ))))
                .await
            }
            "add" => {
                let user_id = args.require_user("user")?;
                service.add_user(ctx.channel_id, actor, user_id).await?;
                ctx.reply(Reply::embed_only(
                    success_embed().description(format!("Added <@{}> to this ticket.", user_id)),
                ))
                .await
            }
            "remove" => {
                let user_id = args.require_user("user")?;
                service.remove_user(ctx.channel_id, actor, user_id).await?;
                ctx.reply(Reply::embed_only(success_embed().description(format!(
                    "Removed <@{}> from this ticket.",
                    user_id
                ))))
                .await
            }
            "list" => {
                let config = TicketConfigService::new(&ctx.state.db)
                    .get_or_create(guild_id)
                    .await?;
                if !actor.is_staff(&config) {
                    return Err(CommandError::NotTicketStaff.into());
                }

                let tickets = service.list_active(guild_id).await?;
                let lines: Vec<String> = tickets
                    .iter()
                    .take(LISTED_TICKETS)
                    .map(|t| {
                        format!(
                            "`#{}` <#{}> · <@{}> · {}{}",
                            t.padded_number(),
                            t.channel_id,
                            t.user_id,
                            t.status.label(),
                            t.subject
                                .as_deref()
                                .map(|s| format!(" · {}", truncate(s, 40)))
                                .unwrap_or_default()
                        )
                    })
                    .collect();

                let counts = service.count_by_status(Some(guild_id)).await?;
                let summary: Vec<String> = TicketStatus::ALL
                    .into_iter()
                    .filter_map(|s| counts.get(&s).map(|n| format!("{}: {}", s.label(), n)))
                    .collect();

                let mut embed = ctx
                    .embed()
                    .await
                    .title(format!("Open Tickets ({})", tickets.len()))
                    .description(if lines.is_empty() {
                        "There are no open tickets.".to_string()
                    } else {
                        lines.join("\n")
                    });
                if !summary.is_empty() {
                    embed = embed.field("All tickets", summary.join(" · "), false);
                }
                ctx.reply(Reply::embed_only(embed).ephemeral()).await
            }
            "view" => {
                let ticket = match args.integer("number") {
                    Some(number) => {
                        let number = i32::try_from(number)
                            .map_err(|_| CommandError::TicketNotFound(i32::MAX))?;
                        service.get_by_number(guild_id, number).await?
                    }
                    None => service.get_by_channel(ctx.channel_id).await?,
                };

                let config = TicketConfigService::new(&ctx.state.db)
                    .get_or_create(guild_id)
                    .await?;
                if ticket.user_id != actor.user_id && !actor.is_staff(&config) {
                    return Err(CommandError::NotTicketStaff.into());
                }

                ctx.reply(Reply::embed_only(ticket_embed(&ticket)).ephemeral())
                    .await
            }
            "transcript" => {
                ctx.defer(true).await?;
                let (ticket, filename, transcript) =
                    service.transcript(ctx.channel_id, actor).await?;
                ctx.reply(
                    Reply::text(format!("Transcript of ticket #{}", ticket.padded_number()))
                        .attachment(filename, transcript.into_bytes())
                        .ephemeral(),
                )
                .await
            }
            other => Err(CommandError::UnknownSubcommand {
                given: other.to_string(),
                available: self.spec().subcommand_names(),
            }
            .into()),
        }
    }

    async fn autocomplete(
        &self,
        state: &AppState,
        guild_id: Option<u64>,
        option: &str,
        partial: &str,
    ) -> Result<Vec<AutocompleteChoice>, AppError> {
        let Some(guild_id) = guild_id else {
            return Ok(Vec::new());
        };
        if option != "category" {
            return Ok(Vec::new());
        }

        let config = TicketConfigService::new(&state.db)
            .get_or_create(guild_id)
            .await?;
        Ok(category_choices(&config.categories, partial))
    }
}

/// Categories whose key or name contains `partial`, ignoring case.
fn category_choices(
    categories: &BTreeMap<String, TicketCategory>,
    partial: &str,
) -> Vec<AutocompleteChoice> {
    let partial = partial.trim().to_lowercase();
    categories
        .iter()
        .filter(|(key, category)| {
            partial.is_empty()
                || key.contains(&partial)
                || category.name.to_lowercase().contains(&partial)
        })
        .map(|(key, category)| AutocompleteChoice {
            name: category.name.clone(),
            value: key.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Expect autocomplete to match on key or display name
    #[test]
    fn filters_category_choices() {
        let mut categories = BTreeMap::new();
        for (key, name) in [("billing", "Billing"), ("support", "General Help")] {
            categories.insert(
                key.to_string(),
                TicketCategory {
                    name: name.to_string(),
                    description: None,
                    emoji: None,
                },
            );
        }

        let by_key = category_choices(&categories, "bill");
        assert_eq!(by_key.len(), 1);
        assert_eq!(by_key[0].value, "billing");

        let by_name = category_choices(&categories, "HELP");
        assert_eq!(by_name[0].value, "support");

        assert_eq!(category_choices(&categories, "").len(), 2);
    }
}
