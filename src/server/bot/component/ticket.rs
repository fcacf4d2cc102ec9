use async_trait::async_trait;
use serenity::all::{
    ActionRowComponent, ComponentInteraction, Context, CreateActionRow, CreateInputText,
    CreateInteractionResponse, CreateInteractionResponseMessage, CreateModal, InputTextStyle,
    ModalInteraction,
};

use crate::server::{
    bot::{
        command::dispatch::interaction_caller,
        component::{ephemeral, ephemeral_followup, ComponentHandler},
    },
    discord::embed::success_embed,
    error::{command::CommandError, AppError},
    service::ticket::{
        message::{CLAIM_BUTTON_ID, CLOSE_BUTTON_ID, MODAL_PREFIX, OPEN_BUTTON_PREFIX, REOPEN_BUTTON_ID},
        CloseOutcome, OpenTicket, TicketService,
    },
    state::AppState,
};

const SUBJECT_INPUT_ID: &str = "subject";
const MAX_SUBJECT_LEN: u16 = 1_000;

/// Ticket panel and in-ticket buttons, plus the subject modal.
pub struct TicketComponents;

#[async_trait]
impl ComponentHandler for TicketComponents {
    fn prefix(&self) -> &'static str {
        "ticket"
    }

    async fn handle_component(
        &self,
        state: &AppState,
        ctx: &Context,
        interaction: &ComponentInteraction,
    ) -> Result<(), AppError> {
        let custom_id = interaction.data.custom_id.as_str();

        if let Some(key) = custom_id.strip_prefix(OPEN_BUTTON_PREFIX) {
            let modal = CreateModal::new(format!("{}{}", MODAL_PREFIX, key), "Open a ticket")
                .components(vec![CreateActionRow::InputText(
                    CreateInputText::new(InputTextStyle::Paragraph, "What do you need help with?", SUBJECT_INPUT_ID)
                        .required(false)
                        .max_length(MAX_SUBJECT_LEN),
                )]);
            interaction
                .create_response(&ctx.http, CreateInteractionResponse::Modal(modal))
                .await?;
            return Ok(());
        }

        interaction.guild_id.ok_or(CommandError::GuildOnly)?;
        let caller = interaction_caller(state, &interaction.user, interaction.member.as_ref());
        let actor = caller.ticket_actor();
        let service = TicketService::new(&state.db, state.discord.as_ref());
        let channel_id = interaction.channel_id.get();

        match custom_id {
            CLOSE_BUTTON_ID => {
                interaction
                    .create_response(
                        &ctx.http,
                        CreateInteractionResponse::Defer(
                            CreateInteractionResponseMessage::new().ephemeral(true),
                        ),
                    )
                    .await?;
                if let CloseOutcome::Locked(ticket) = service.close(channel_id, actor).await? {
                    interaction
                        .create_followup(
                            &ctx.http,
                            ephemeral_followup(success_embed().description(format!(
                                "Ticket #{} closed.",
                                ticket.padded_number()
                            ))),
                        )
                        .await?;
                }
            }
            CLAIM_BUTTON_ID => {
                let ticket = service.claim(channel_id, actor).await?;
                interaction
                    .create_response(
                        &ctx.http,
                        ephemeral(success_embed().description(format!(
                            "You claimed ticket #{}.",
                            ticket.padded_number()
                        ))),
                    )
                    .await?;
            }
            REOPEN_BUTTON_ID => {
                let ticket = service.reopen(channel_id, actor).await?;
                interaction
                    .create_response(
                        &ctx.http,
                        ephemeral(success_embed().description(format!(
                            "Ticket #{} reopened.",
                            ticket.padded_number()
                        ))),
                    )
                    .await?;
            }
            other => {
                return Err(CommandError::UnknownCommand(other.to_string()).into());
            }
        }

        Ok(())
    }

    async fn handle_modal(
        &self,
        state: &AppState,
        ctx: &Context,
        interaction: &ModalInteraction,
    ) -> Result<(), AppError> {
        let key = interaction
            .data
            .custom_id
            .strip_prefix(MODAL_PREFIX)
            .ok_or_else(|| CommandError::UnknownCommand(interaction.data.custom_id.clone()))?;
        let guild_id = interaction.guild_id.ok_or(CommandError::GuildOnly)?.get();

        let subject = interaction
            .data
            .components
            .iter()
            .flat_map(|row| row.components.iter())
            .find_map(|component| match component {
                ActionRowComponent::InputText(input) if input.custom_id == SUBJECT_INPUT_ID => {
                    input.value.clone()
                }
                _ => None,
            })
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        interaction
            .create_response(
                &ctx.http,
                CreateInteractionResponse::Defer(CreateInteractionResponseMessage::new().ephemeral(true)),
            )
            .await?;

        let caller = interaction_caller(state, &interaction.user, interaction.member.as_ref());
        let ticket = TicketService::new(&state.db, state.discord.as_ref())
            .open(
                OpenTicket {
                    guild_id,
                    category: Some(key),
                    subject,
                },
                caller.ticket_actor(),
            )
            .await?;

        interaction
            .create_followup(
                &ctx.http,
                ephemeral_followup(
                    success_embed().description(format!("Your ticket is ready: <#{}>", ticket.channel_id)),
                ),
            )
            .await?;

        Ok(())
    }
}
