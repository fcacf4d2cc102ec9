//! Button and modal interactions, routed by the `custom_id` text before the first `:`.

pub mod poll;
pub mod ticket;

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use serenity::all::{
    ComponentInteraction, Context, CreateEmbed, CreateInteractionResponse,
    CreateInteractionResponseFollowup, CreateInteractionResponseMessage, ModalInteraction,
};

use crate::server::{
    discord::embed::command_error_embed,
    error::{command::CommandError, AppError},
    state::AppState,
};

#[async_trait]
pub trait ComponentHandler: Send + Sync {
    /// Route key, e.g. `ticket` for `ticket:close`.
    fn prefix(&self) -> &'static str;

    async fn handle_component(
        &self,
        state: &AppState,
        ctx: &Context,
        interaction: &ComponentInteraction,
    ) -> Result<(), AppError>;

    async fn handle_modal(
        &self,
        _state: &AppState,
        _ctx: &Context,
        interaction: &ModalInteraction,
    ) -> Result<(), AppError> {
        Err(CommandError::UnknownCommand(interaction.data.custom_id.clone()).into())
    }
}

pub struct ComponentRouter {
    handlers: HashMap<&'static str, Arc<dyn ComponentHandler>>,
}

impl ComponentRouter {
    pub fn new(handlers: Vec<Arc<dyn ComponentHandler>>) -> Self {
        Self {
            handlers: handlers.into_iter().map(|h| (h.prefix(), h)).collect(),
        }
    }

    /// Router with the ticket and poll handlers.
    pub fn builtin() -> Self {
        Self::new(vec![
            Arc::new(ticket::TicketComponents),
            Arc::new(poll::PollComponents),
        ])
    }

    fn handler(&self, custom_id: &str) -> Option<&Arc<dyn ComponentHandler>> {
        self.handlers.get(route_key(custom_id))
    }

    pub async fn dispatch_component(
        &self,
        state: &AppState,
        ctx: &Context,
        interaction: &ComponentInteraction,
    ) {
        let custom_id = &interaction.data.custom_id;
        let Some(handler) = self.handler(custom_id) else {
            tracing::debug!(custom_id, "No handler for component");
            return;
        };

        if let Err(err) = handler.handle_component(state, ctx, interaction).await {
            log_failure(custom_id, interaction.user.id.get(), &err);
            let embed = command_error_embed(&err.user_message());
            if interaction
                .create_response(&ctx.http, ephemeral(embed.clone()))
                .await
                .is_err()
            {
                if let Err(e) = interaction
                    .create_followup(&ctx.http, ephemeral_followup(embed))
                    .await
                {
                    tracing::warn!(custom_id, "Failed to report interaction error: {}", e);
                }
            }
        }
    }

    pub async fn dispatch_modal(&self, state: &AppState, ctx: &Context, interaction: &ModalInteraction) {
        let custom_id = &interaction.data.custom_id;
        let Some(handler) = self.handler(custom_id) else {
            tracing::debug!(custom_id, "No handler for modal");
            return;
        };

        if let Err(err) = handler.handle_modal(state, ctx, interaction).await {
            log_failure(custom_id, interaction.user.id.get(), &err);
            let embed = command_error_embed(&err.user_message());
            if interaction
                .create_response(&ctx.http, ephemeral(embed.clone()))
                .await
                .is_err()
            {
                if let Err(e) = interaction
                    .create_followup(&ctx.http, ephemeral_followup(embed))
                    .await
                {
                    tracing::warn!(custom_id, "Failed to report interaction error: {}", e);
                }
            }
        }
    }
}

/// The part of a custom id before the first `:`.
pub fn route_key(custom_id: &str) -> &str {
    custom_id.split(':').next().unwrap_or_default()
}

/// Ephemeral message response.
pub fn ephemeral(embed: CreateEmbed) -> CreateInteractionResponse {
    CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .embed(embed)
            .ephemeral(true),
    )
}

/// Ephemeral follow-up after a deferred response.
pub fn ephemeral_followup(embed: CreateEmbed) -> CreateInteractionResponseFollowup {
    CreateInteractionResponseFollowup::new()
        .embed(embed)
        .ephemeral(true)
}

fn log_failure(custom_id: &str, user_id: u64, err: &AppError) {
    match err {
        AppError::CommandErr(e) => tracing::info!(custom_id, user_id, "Interaction rejected: {}", e),
        e => tracing::error!(custom_id, user_id, "Interaction failed: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Expect the route key to be the text before the first colon
    #[test]
    fn route_key_uses_first_segment() {
        assert_eq!(route_key("ticket:open:billing"), "ticket");
        assert_eq!(route_key("poll:vote:2"), "poll");
        assert_eq!(route_key("plain"), "plain");
    }
}
