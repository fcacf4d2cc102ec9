use async_trait::async_trait;
use serenity::all::{ComponentInteraction, Context};

use crate::server::{
    bot::{
        command::dispatch::interaction_caller,
        component::{ephemeral, ComponentHandler},
    },
    discord::embed::{primary_embed, success_embed},
    error::{command::CommandError, AppError},
    model::poll::VoteOutcome,
    service::poll::{parse_vote_custom_id, END_BUTTON_ID},
    state::AppState,
};

/// Vote and End buttons on button-mode polls.
pub struct PollComponents;

#[async_trait]
impl ComponentHandler for PollComponents {
    fn prefix(&self) -> &'static str {
        "poll"
    }

    async fn handle_component(
        &self,
        state: &AppState,
        ctx: &Context,
        interaction: &ComponentInteraction,
    ) -> Result<(), AppError> {
        let custom_id = interaction.data.custom_id.as_str();
        let poll_id = interaction.message.id.get();
        let service = state.poll_service();

        let embed = if custom_id == END_BUTTON_ID {
            let caller = interaction_caller(state, &interaction.user, interaction.member.as_ref());
            let actor = caller.poll_actor(interaction.guild_id.map(|id| id.get()));
            let results = service.end(poll_id, actor).await?;
            success_embed().description(format!("Poll ended with {} vote(s).", results.total))
        } else {
            let option = parse_vote_custom_id(custom_id)
                .ok_or_else(|| CommandError::UnknownCommand(custom_id.to_string()))?;
            let (outcome, chosen) = service
                .vote(poll_id, interaction.user.id.get(), option)
                .await?;
            primary_embed().description(vote_text(outcome, &chosen))
        };

        interaction.create_response(&ctx.http, ephemeral(embed)).await?;
        Ok(())
    }
}

fn vote_text(outcome: VoteOutcome, chosen: &str) -> String {
    match outcome {
        VoteOutcome::Recorded => format!("Vote recorded for **{}**.", chosen),
        VoteOutcome::Moved { .. } => format!("Your vote moved to **{}**.", chosen),
        VoteOutcome::Unchanged => format!("You already voted for **{}**.", chosen),
    }
}
