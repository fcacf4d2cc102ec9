pub mod store;
pub mod tally;

use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use serenity::all::{ButtonStyle, CreateActionRow, CreateButton, ReactionType};

use crate::server::{
    discord::{
        connector::{DiscordConnector, OutgoingMessage},
        embed::{primary_embed, success_embed, truncate},
    },
    error::{command::CommandError, AppError},
    model::poll::{CreatePollParam, Poll, PollMode, PollResults, VoteOutcome, OPTION_EMOJIS},
};

use self::store::PollStore;

pub const VOTE_BUTTON_PREFIX: &str = "poll:vote:";
pub const END_BUTTON_ID: &str = "poll:end";

/// Who is voting or ending a poll.
#[derive(Debug, Clone, Copy)]
pub struct PollActor {
    pub user_id: u64,
    pub guild_id: Option<u64>,
    pub can_manage_messages: bool,
}

#[derive(Clone)]
pub struct PollService {
    store: Arc<dyn PollStore>,
    discord: Arc<dyn DiscordConnector>,
}

impl PollService {
    pub fn new(store: Arc<dyn PollStore>, discord: Arc<dyn DiscordConnector>) -> Self {
        Self { store, discord }
    }

    /// Posts a poll and starts tracking it.
    ///
    /// # Arguments
    /// - `channel_id` - Channel to post the poll in
    /// - `actor` - Poll author
    /// - `param` - Validated question, options, mode and optional duration
    ///
    /// # Returns
    /// - `Ok(Poll)` - The stored poll, keyed by its message id
    /// - `Err(AppError)` - Posting the message or adding reactions failed
    pub async fn create(
        &self,
        channel_id: u64,
        actor: PollActor,
        param: CreatePollParam,
    ) -> Result<Poll, AppError> {
        let ends_at = param.duration.map(|d| Utc::now() + d);

        let mut message = OutgoingMessage::new().embed(poll_embed(
            &param.question,
            &param.options,
            param.mode,
            actor.user_id,
            ends_at,
        ));
        if param.mode == PollMode::Buttons {
            message = message.components(vote_buttons(&param.options));
        }

        let message_id = self.discord.send_message(channel_id, message).await?;

        if param.mode == PollMode::Reactions {
            for emoji in OPTION_EMOJIS.iter().take(param.options.len()) {
                self.discord.add_reaction(channel_id, message_id, emoji).await?;
            }
        }

        let poll = Poll {
            id: message_id,
            guild_id: actor.guild_id,
            channel_id,
            author_id: actor.user_id,
            question: param.question,
            options: param.options,
            mode: param.mode,
            votes: HashMap::new(),
            ends_at,
        };
        self.store.put(poll.clone()).await;

        if let Some(duration) = param.duration {
            self.schedule_auto_end(poll.id, duration);
        }

        tracing::info!(
            poll_id = poll.id,
            channel_id,
            options = poll.options.len(),
            "Created poll"
        );

        Ok(poll)
    }

    /// Records a button vote. Voting again moves the user's vote.
    ///
    /// # Returns
    /// - `Ok((VoteOutcome, option))` - Outcome and the chosen option text
    /// - `Err(AppError::CommandErr)` - Poll unknown or ended, or option out of range
    pub async fn vote(
        &self,
        poll_id: u64,
        user_id: u64,
        option: usize,
    ) -> Result<(VoteOutcome, String), AppError> {
        let mut result = None;
        let found = self
            .store
            .update(poll_id, &mut |poll: &mut Poll| {
                result = Some(
                    poll.record_vote(user_id, option)
                        .map(|outcome| (outcome, poll.options[option].clone())),
                );
            })
            .await;

        match result {
            Some(result) if found => Ok(result?),
            _ => Err(CommandError::PollNotFound.into()),
        }
    }

    /// Ends a poll early. Only the author or a member with MANAGE_MESSAGES may.
    pub async fn end(&self, poll_id: u64, actor: PollActor) -> Result<PollResults, AppError> {
        let poll = self
            .store
            .get(poll_id)
            .await
            .filter(|poll| poll.guild_id == actor.guild_id)
            .ok_or(CommandError::PollNotFound)?;

        if poll.author_id != actor.user_id && !actor.can_manage_messages {
            return Err(CommandError::NotPollOwner.into());
        }

        self.finish(poll.id)
            .await?
            .ok_or_else(|| CommandError::PollNotFound.into())
    }

    /// Removes a poll from the store, tallies it and replaces its message with
    /// the results.
    ///
    /// Returns `Ok(None)` when the poll was already ended. Removal comes first so
    /// a concurrent end or vote sees the poll as gone.
    async fn finish(&self, poll_id: u64) -> Result<Option<PollResults>, AppError> {
        let Some(poll) = self.store.delete(poll_id).await else {
            return Ok(None);
        };

        let results = match poll.mode {
            PollMode::Reactions => {
                let reactions = self
                    .discord
                    .reaction_counts(poll.channel_id, poll.id)
                    .await?;
                tally::tally_reactions(&poll, &reactions)
            }
            PollMode::Buttons => tally::tally_buttons(&poll),
        };

        self.discord
            .edit_message(
                poll.channel_id,
                poll.id,
                OutgoingMessage::new().embed(results_embed(&results)),
            )
            .await?;

        tracing::info!(poll_id = poll.id, total = results.total, "Ended poll");

        Ok(Some(results))
    }

    /// Ends the poll after `duration` unless it was ended by hand first.
    fn schedule_auto_end(&self, poll_id: u64, duration: chrono::Duration) {
        let service = self.clone();
        let delay = duration.to_std().unwrap_or_default();

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            if let Err(e) = service.finish(poll_id).await {
                tracing::warn!(poll_id, "Failed to auto-end poll: {}", e);
            }
        });
    }
}

/// Parses the option index out of a `poll:vote:<index>` custom id.
pub fn parse_vote_custom_id(custom_id: &str) -> Option<usize> {
    custom_id.strip_prefix(VOTE_BUTTON_PREFIX)?.parse().ok()
}

fn poll_embed(
    question: &str,
    options: &[String],
    mode: PollMode,
    author_id: u64,
    ends_at: Option<chrono::DateTime<Utc>>,
) -> serenity::all::CreateEmbed {
    let lines: Vec<String> = options
        .iter()
        .enumerate()
        .map(|(i, option)| format!("{} {}", OPTION_EMOJIS[i], option))
        .collect();

    let how = match mode {
        PollMode::Reactions => "React to vote.",
        PollMode::Buttons => "Click a button to vote. Voting again changes your vote.",
    };

    let mut embed = primary_embed()
        .title(format!("📊 {}", truncate(question, 240)))
        .description(format!("{}\n\n{}", lines.join("\n"), how))
        .field("Started by", format!("<@{}>", author_id), true);
    if let Some(ends_at) = ends_at {
        embed = embed.field("Ends", format!("<t:{}:R>", ends_at.timestamp()), true);
    }
    embed
}

fn vote_buttons(options: &[String]) -> Vec<CreateActionRow> {
    let votes = options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            CreateButton::new(format!("{}{}", VOTE_BUTTON_PREFIX, i))
                .label(truncate(option, 80))
                .emoji(ReactionType::Unicode(OPTION_EMOJIS[i].to_string()))
                .style(ButtonStyle::Primary)
        })
        .collect();
    let end = CreateButton::new(END_BUTTON_ID)
        .label("End poll")
        .style(ButtonStyle::Danger);

    vec![
        CreateActionRow::Buttons(votes),
        CreateActionRow::Buttons(vec![end]),
    ]
}

/// Results embed that replaces a finished poll.
pub fn results_embed(results: &PollResults) -> serenity::all::CreateEmbed {
    let lines: Vec<String> = results
        .options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            format!(
                "{} {}: **{}** vote{} ({:.1}%)",
                OPTION_EMOJIS[i],
                option.option,
                option.votes,
                if option.votes == 1 { "" } else { "s" },
                option.percent
            )
        })
        .collect();

    let verdict = match results.winners.as_slice() {
        [] => "No votes were cast.".to_string(),
        [winner] => format!("Winner: **{}**", results.options[*winner].option),
        tied => format!(
            "Tie between {}",
            tied.iter()
                .map(|i| format!("**{}**", results.options[*i].option))
                .collect::<Vec<_>>()
                .join(", ")
        ),
    };

    success_embed()
        .title(format!("📊 {} (ended)", truncate(&results.question, 230)))
        .description(format!("{}\n\n{}", lines.join("\n"), verdict))
        .field("Total votes", results.total.to_string(), true)
}
