pub mod message;
pub mod transcript;

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::DatabaseConnection;
use serenity::all::Permissions;

use crate::server::{
    data::{ticket::TicketRepository, ticket_config::TicketConfigRepository},
    discord::connector::{AccessTarget, ChannelAccess, DiscordConnector, NewChannel},
    error::{command::CommandError, AppError},
    model::{
        ticket::{CreateTicketParam, Ticket, TicketStatus},
        ticket_config::TicketConfig,
    },
    service::ticket_config::TicketConfigService,
};

use self::transcript::{build_transcript, transcript_filename, TranscriptHeader, TRANSCRIPT_MESSAGE_LIMIT};

/// Permissions granted to the opener and support roles inside a ticket channel.
pub fn ticket_member_permissions() -> Permissions {
    Permissions::VIEW_CHANNEL
        | Permissions::SEND_MESSAGES
        | Permissions::READ_MESSAGE_HISTORY
        | Permissions::ATTACH_FILES
        | Permissions::EMBED_LINKS
}

/// Whoever is acting on a ticket.
#[derive(Debug, Clone, Copy)]
pub struct TicketActor<'a> {
    pub user_id: u64,
    pub name: &'a str,
    pub role_ids: &'a [u64],
    /// Guild-level permissions of the actor.
    pub permissions: Permissions,
}

impl TicketActor<'_> {
    /// Support roles, MANAGE_CHANNELS and ADMINISTRATOR all count as staff.
    pub fn is_staff(&self, config: &TicketConfig) -> bool {
        self.permissions.administrator()
            || self.permissions.manage_channels()
            || config.is_support_role(self.role_ids)
    }
}

pub struct OpenTicket<'a> {
    pub guild_id: u64,
    pub category: Option<&'a str>,
    pub subject: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CloseOutcome {
    /// The channel and record were removed.
    Deleted {
        ticket: Ticket,
        /// False when the channel was already gone.
        channel_existed: bool,
    },
    /// The record was marked closed and the channel locked for the opener.
    Locked(Ticket),
}

pub struct TicketService<'a> {
    db: &'a DatabaseConnection,
    discord: &'a dyn DiscordConnector,
}

impl<'a> TicketService<'a> {
    pub fn new(db: &'a DatabaseConnection, discord: &'a dyn DiscordConnector) -> Self {
        Self { db, discord }
    }

    /// Opens a new ticket for the actor.
    ///
    /// # Arguments
    /// - `request` - Guild, optional category key and subject
    /// - `actor` - The member opening the ticket
    ///
    /// # Returns
    /// - `Ok(Ticket)` - The created ticket, its channel holds the welcome message
    /// - `Err(AppError::CommandErr)` - Unknown category or the user's ticket limit is reached
    /// - `Err(AppError)` - Channel creation or database failure; nothing is rolled back
    pub async fn open(
        &self,
        request: OpenTicket<'_>,
        actor: TicketActor<'_>,
    ) -> Result<Ticket, AppError> {
        let ticket_repo = TicketRepository::new(self.db);
        let config_repo = TicketConfigRepository::new(self.db);

        let config = TicketConfigService::new(self.db)
            .get_or_create(request.guild_id)
            .await?;
        let (key, category) = config.resolve_category(request.category)?;

        let active = ticket_repo
            .count_active_by_user(request.guild_id, actor.user_id)
            .await?;
        if active >= config.max_tickets_per_user as u64 {
            return Err(CommandError::TicketLimitReached {
                max: config.max_tickets_per_user,
            }
            .into());
        }

        let number = config_repo.next_ticket_number(request.guild_id).await?;

        let mut access = vec![
            ChannelAccess {
                target: AccessTarget::Role(request.guild_id),
                allow: Permissions::empty(),
                deny: Permissions::VIEW_CHANNEL,
            },
            ChannelAccess {
                target: AccessTarget::Member(actor.user_id),
                allow: ticket_member_permissions(),
                deny: Permissions::empty(),
            },
        ];
        access.extend(config.support_role_ids.iter().map(|role_id| ChannelAccess {
            target: AccessTarget::Role(*role_id),
            allow: ticket_member_permissions(),
            deny: Permissions::empty(),
        }));

        let channel_id = self
            .discord
            .create_text_channel(
                request.guild_id,
                NewChannel {
                    name: Ticket::channel_name(number),
                    parent_id: config.parent_category_id,
                    topic: Some(format!(
                        "Ticket #{:04} · {} · opened by <@{}>",
                        number, category.name, actor.user_id
                    )),
                    access,
                },
            )
            .await?;

        let ticket = ticket_repo
            .create(CreateTicketParam {
                guild_id: request.guild_id,
                channel_id,
                user_id: actor.user_id,
                number,
                category: key,
                subject: request.subject.filter(|s| !s.trim().is_empty()),
            })
            .await?;

        self.discord
            .send_message(channel_id, message::welcome_message(&ticket, &category, &config))
            .await?;

        tracing::info!(
            guild_id = ticket.guild_id,
            number = ticket.number,
            user_id = ticket.user_id,
            "Opened ticket"
        );

        Ok(ticket)
    }

    /// Closes the ticket bound to `channel_id`.
    ///
    /// A transcript is posted to the transcript channel and sent to the opener,
    /// both best-effort. With `delete_on_close` the channel is deleted (a missing
    /// channel is fine) and the record removed; otherwise the ticket is marked
    /// closed and the opener loses send access.
    pub async fn close(
        &self,
        channel_id: u64,
        actor: TicketActor<'_>,
    ) -> Result<CloseOutcome, AppError> {
        let ticket = self.require_ticket(channel_id).await?;
        let config = TicketConfigService::new(self.db)
            .get_or_create(ticket.guild_id)
            .await?;
        self.authorize_opener_or_staff(&ticket, &config, &actor)?;
        ticket.status.transition(TicketStatus::Closed)?;

        let transcript = self.render_transcript(&ticket, actor.name).await;
        self.deliver_transcript(&ticket, &config, &transcript).await;

        let repo = TicketRepository::new(self.db);

        if config.delete_on_close {
            let channel_existed = self.discord.delete_channel(ticket.channel_id).await?;
            if !channel_existed {
                tracing::debug!(
                    channel_id = ticket.channel_id,
                    "Ticket channel was already deleted"
                );
            }
            repo.delete(ticket.id).await?;

            tracing::info!(
                guild_id = ticket.guild_id,
                number = ticket.number,
                closed_by = actor.user_id,
                "Closed and deleted ticket"
            );

            return Ok(CloseOutcome::Deleted {
                ticket,
                channel_existed,
            });
        }

        let ticket = repo.update_status(ticket.id, TicketStatus::Closed).await?;

        let locked = ChannelAccess {
            target: AccessTarget::Member(ticket.user_id),
            allow: Permissions::VIEW_CHANNEL | Permissions::READ_MESSAGE_HISTORY,
            deny: Permissions::SEND_MESSAGES,
        };
        if let Err(e) = self.discord.set_channel_access(ticket.channel_id, locked).await {
            tracing::warn!(channel_id = ticket.channel_id, "Failed to lock ticket channel: {}", e);
        }
        if let Err(e) = self
            .discord
            .send_message(ticket.channel_id, message::closed_message(&ticket, actor.user_id))
            .await
        {
            tracing::warn!(channel_id = ticket.channel_id, "Failed to post close notice: {}", e);
        }

        tracing::info!(
            guild_id = ticket.guild_id,
            number = ticket.number,
            closed_by = actor.user_id,
            "Closed ticket"
        );

        Ok(CloseOutcome::Locked(ticket))
    }

    /// Reopens a closed ticket and restores the opener's access.
    pub async fn reopen(&self, channel_id: u64, actor: TicketActor<'_>) -> Result<Ticket, AppError> {
        let ticket = self.require_ticket(channel_id).await?;
        let config = TicketConfigService::new(self.db)
            .get_or_create(ticket.guild_id)
            .await?;
        self.authorize_opener_or_staff(&ticket, &config, &actor)?;

        if ticket.status != TicketStatus::Closed {
            return Err(CommandError::InvalidStatusTransition {
                from: ticket.status.as_str().to_string(),
                to: TicketStatus::Open.as_str().to_string(),
            }
            .into());
        }
        ticket.status.transition(TicketStatus::Open)?;

        let ticket = TicketRepository::new(self.db)
            .update_status(ticket.id, TicketStatus::Open)
            .await?;

        self.discord
            .set_channel_access(
                ticket.channel_id,
                ChannelAccess {
                    target: AccessTarget::Member(ticket.user_id),
                    allow: ticket_member_permissions(),
                    deny: Permissions::empty(),
                },
            )
            .await?;
        self.discord
            .send_message(ticket.channel_id, message::reopened_message(&ticket, actor.user_id))
            .await?;

        Ok(ticket)
    }

    /// Assigns the ticket to the acting staff member, moving it to in progress when open.
    pub async fn claim(&self, channel_id: u64, actor: TicketActor<'_>) -> Result<Ticket, AppError> {
        let ticket = self.require_ticket(channel_id).await?;
        let config = TicketConfigService::new(self.db)
            .get_or_create(ticket.guild_id)
            .await?;
        self.authorize_staff(&config, &actor)?;

        if !ticket.status.is_active() {
            return Err(CommandError::InvalidStatusTransition {
                from: ticket.status.as_str().to_string(),
                to: TicketStatus::InProgress.as_str().to_string(),
            }
            .into());
        }

        let repo = TicketRepository::new(self.db);
        let mut ticket = repo.set_claimed_by(ticket.id, actor.user_id).await?;
        if ticket.status == TicketStatus::Open {
            ticket = repo.update_status(ticket.id, TicketStatus::InProgress).await?;
        }

        self.discord
            .send_message(ticket.channel_id, message::claimed_message(actor.user_id))
            .await?;

        Ok(ticket)
    }

    /// Moves a ticket to `status`. Closing goes through [`TicketService::close`].
    pub async fn set_status(
        &self,
        channel_id: u64,
        actor: TicketActor<'_>,
        status: TicketStatus,
    ) -> Result<Ticket, AppError> {
        if status == TicketStatus::Closed {
            return Err(CommandError::InvalidArgument {
                name: "status".to_string(),
                reason: "use `ticket close` to close a ticket".to_string(),
            }
            .into());
        }

        let ticket = self.require_ticket(channel_id).await?;
        let config = TicketConfigService::new(self.db)
            .get_or_create(ticket.guild_id)
            .await?;
        self.authorize_staff(&config, &actor)?;

        let next = ticket.status.transition(status)?;

        Ok(TicketRepository::new(self.db)
            .update_status(ticket.id, next)
            .await?)
    }

    /// Gives another member access to the ticket channel.
    pub async fn add_user(
        &self,
        channel_id: u64,
        actor: TicketActor<'_>,
        user_id: u64,
    ) -> Result<Ticket, AppError> {
        let ticket = self.require_ticket(channel_id).await?;
        let config = TicketConfigService::new(self.db)
            .get_or_create(ticket.guild_id)
            .await?;
        self.authorize_staff(&config, &actor)?;

        self.discord
            .set_channel_access(
                ticket.channel_id,
                ChannelAccess {
                    target: AccessTarget::Member(user_id),
                    allow: ticket_member_permissions(),
                    deny: Permissions::empty(),
                },
            )
            .await?;

        Ok(ticket)
    }

    /// Removes a member's access. The opener cannot be removed.
    pub async fn remove_user(
        &self,
        channel_id: u64,
        actor: TicketActor<'_>,
        user_id: u64,
    ) -> Result<Ticket, AppError> {
        let ticket = self.require_ticket(channel_id).await?;
        let config = TicketConfigService::new(self.db)
            .get_or_create(ticket.guild_id)
            .await?;
        self.authorize_staff(&config, &actor)?;

        if user_id == ticket.user_id {
            return Err(CommandError::InvalidArgument {
                name: "user".to_string(),
                reason: "the ticket opener cannot be removed".to_string(),
            }
            .into());
        }

        self.discord
            .remove_channel_access(ticket.channel_id, AccessTarget::Member(user_id))
            .await?;

        Ok(ticket)
    }

    /// Active tickets of a guild, ordered by number.
    pub async fn list_active(&self, guild_id: u64) -> Result<Vec<Ticket>, AppError> {
        Ok(TicketRepository::new(self.db)
            .get_active_by_guild(guild_id)
            .await?)
    }

    pub async fn get_by_channel(&self, channel_id: u64) -> Result<Ticket, AppError> {
        self.require_ticket(channel_id).await
    }

    pub async fn get_by_number(&self, guild_id: u64, number: i32) -> Result<Ticket, AppError> {
        TicketRepository::new(self.db)
            .find_by_number(guild_id, number)
            .await?
            .ok_or_else(|| CommandError::TicketNotFound(number).into())
    }

    /// Builds the transcript of a ticket channel on demand.
    ///
    /// # Returns
    /// - `Ok((Ticket, filename, transcript))`
    /// - `Err(AppError::CommandErr)` - Not a ticket channel, or the actor is neither opener nor staff
    pub async fn transcript(
        &self,
        channel_id: u64,
        actor: TicketActor<'_>,
    ) -> Result<(Ticket, String, String), AppError> {
        let ticket = self.require_ticket(channel_id).await?;
        let config = TicketConfigService::new(self.db)
            .get_or_create(ticket.guild_id)
            .await?;
        self.authorize_opener_or_staff(&ticket, &config, &actor)?;

        let messages = self
            .discord
            .fetch_messages(ticket.channel_id, TRANSCRIPT_MESSAGE_LIMIT)
            .await?;
        let text = build_transcript(
            &TranscriptHeader {
                ticket: &ticket,
                requested_by: actor.name,
                generated_at: Utc::now(),
            },
            &messages,
        );
        let filename = transcript_filename(&ticket);

        Ok((ticket, filename, text))
    }

    /// Ticket totals per status, for one guild or across all guilds.
    pub async fn count_by_status(
        &self,
        guild_id: Option<u64>,
    ) -> Result<HashMap<TicketStatus, u64>, AppError> {
        Ok(TicketRepository::new(self.db).count_by_status(guild_id).await?)
    }

    async fn require_ticket(&self, channel_id: u64) -> Result<Ticket, AppError> {
        TicketRepository::new(self.db)
            .find_by_channel_id(channel_id)
            .await?
            .ok_or_else(|| CommandError::NotATicketChannel.into())
    }

    fn authorize_staff(&self, config: &TicketConfig, actor: &TicketActor<'_>) -> Result<(), CommandError> {
        if actor.is_staff(config) {
            Ok(())
        } else {
            Err(CommandError::NotTicketStaff)
        }
    }

    fn authorize_opener_or_staff(
        &self,
        ticket: &Ticket,
        config: &TicketConfig,
        actor: &TicketActor<'_>,
    ) -> Result<(), CommandError> {
        if actor.user_id == ticket.user_id {
            return Ok(());
        }
        self.authorize_staff(config, actor)
    }

    /// Transcript used on close. A channel that cannot be read yields an empty history.
    async fn render_transcript(&self, ticket: &Ticket, requested_by: &str) -> String {
        let messages = match self
            .discord
            .fetch_messages(ticket.channel_id, TRANSCRIPT_MESSAGE_LIMIT)
            .await
        {
            Ok(messages) => messages,
            Err(e) => {
                tracing::warn!(
                    channel_id = ticket.channel_id,
                    "Failed to fetch ticket history: {}",
                    e
                );
                Vec::new()
            }
        };

        build_transcript(
            &TranscriptHeader {
                ticket,
                requested_by,
                generated_at: Utc::now(),
            },
            &messages,
        )
    }

    async fn deliver_transcript(&self, ticket: &Ticket, config: &TicketConfig, transcript: &str) {
        let filename = transcript_filename(ticket);

        if let Some(channel_id) = config.transcript_channel_id {
            let message = message::transcript_message(ticket, &filename, transcript);
            if let Err(e) = self.discord.send_message(channel_id, message).await {
                tracing::warn!(channel_id, "Failed to post ticket transcript: {}", e);
            }
        }

        let dm = message::transcript_message(ticket, &filename, transcript).content(format!(
            "Your ticket #{} has been closed. A transcript is attached.",
            ticket.padded_number()
        ));
        if let Err(e) = self.discord.send_dm(ticket.user_id, dm).await {
            tracing::debug!(user_id = ticket.user_id, "Could not DM ticket transcript: {}", e);
        }
    }
}
