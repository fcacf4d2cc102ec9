use std::sync::atomic::{AtomicBool, Ordering};

use serenity::all::{
    CommandInteraction, Context, CreateAttachment, CreateEmbed,
    CreateInteractionResponse, CreateInteractionResponseFollowup,
    CreateInteractionResponseMessage, CreateMessage, Http, Message, Permissions,
};

use crate::server::{
    discord::embed::base_embed,
    error::{command::CommandError, AppError},
    service::{poll::PollActor, ticket::TicketActor},
    state::AppState,
};

/// Where a command came from.
#[derive(Clone, Copy)]
pub enum CommandSource<'a> {
    Slash(&'a CommandInteraction),
    Prefix(&'a Message),
}

/// The member running a command.
#[derive(Debug, Clone, PartialEq)]
pub struct Caller {
    pub user_id: u64,
    pub name: String,
    pub role_ids: Vec<u64>,
    /// Guild permissions; empty in DMs.
    pub permissions: Permissions,
    pub is_owner: bool,
}

impl Caller {
    pub fn ticket_actor(&self) -> TicketActor<'_> {
        TicketActor {
            user_id: self.user_id,
            name: &self.name,
            role_ids: &self.role_ids,
            permissions: self.permissions,
        }
    }

    pub fn poll_actor(&self, guild_id: Option<u64>) -> PollActor {
        PollActor {
            user_id: self.user_id,
            guild_id,
            can_manage_messages: self.permissions.administrator()
                || self.permissions.manage_messages(),
        }
    }
}

/// A response to a command or component interaction.
#[derive(Default)]
pub struct Reply {
    pub content: Option<String>,
    pub embeds: Vec<CreateEmbed>,
    /// Only the caller sees the reply. Ignored for prefix commands.
    pub ephemeral: bool,
    pub attachment: Option<(String, Vec<u8>)>,
}

impl Reply {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::new().content(content)
    }

    pub fn embed_only(embed: CreateEmbed) -> Self {
        Self::new().embed(embed)
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn embed(mut self, embed: CreateEmbed) -> Self {
        self.embeds.push(embed);
        self
    }

    pub fn ephemeral(mut self) -> Self {
        self.ephemeral = true;
        self
    }

    pub fn attachment(mut self, filename: impl Into<String>, data: Vec<u8>) -> Self {
        self.attachment = Some((filename.into(), data));
        self
    }

    pub fn into_response_message(self) -> CreateInteractionResponseMessage {
        let mut message = CreateInteractionResponseMessage::new()
            .embeds(self.embeds)
            .ephemeral(self.ephemeral);
        if let Some(content) = self.content {
            message = message.content(content);
        }
        if let Some((filename, data)) = self.attachment {
            message = message.add_file(CreateAttachment::bytes(data, filename));
        }
        message
    }

    pub fn into_followup(self) -> CreateInteractionResponseFollowup {
        let mut message = CreateInteractionResponseFollowup::new()
            .embeds(self.embeds)
            .ephemeral(self.ephemeral);
        if let Some(content) = self.content {
            message = message.content(content);
        }
        if let Some((filename, data)) = self.attachment {
            message = message.add_file(CreateAttachment::bytes(data, filename));
        }
        message
    }

    fn into_message(self, reference: &Message) -> CreateMessage {
        let mut message = CreateMessage::new()
            .embeds(self.embeds)
            .reference_message(reference);
        if let Some(content) = self.content {
            message = message.content(content);
        }
        if let Some((filename, data)) = self.attachment {
            message = message.add_file(CreateAttachment::bytes(data, filename));
        }
        message
    }
}

/// Everything a command needs while it runs.
pub struct CommandContext<'a> {
    pub state: &'a AppState,
    pub serenity: &'a Context,
    pub source: CommandSource<'a>,
    pub guild_id: Option<u64>,
    pub channel_id: u64,
    pub caller: Caller,
    /// Prefix in effect for the guild, used in help and usage text.
    pub prefix: String,
    acknowledged: AtomicBool,
}

impl<'a> CommandContext<'a> {
    pub fn new(
        state: &'a AppState,
        serenity: &'a Context,
        source: CommandSource<'a>,
        guild_id: Option<u64>,
        channel_id: u64,
        caller: Caller,
        prefix: String,
    ) -> Self {
        Self {
            state,
            serenity,
            source,
            guild_id,
            channel_id,
            caller,
            prefix,
            acknowledged: AtomicBool::new(false),
        }
    }

    pub fn http(&self) -> &Http {
        &self.serenity.http
    }

    pub fn require_guild(&self) -> Result<u64, CommandError> {
        self.guild_id.ok_or(CommandError::GuildOnly)
    }

    /// Base embed in the configured color.
    pub async fn embed(&self) -> CreateEmbed {
        base_embed(self.state.presence.embed_color().await)
    }

    pub fn ticket_actor(&self) -> TicketActor<'_> {
        self.caller.ticket_actor()
    }

    pub fn poll_actor(&self) -> PollActor {
        self.caller.poll_actor(self.guild_id)
    }

    /// Acknowledges a slash command before slow work. Prefix commands show typing instead.
    pub async fn defer(&self, ephemeral: bool) -> Result<(), AppError> {
        match self.source {
            CommandSource::Slash(interaction) => {
                if self.acknowledged.swap(true, Ordering::SeqCst) {
                    return Ok(());
                }
                let response = CreateInteractionResponse::Defer(
                    CreateInteractionResponseMessage::new().ephemeral(ephemeral),
                );
                interaction.create_response(self.http(), response).await?;
            }
            CommandSource::Prefix(message) => {
                message.channel_id.broadcast_typing(self.http()).await?;
            }
        }
        Ok(())
    }

    /// Sends a reply. For slash commands the first reply answers the
    /// interaction and later ones are follow-ups.
    pub async fn reply(&self, reply: Reply) -> Result<(), AppError> {
        match self.source {
            CommandSource::Slash(interaction) => {
                if self.acknowledged.swap(true, Ordering::SeqCst) {
                    interaction
                        .create_followup(self.http(), reply.into_followup())
                        .await?;
                } else {
                    interaction
                        .create_response(
                            self.http(),
                            CreateInteractionResponse::Message(reply.into_response_message()),
                        )
                        .await?;
                }
            }
            CommandSource::Prefix(message) => {
                message
                    .channel_id
                    .send_message(self.http(), reply.into_message(message))
                    .await?;
            }
        }
        Ok(())
    }
}
