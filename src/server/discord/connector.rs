use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serenity::all::{CreateActionRow, CreateEmbed, Permissions};

use crate::server::error::AppError;

/// A message read back from a channel, reduced to what transcripts need.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelMessage {
    pub id: u64,
    pub author_id: u64,
    pub author_name: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Attachment URLs.
    pub attachments: Vec<String>,
    pub bot: bool,
}

/// Reaction total for one emoji on a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionCount {
    pub emoji: String,
    pub count: u64,
    /// Whether the bot itself is among the reactors.
    pub me: bool,
}

/// Who a permission overwrite applies to. `@everyone` is the role whose id equals the guild id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessTarget {
    Member(u64),
    Role(u64),
}

/// A channel permission overwrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelAccess {
    pub target: AccessTarget,
    pub allow: Permissions,
    pub deny: Permissions,
}

/// Parameters for a new guild text channel.
#[derive(Debug, Clone, PartialEq)]
pub struct NewChannel {
    pub name: String,
    pub parent_id: Option<u64>,
    pub topic: Option<String>,
    pub access: Vec<ChannelAccess>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttachment {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Content for a new or edited message.
///
/// When editing, `components` replaces the existing rows, so an empty list
/// removes every button.
#[derive(Debug, Clone, Default)]
pub struct OutgoingMessage {
    pub content: Option<String>,
    pub embeds: Vec<CreateEmbed>,
    pub components: Vec<CreateActionRow>,
    pub attachment: Option<FileAttachment>,
}

impl OutgoingMessage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn embed(mut self, embed: CreateEmbed) -> Self {
        self.embeds.push(embed);
        self
    }

    pub fn components(mut self, components: Vec<CreateActionRow>) -> Self {
        self.components = components;
        self
    }

    pub fn attachment(mut self, filename: impl Into<String>, data: Vec<u8>) -> Self {
        self.attachment = Some(FileAttachment {
            filename: filename.into(),
            data,
        });
        self
    }
}

/// The Discord operations the ticket and poll workflows need.
#[async_trait]
pub trait DiscordConnector: Send + Sync {
    /// Creates a text channel and returns its id.
    async fn create_text_channel(&self, guild_id: u64, channel: NewChannel)
        -> Result<u64, AppError>;

    /// Deletes a channel.
    ///
    /// # Returns
    /// - `Ok(true)` - The channel was deleted
    /// - `Ok(false)` - The channel no longer existed
    /// - `Err(AppError)` - Any other Discord failure
    async fn delete_channel(&self, channel_id: u64) -> Result<bool, AppError>;

    /// Creates or replaces a permission overwrite on a channel.
    async fn set_channel_access(&self, channel_id: u64, access: ChannelAccess)
        -> Result<(), AppError>;

    /// Removes the overwrite for `target` from a channel.
    async fn remove_channel_access(&self, channel_id: u64, target: AccessTarget)
        -> Result<(), AppError>;

    /// Fetches up to `limit` of the most recent messages, newest first.
    async fn fetch_messages(&self, channel_id: u64, limit: u8)
        -> Result<Vec<ChannelMessage>, AppError>;

    /// Posts a message and returns its id.
    async fn send_message(&self, channel_id: u64, message: OutgoingMessage)
        -> Result<u64, AppError>;

    /// Sends a direct message to a user.
    async fn send_dm(&self, user_id: u64, message: OutgoingMessage) -> Result<(), AppError>;

    async fn edit_message(
        &self,
        channel_id: u64,
        message_id: u64,
        message: OutgoingMessage,
    ) -> Result<(), AppError>;

    /// Adds a unicode emoji reaction as the bot.
    async fn add_reaction(&self, channel_id: u64, message_id: u64, emoji: &str)
        -> Result<(), AppError>;

    /// Reads the reaction totals of a message.
    async fn reaction_counts(&self, channel_id: u64, message_id: u64)
        -> Result<Vec<ReactionCount>, AppError>;
}
