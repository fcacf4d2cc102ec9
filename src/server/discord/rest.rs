use std::sync::Arc;

use async_trait::async_trait;
use serenity::{
    all::{
        ChannelId, ChannelType, CreateAttachment, CreateChannel, CreateMessage, EditMessage,
        GetMessages, GuildId, Message, MessageId, PermissionOverwrite, PermissionOverwriteType,
        ReactionType, RoleId, UserId,
    },
    http::Http,
};

use crate::server::{
    discord::connector::{
        AccessTarget, ChannelAccess, ChannelMessage, DiscordConnector, NewChannel,
        OutgoingMessage, ReactionCount,
    },
    error::AppError,
};

/// [`DiscordConnector`] backed by serenity's REST client.
#[derive(Clone)]
pub struct SerenityConnector {
    http: Arc<Http>,
}

impl SerenityConnector {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

fn overwrite_kind(target: AccessTarget) -> PermissionOverwriteType {
    match target {
        AccessTarget::Member(id) => PermissionOverwriteType::Member(UserId::new(id)),
        AccessTarget::Role(id) => PermissionOverwriteType::Role(RoleId::new(id)),
    }
}

fn to_overwrite(access: ChannelAccess) -> PermissionOverwrite {
    PermissionOverwrite {
        allow: access.allow,
        deny: access.deny,
        kind: overwrite_kind(access.target),
    }
}

fn is_not_found(err: &serenity::Error) -> bool {
    match err {
        serenity::Error::Http(http) => http.status_code().map(|s| s.as_u16()) == Some(404),
        _ => false,
    }
}

fn to_channel_message(message: Message) -> ChannelMessage {
    let author_name = message
        .author
        .global_name
        .clone()
        .unwrap_or_else(|| message.author.name.clone());

    ChannelMessage {
        id: message.id.get(),
        author_id: message.author.id.get(),
        author_name,
        content: message.content,
        timestamp: message.timestamp.to_utc(),
        attachments: message.attachments.into_iter().map(|a| a.url).collect(),
        bot: message.author.bot,
    }
}

fn to_create_message(message: OutgoingMessage) -> CreateMessage {
    let mut builder = CreateMessage::new()
        .embeds(message.embeds)
        .components(message.components);
    if let Some(content) = message.content {
        builder = builder.content(content);
    }
    if let Some(file) = message.attachment {
        builder = builder.add_file(CreateAttachment::bytes(file.data, file.filename));
    }
    builder
}

#[async_trait]
impl DiscordConnector for SerenityConnector {
    async fn create_text_channel(
        &self,
        guild_id: u64,
        channel: NewChannel,
    ) -> Result<u64, AppError> {
        let mut builder = CreateChannel::new(channel.name)
            .kind(ChannelType::Text)
            .permissions(channel.access.into_iter().map(to_overwrite));
        if let Some(parent_id) = channel.parent_id {
            builder = builder.category(ChannelId::new(parent_id));
        }
        if let Some(topic) = channel.topic {
            builder = builder.topic(topic);
        }

        let created = GuildId::new(guild_id)
            .create_channel(&self.http, builder)
            .await?;

        Ok(created.id.get())
    }

    async fn delete_channel(&self, channel_id: u64) -> Result<bool, AppError> {
        match ChannelId::new(channel_id).delete(&self.http).await {
            Ok(_) => Ok(true),
            Err(e) if is_not_found(&e) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn set_channel_access(
        &self,
        channel_id: u64,
        access: ChannelAccess,
    ) -> Result<(), AppError> {
        ChannelId::new(channel_id)
            .create_permission(&self.http, to_overwrite(access))
            .await?;

        Ok(())
    }

    async fn remove_channel_access(
        &self,
        channel_id: u64,
        target: AccessTarget,
    ) -> Result<(), AppError> {
        ChannelId::new(channel_id)
            .delete_permission(&self.http, overwrite_kind(target))
            .await?;

        Ok(())
    }

    async fn fetch_messages(
        &self,
        channel_id: u64,
        limit: u8,
    ) -> Result<Vec<ChannelMessage>, AppError> {
        let messages = ChannelId::new(channel_id)
            .messages(&self.http, GetMessages::new().limit(limit))
            .await?;

        Ok(messages.into_iter().map(to_channel_message).collect())
    }

    async fn send_message(
        &self,
        channel_id: u64,
        message: OutgoingMessage,
    ) -> Result<u64, AppError> {
        let sent = ChannelId::new(channel_id)
            .send_message(&self.http, to_create_message(message))
            .await?;

        Ok(sent.id.get())
    }

    async fn send_dm(&self, user_id: u64, message: OutgoingMessage) -> Result<(), AppError> {
        UserId::new(user_id)
            .direct_message(&self.http, to_create_message(message))
            .await?;

        Ok(())
    }

    async fn edit_message(
        &self,
        channel_id: u64,
        message_id: u64,
        message: OutgoingMessage,
    ) -> Result<(), AppError> {
        let mut builder = EditMessage::new()
            .embeds(message.embeds)
            .components(message.components);
        if let Some(content) = message.content {
            builder = builder.content(content);
        }

        ChannelId::new(channel_id)
            .edit_message(&self.http, MessageId::new(message_id), builder)
            .await?;

        Ok(())
    }

    async fn add_reaction(
        &self,
        channel_id: u64,
        message_id: u64,
        emoji: &str,
    ) -> Result<(), AppError> {
        ChannelId::new(channel_id)
            .create_reaction(
                &self.http,
                MessageId::new(message_id),
                ReactionType::Unicode(emoji.to_string()),
            )
            .await?;

        Ok(())
    }

    async fn reaction_counts(
        &self,
        channel_id: u64,
        message_id: u64,
    ) -> Result<Vec<ReactionCount>, AppError> {
        let message = ChannelId::new(channel_id)
            .message(&self.http, MessageId::new(message_id))
            .await?;

        Ok(message
            .reactions
            .into_iter()
            .map(|r| ReactionCount {
                emoji: r.reaction_type.to_string(),
                count: r.count,
                me: r.me,
            })
            .collect())
    }
}
