use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;
use serde_json::Value;

use crate::server::{
    discord::connector::{
        AccessTarget, ChannelAccess, ChannelMessage, DiscordConnector, FileAttachment,
        NewChannel, OutgoingMessage, ReactionCount,
    },
    error::AppError,
};

#[derive(Debug, Clone)]
pub struct FakeChannel {
    pub guild_id: u64,
    pub name: String,
    pub parent_id: Option<u64>,
    pub topic: Option<String>,
    pub access: Vec<ChannelAccess>,
}

/// A message as recorded by the fake, with builders flattened to JSON.
#[derive(Debug, Clone)]
pub struct RecordedMessage {
    pub channel_id: u64,
    pub message_id: u64,
    pub content: Option<String>,
    pub embeds: Vec<Value>,
    pub components: Vec<Value>,
    pub attachment: Option<FileAttachment>,
}

impl RecordedMessage {
    fn from_outgoing(channel_id: u64, message_id: u64, message: OutgoingMessage) -> Self {
        Self {
            channel_id,
            message_id,
            content: message.content,
            embeds: message
                .embeds
                .iter()
                .map(|e| serde_json::to_value(e).unwrap_or(Value::Null))
                .collect(),
            components: message
                .components
                .iter()
                .map(|c| serde_json::to_value(c).unwrap_or(Value::Null))
                .collect(),
            attachment: message.attachment,
        }
    }

    /// Every button custom id across all rows.
    pub fn custom_ids(&self) -> Vec<String> {
        self.components
            .iter()
            .filter_map(|row| row.get("components").and_then(Value::as_array))
            .flatten()
            .filter_map(|c| c.get("custom_id").and_then(Value::as_str))
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct FakeState {
    next_id: u64,
    pub channels: HashMap<u64, FakeChannel>,
    pub deleted_channels: Vec<u64>,
    /// Channel history, oldest first.
    pub history: HashMap<u64, Vec<ChannelMessage>>,
    pub sent: Vec<RecordedMessage>,
    pub dms: Vec<(u64, RecordedMessage)>,
    pub edits: Vec<RecordedMessage>,
    pub reactions: HashMap<u64, Vec<ReactionCount>>,
    pub fail_dms: bool,
}

impl FakeState {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        1_000 + self.next_id
    }
}

/// In-memory [`DiscordConnector`] that records every call.
#[derive(Debug, Default)]
pub struct FakeConnector {
    state: Mutex<FakeState>,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    /// Registers an existing channel so overwrite calls against it succeed.
    pub fn add_channel(&self, channel_id: u64, guild_id: u64) {
        self.state().channels.insert(
            channel_id,
            FakeChannel {
                guild_id,
                name: format!("channel-{}", channel_id),
                parent_id: None,
                topic: None,
                access: Vec::new(),
            },
        );
    }

    /// Sets the history returned by `fetch_messages`, given oldest first.
    pub fn set_history(&self, channel_id: u64, messages: Vec<ChannelMessage>) {
        self.state().history.insert(channel_id, messages);
    }

    pub fn sent_to(&self, channel_id: u64) -> Vec<RecordedMessage> {
        self.state()
            .sent
            .iter()
            .filter(|m| m.channel_id == channel_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl DiscordConnector for FakeConnector {
    async fn create_text_channel(
        &self,
        guild_id: u64,
        channel: NewChannel,
    ) -> Result<u64, AppError> {
        let mut state = self.state();
        let id = state.next_id();
        state.channels.insert(
            id,
            FakeChannel {
                guild_id,
                name: channel.name,
                parent_id: channel.parent_id,
                topic: channel.topic,
                access: channel.access,
            },
        );
        Ok(id)
    }

    async fn delete_channel(&self, channel_id: u64) -> Result<bool, AppError> {
        let mut state = self.state();
        let existed = state.channels.remove(&channel_id).is_some();
        if existed {
            state.deleted_channels.push(channel_id);
        }
        Ok(existed)
    }

    async fn set_channel_access(
        &self,
        channel_id: u64,
        access: ChannelAccess,
    ) -> Result<(), AppError> {
        let mut state = self.state();
        let channel = state
            .channels
            .get_mut(&channel_id)
            .ok_or_else(|| AppError::NotFound(format!("Unknown channel {}", channel_id)))?;
        channel.access.retain(|a| a.target != access.target);
        channel.access.push(access);
        Ok(())
    }

    async fn remove_channel_access(
        &self,
        channel_id: u64,
        target: AccessTarget,
    ) -> Result<(), AppError> {
        let mut state = self.state();
        let channel = state
            .channels
            .get_mut(&channel_id)
            .ok_or_else(|| AppError::NotFound(format!("Unknown channel {}", channel_id)))?;
        channel.access.retain(|a| a.target != target);
        Ok(())
    }

    async fn fetch_messages(
        &self,
        channel_id: u64,
        limit: u8,
    ) -> Result<Vec<ChannelMessage>, AppError> {
        let state = self.state();
        let history = state.history.get(&channel_id).cloned().unwrap_or_default();
        Ok(history.into_iter().rev().take(limit as usize).collect())
    }

    async fn send_message(
        &self,
        channel_id: u64,
        message: OutgoingMessage,
    ) -> Result<u64, AppError> {
        let mut state = self.state();
        let id = state.next_id();
        state
            .sent
            .push(RecordedMessage::from_outgoing(channel_id, id, message));
        Ok(id)
    }

    async fn send_dm(&self, user_id: u64, message: OutgoingMessage) -> Result<(), AppError> {
        let mut state = self.state();
        if state.fail_dms {
            return Err(AppError::BadRequest("Cannot send messages to this user".to_string()));
        }
        let id = state.next_id();
        state
            .dms
            .push((user_id, RecordedMessage::from_outgoing(0, id, message)));
        Ok(())
    }

    async fn edit_message(
        &self,
        channel_id: u64,
        message_id: u64,
        message: OutgoingMessage,
    ) -> Result<(), AppError> {
        self.state()
            .edits
            .push(RecordedMessage::from_outgoing(channel_id, message_id, message));
        Ok(())
    }

    async fn add_reaction(
        &self,
        _channel_id: u64,
        message_id: u64,
        emoji: &str,
    ) -> Result<(), AppError> {
        let mut state = self.state();
        let reactions = state.reactions.entry(message_id).or_default();
        match reactions.iter_mut().find(|r| r.emoji == emoji) {
            Some(existing) if !existing.me => {
                existing.count += 1;
                existing.me = true;
            }
            Some(_) => {}
            None => reactions.push(ReactionCount {
                emoji: emoji.to_string(),
                count: 1,
                me: true,
            }),
        }
        Ok(())
    }

    async fn reaction_counts(
        &self,
        _channel_id: u64,
        message_id: u64,
    ) -> Result<Vec<ReactionCount>, AppError> {
        Ok(self
            .state()
            .reactions
            .get(&message_id)
            .cloned()
            .unwrap_or_default())
    }
}
