use std::sync::atomic::AtomicBool;

use serenity::all::{
    ChannelId, Context, EventHandler, Guild, GuildChannel, GuildId, Interaction, Member, Message,
    MessageId, MessageUpdateEvent, Ready, UnavailableGuild, User,
};
use serenity::async_trait;

use crate::server::{bot::component::ComponentRouter, state::AppState};

pub mod channel;
pub mod guild;
pub mod interaction;
pub mod member;
pub mod message;
pub mod ready;

/// Discord bot event handler
pub struct Handler {
    pub state: AppState,
    pub components: ComponentRouter,
    /// Set once slash commands have been pushed; `ready` fires again on reconnect.
    commands_registered: AtomicBool,
}

impl Handler {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            components: ComponentRouter::builtin(),
            commands_registered: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    /// Called when a shard has connected and identified
    async fn ready(&self, ctx: Context, ready: Ready) {
        ready::handle_ready(&self.state, &self.commands_registered, ctx, ready).await;
    }

    /// Called when a guild becomes available or the bot joins a new guild
    async fn guild_create(&self, _ctx: Context, guild: Guild, _is_new: Option<bool>) {
        guild::handle_guild_create(&self.state, guild).await;
    }

    /// Called when the bot leaves a guild or it becomes unavailable
    async fn guild_delete(&self, _ctx: Context, incomplete: UnavailableGuild, _full: Option<Guild>) {
        guild::handle_guild_delete(&self.state, incomplete).await;
    }

    /// Called when a member joins a guild
    async fn guild_member_addition(&self, ctx: Context, new_member: Member) {
        member::handle_guild_member_addition(&self.state, ctx, new_member).await;
    }

    /// Called when a member leaves a guild
    async fn guild_member_removal(
        &self,
        _ctx: Context,
        guild_id: GuildId,
        user: User,
        _member_data_if_available: Option<Member>,
    ) {
        member::handle_guild_member_removal(&self.state, guild_id, user).await;
    }

    /// Called when a channel is created in a guild
    async fn channel_create(&self, _ctx: Context, channel: GuildChannel) {
        channel::handle_channel_create(&self.state, channel).await;
    }

    /// Called when a channel is deleted from a guild
    async fn channel_delete(
        &self,
        _ctx: Context,
        channel: GuildChannel,
        _messages: Option<Vec<Message>>,
    ) {
        channel::handle_channel_delete(&self.state, channel).await;
    }

    /// Called when a message is sent in a channel
    async fn message(&self, ctx: Context, message: Message) {
        message::handle_message(&self.state, ctx, message).await;
    }

    /// Called when a message is deleted
    async fn message_delete(
        &self,
        ctx: Context,
        channel_id: ChannelId,
        deleted_message_id: MessageId,
        guild_id: Option<GuildId>,
    ) {
        message::handle_message_delete(&self.state, ctx, channel_id, deleted_message_id, guild_id)
            .await;
    }

    /// Called when a message is edited
    async fn message_update(
        &self,
        _ctx: Context,
        old_if_available: Option<Message>,
        _new: Option<Message>,
        event: MessageUpdateEvent,
    ) {
        message::handle_message_update(&self.state, old_if_available, event).await;
    }

    /// Called for slash commands, autocomplete, buttons and modal submits
    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        interaction::handle_interaction(&self.state, &self.components, ctx, interaction).await;
    }
}
