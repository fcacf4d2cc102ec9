use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter,
};

use crate::server::{
    model::guild_settings::{GuildSettings, UpdateGuildSettingsParam},
    util::parse::id_list_to_json,
};

pub struct GuildSettingsRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> GuildSettingsRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds the settings row for a guild.
    pub async fn find_by_guild_id(&self, guild_id: u64) -> Result<Option<GuildSettings>, DbErr> {
        entity::prelude::GuildSettings::find()
            .filter(entity::guild_settings::Column::GuildId.eq(guild_id.to_string()))
            .one(self.db)
            .await?
            .map(GuildSettings::from_entity)
            .transpose()
    }

    /// Inserts default settings for a guild.
    ///
    /// Fails with a unique constraint error if the guild already has a row;
    /// callers wanting get-or-create semantics should use
    /// [`GuildSettingsService::get_or_create`](crate::server::service::guild_settings::GuildSettingsService::get_or_create).
    pub async fn create_default(
        &self,
        guild_id: u64,
        prefix: &str,
    ) -> Result<GuildSettings, DbErr> {
        let now = Utc::now();

        let model = entity::guild_settings::ActiveModel {
            guild_id: ActiveValue::Set(guild_id.to_string()),
            prefix: ActiveValue::Set(prefix.to_string()),
            log_channel_id: ActiveValue::Set(None),
            log_message_delete: ActiveValue::Set(false),
            log_message_edit: ActiveValue::Set(false),
            log_member_join: ActiveValue::Set(false),
            log_member_leave: ActiveValue::Set(false),
            log_moderation: ActiveValue::Set(true),
            automod_enabled: ActiveValue::Set(false),
            anti_invite: ActiveValue::Set(false),
            anti_link: ActiveValue::Set(false),
            max_mentions: ActiveValue::Set(0),
            banned_words: ActiveValue::Set(serde_json::json!([])),
            welcome_channel_id: ActiveValue::Set(None),
            welcome_message: ActiveValue::Set(None),
            mod_role_ids: ActiveValue::Set(serde_json::json!([])),
            automod_exempt_role_ids: ActiveValue::Set(serde_json::json!([])),
            disabled_channel_ids: ActiveValue::Set(serde_json::json!([])),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        GuildSettings::from_entity(model)
    }

    /// Applies a partial update to an existing settings row.
    ///
    /// # Returns
    /// - `Ok(GuildSettings)` - The updated settings
    /// - `Err(DbErr::RecordNotFound)` - The guild has no settings row
    pub async fn update(
        &self,
        guild_id: u64,
        param: UpdateGuildSettingsParam,
    ) -> Result<GuildSettings, DbErr> {
        let existing = entity::prelude::GuildSettings::find()
            .filter(entity::guild_settings::Column::GuildId.eq(guild_id.to_string()))
            .one(self.db)
            .await?
            .ok_or_else(|| {
                DbErr::RecordNotFound(format!("Guild settings for {} not found", guild_id))
            })?;

        let mut active: entity::guild_settings::ActiveModel = existing.into();

        if let Some(prefix) = param.prefix {
            active.prefix = ActiveValue::Set(prefix);
        }
        if let Some(channel) = param.log_channel_id {
            active.log_channel_id = ActiveValue::Set(channel.map(|id| id.to_string()));
        }
        if let Some(logging) = param.logging {
            active.log_message_delete = ActiveValue::Set(logging.message_delete);
            active.log_message_edit = ActiveValue::Set(logging.message_edit);
            active.log_member_join = ActiveValue::Set(logging.member_join);
            active.log_member_leave = ActiveValue::Set(logging.member_leave);
            active.log_moderation = ActiveValue::Set(logging.moderation);
        }
        if let Some(automod) = param.automod {
            active.automod_enabled = ActiveValue::Set(automod.enabled);
            active.anti_invite = ActiveValue::Set(automod.anti_invite);
            active.anti_link = ActiveValue::Set(automod.anti_link);
            active.max_mentions = ActiveValue::Set(automod.max_mentions.min(i32::MAX as u32) as i32);
            active.banned_words = ActiveValue::Set(serde_json::json!(automod.banned_words));
            active.automod_exempt_role_ids =
                ActiveValue::Set(id_list_to_json(&automod.exempt_role_ids));
        }
        if let Some(channel) = param.welcome_channel_id {
            active.welcome_channel_id = ActiveValue::Set(channel.map(|id| id.to_string()));
        }
        if let Some(message) = param.welcome_message {
            active.welcome_message = ActiveValue::Set(message);
        }
        if let Some(role_ids) = param.mod_role_ids {
            active.mod_role_ids = ActiveValue::Set(id_list_to_json(&role_ids));
        }
        if let Some(channel_ids) = param.disabled_channel_ids {
            active.disabled_channel_ids = ActiveValue::Set(id_list_to_json(&channel_ids));
        }
        active.updated_at = ActiveValue::Set(Utc::now());

        let model = active.update(self.db).await?;

        GuildSettings::from_entity(model)
    }
}
