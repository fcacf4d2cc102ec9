//! Guild settings factory for creating test settings records.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

use crate::factory::helpers::next_id;

/// Factory for creating test guild settings with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// let settings = GuildSettingsFactory::new(&db)
///     .guild_id("987654321")
///     .prefix("?")
///     .automod_enabled(true)
///     .build()
///     .await?;
/// ```
pub struct GuildSettingsFactory<'a> {
    db: &'a DatabaseConnection,
    guild_id: String,
    prefix: String,
    log_channel_id: Option<String>,
    automod_enabled: bool,
    banned_words: Vec<String>,
    mod_role_ids: Vec<String>,
}

impl<'a> GuildSettingsFactory<'a> {
    /// Creates a new factory with default values.
    ///
    /// Defaults:
    /// - guild_id: unique counter value
    /// - prefix: `"!"`
    /// - everything else disabled or empty
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            guild_id: next_id().to_string(),
            prefix: "!".to_string(),
            log_channel_id: None,
            automod_enabled: false,
            banned_words: Vec::new(),
            mod_role_ids: Vec::new(),
        }
    }

    pub fn guild_id(mut self, guild_id: impl Into<String>) -> Self {
        self.guild_id = guild_id.into();
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn log_channel_id(mut self, channel_id: Option<String>) -> Self {
        self.log_channel_id = channel_id;
        self
    }

    pub fn automod_enabled(mut self, enabled: bool) -> Self {
        self.automod_enabled = enabled;
        self
    }

    pub fn banned_words(mut self, words: Vec<String>) -> Self {
        self.banned_words = words;
        self
    }

    pub fn mod_role_ids(mut self, role_ids: Vec<String>) -> Self {
        self.mod_role_ids = role_ids;
        self
    }

    /// Builds and inserts the settings entity into the database.
    ///
    /// # Returns
    /// - `Ok(entity::guild_settings::Model)` - Created settings entity
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::guild_settings::Model, DbErr> {
        let now = Utc::now();

        entity::guild_settings::ActiveModel {
            id: ActiveValue::NotSet,
            guild_id: ActiveValue::Set(self.guild_id),
            prefix: ActiveValue::Set(self.prefix),
            log_channel_id: ActiveValue::Set(self.log_channel_id),
            log_message_delete: ActiveValue::Set(false),
            log_message_edit: ActiveValue::Set(false),
            log_member_join: ActiveValue::Set(false),
            log_member_leave: ActiveValue::Set(false),
            log_moderation: ActiveValue::Set(true),
            automod_enabled: ActiveValue::Set(self.automod_enabled),
            anti_invite: ActiveValue::Set(false),
            anti_link: ActiveValue::Set(false),
            max_mentions: ActiveValue::Set(0),
            banned_words: ActiveValue::Set(serde_json::json!(self.banned_words)),
            welcome_channel_id: ActiveValue::Set(None),
            welcome_message: ActiveValue::Set(None),
            mod_role_ids: ActiveValue::Set(serde_json::json!(self.mod_role_ids)),
            automod_exempt_role_ids: ActiveValue::Set(serde_json::json!([])),
            disabled_channel_ids: ActiveValue::Set(serde_json::json!([])),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        }
        .insert(self.db)
        .await
    }
}

/// Creates guild settings with default values for the given guild.
///
/// Shorthand for `GuildSettingsFactory::new(db).guild_id(guild_id).build().await`.
pub async fn create_guild_settings(
    db: &DatabaseConnection,
    guild_id: &str,
) -> Result<entity::guild_settings::Model, DbErr> {
    GuildSettingsFactory::new(db).guild_id(guild_id).build().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TestBuilder;
    use entity::prelude::*;

    #[tokio::test]
    async fn creates_settings_with_defaults() -> Result<(), DbErr> {
        let test = TestBuilder::new()
            .with_table(GuildSettings)
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();

        let settings = create_guild_settings(db, "42").await?;

        assert_eq!(settings.guild_id, "42");
        assert_eq!(settings.prefix, "!");
        assert!(!settings.automod_enabled);
        assert_eq!(settings.banned_words, serde_json::json!([]));

        Ok(())
    }
}
