//! Warning factory for creating test moderation warnings.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

use crate::factory::helpers::next_id;

/// Factory for creating test warnings with customizable fields.
pub struct WarningFactory<'a> {
    db: &'a DatabaseConnection,
    guild_id: String,
    user_id: String,
    moderator_id: String,
    reason: String,
}

impl<'a> WarningFactory<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            guild_id: next_id().to_string(),
            user_id: next_id().to_string(),
            moderator_id: next_id().to_string(),
            reason: "Test warning".to_string(),
        }
    }

    pub fn guild_id(mut self, guild_id: impl Into<String>) -> Self {
        self.guild_id = guild_id.into();
        self
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub async fn build(self) -> Result<entity::warning::Model, DbErr> {
        entity::warning::ActiveModel {
            id: ActiveValue::NotSet,
            guild_id: ActiveValue::Set(self.guild_id),
            user_id: ActiveValue::Set(self.user_id),
            moderator_id: ActiveValue::Set(self.moderator_id),
            reason: ActiveValue::Set(self.reason),
            created_at: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a warning for `user_id` in `guild_id`.
pub async fn create_warning(
    db: &DatabaseConnection,
    guild_id: &str,
    user_id: &str,
) -> Result<entity::warning::Model, DbErr> {
    WarningFactory::new(db)
        .guild_id(guild_id)
        .user_id(user_id)
        .build()
        .await
}
