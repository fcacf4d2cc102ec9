use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::server::model::warning::{CreateWarningParam, Warning};

pub struct WarningRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> WarningRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a new warning.
    pub async fn create(&self, param: CreateWarningParam) -> Result<Warning, DbErr> {
        let model = entity::warning::ActiveModel {
            guild_id: ActiveValue::Set(param.guild_id.to_string()),
            user_id: ActiveValue::Set(param.user_id.to_string()),
            moderator_id: ActiveValue::Set(param.moderator_id.to_string()),
            reason: ActiveValue::Set(param.reason),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Warning::from_entity(model)
    }

    /// Gets a user's warnings in a guild, oldest first.
    pub async fn get_by_user(&self, guild_id: u64, user_id: u64) -> Result<Vec<Warning>, DbErr> {
        entity::prelude::Warning::find()
            .filter(entity::warning::Column::GuildId.eq(guild_id.to_string()))
            .filter(entity::warning::Column::UserId.eq(user_id.to_string()))
            .order_by_asc(entity::warning::Column::CreatedAt)
            .order_by_asc(entity::warning::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(Warning::from_entity)
            .collect()
    }

    pub async fn count_by_user(&self, guild_id: u64, user_id: u64) -> Result<u64, DbErr> {
        entity::prelude::Warning::find()
            .filter(entity::warning::Column::GuildId.eq(guild_id.to_string()))
            .filter(entity::warning::Column::UserId.eq(user_id.to_string()))
            .count(self.db)
            .await
    }

    /// Deletes every warning a user has in a guild.
    ///
    /// # Returns
    /// - `Ok(u64)` - Number of warnings removed
    pub async fn delete_by_user(&self, guild_id: u64, user_id: u64) -> Result<u64, DbErr> {
        let result = entity::prelude::Warning::delete_many()
            .filter(entity::warning::Column::GuildId.eq(guild_id.to_string()))
            .filter(entity::warning::Column::UserId.eq(user_id.to_string()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
