use sea_orm::DatabaseConnection;

use crate::server::{
    data::guild_settings::GuildSettingsRepository,
    error::AppError,
    model::guild_settings::{GuildSettings, UpdateGuildSettingsParam},
};

pub struct GuildSettingsService<'a> {
    db: &'a DatabaseConnection,
    default_prefix: &'a str,
}

impl<'a> GuildSettingsService<'a> {
    pub fn new(db: &'a DatabaseConnection, default_prefix: &'a str) -> Self {
        Self { db, default_prefix }
    }

    /// Gets a guild's settings, creating the default row on first access.
    ///
    /// If another task inserts the row between the lookup and the insert, the
    /// unique constraint rejects the second insert and the row written by the
    /// other task is returned instead.
    ///
    /// # Returns
    /// - `Ok(GuildSettings)` - Existing or freshly created settings
    /// - `Err(AppError::DbErr)` - Database failure
    pub async fn get_or_create(&self, guild_id: u64) -> Result<GuildSettings, AppError> {
        let repo = GuildSettingsRepository::new(self.db);

        if let Some(settings) = repo.find_by_guild_id(guild_id).await? {
            return Ok(settings);
        }

        match repo.create_default(guild_id, self.default_prefix).await {
            Ok(settings) => {
                tracing::debug!("Created default settings for guild {}", guild_id);
                Ok(settings)
            }
            Err(insert_err) => match repo.find_by_guild_id(guild_id).await? {
                Some(settings) => Ok(settings),
                None => Err(insert_err.into()),
            },
        }
    }

    /// Applies a partial update, creating the settings first if needed.
    pub async fn update(
        &self,
        guild_id: u64,
        param: UpdateGuildSettingsParam,
    ) -> Result<GuildSettings, AppError> {
        self.get_or_create(guild_id).await?;

        let repo = GuildSettingsRepository::new(self.db);

        Ok(repo.update(guild_id, param).await?)
    }
}
