use sea_orm::DatabaseConnection;

use crate::server::{
    data::ticket_config::TicketConfigRepository,
    error::{command::CommandError, AppError},
    model::ticket_config::{
        validate_category_key, TicketCategory, TicketConfig, MAX_CATEGORIES,
        MAX_TICKETS_PER_USER_LIMIT,
    },
};

const MAX_CATEGORY_NAME_LEN: usize = 80;
const MAX_CATEGORY_DESCRIPTION_LEN: usize = 100;

pub struct TicketConfigService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TicketConfigService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets a guild's ticket configuration, creating the default on first access.
    pub async fn get_or_create(&self, guild_id: u64) -> Result<TicketConfig, AppError> {
        let repo = TicketConfigRepository::new(self.db);

        if let Some(config) = repo.find_by_guild_id(guild_id).await? {
            return Ok(config);
        }

        match repo.create_default(guild_id).await {
            Ok(config) => Ok(config),
            Err(insert_err) => match repo.find_by_guild_id(guild_id).await? {
                Some(config) => Ok(config),
                None => Err(insert_err.into()),
            },
        }
    }

    /// Adds a ticket category.
    ///
    /// # Arguments
    /// - `key` - Identifier used in commands and panel buttons, `[a-z0-9-]{1,32}`
    /// - `category` - Display name, description and emoji
    ///
    /// # Returns
    /// - `Ok(TicketConfig)` - Updated configuration
    /// - `Err(AppError::CommandErr)` - Invalid or duplicate key, or the category limit is reached
    pub async fn add_category(
        &self,
        guild_id: u64,
        key: &str,
        category: TicketCategory,
    ) -> Result<TicketConfig, AppError> {
        let key = key.trim().to_lowercase();
        validate_category_key(&key)?;

        let name = category.name.trim().to_string();
        if name.is_empty() || name.chars().count() > MAX_CATEGORY_NAME_LEN {
            return Err(CommandError::InvalidArgument {
                name: "name".to_string(),
                reason: format!("must be 1 to {} characters", MAX_CATEGORY_NAME_LEN),
            }
            .into());
        }
        let description = category
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        if description
            .as_ref()
            .is_some_and(|d| d.chars().count() > MAX_CATEGORY_DESCRIPTION_LEN)
        {
            return Err(CommandError::InvalidArgument {
                name: "description".to_string(),
                reason: format!("must be at most {} characters", MAX_CATEGORY_DESCRIPTION_LEN),
            }
            .into());
        }

        self.mutate(guild_id, |config| {
            if config.categories.contains_key(&key) {
                return Err(CommandError::InvalidArgument {
                    name: "key".to_string(),
                    reason: format!("a category named `{}` already exists", key),
                });
            }
            if config.categories.len() >= MAX_CATEGORIES {
                return Err(CommandError::InvalidArgument {
                    name: "key".to_string(),
                    reason: format!("a server can have at most {} categories", MAX_CATEGORIES),
                });
            }
            config.categories.insert(
                key.clone(),
                TicketCategory {
                    name,
                    description,
                    emoji: category.emoji.filter(|e| !e.trim().is_empty()),
                },
            );
            Ok(())
        })
        .await
    }

    /// Removes a category. The last remaining category cannot be removed.
    pub async fn remove_category(&self, guild_id: u64, key: &str) -> Result<TicketConfig, AppError> {
        let key = key.trim().to_lowercase();

        self.mutate(guild_id, |config| {
            if !config.categories.contains_key(&key) {
                return Err(CommandError::UnknownTicketCategory(key.clone()));
            }
            if config.categories.len() == 1 {
                return Err(CommandError::InvalidArgument {
                    name: "key".to_string(),
                    reason: "at least one category must remain".to_string(),
                });
            }
            config.categories.remove(&key);
            Ok(())
        })
        .await
    }

    pub async fn add_support_role(&self, guild_id: u64, role_id: u64) -> Result<TicketConfig, AppError> {
        self.mutate(guild_id, |config| {
            if !config.support_role_ids.contains(&role_id) {
                config.support_role_ids.push(role_id);
            }
            Ok(())
        })
        .await
    }

    pub async fn remove_support_role(
        &self,
        guild_id: u64,
        role_id: u64,
    ) -> Result<TicketConfig, AppError> {
        self.mutate(guild_id, |config| {
            config.support_role_ids.retain(|id| *id != role_id);
            Ok(())
        })
        .await
    }

    /// Sets how many active tickets one user may hold, between 1 and 10.
    pub async fn set_max_tickets(&self, guild_id: u64, max: i64) -> Result<TicketConfig, AppError> {
        if !(1..=MAX_TICKETS_PER_USER_LIMIT as i64).contains(&max) {
            return Err(CommandError::InvalidArgument {
                name: "count".to_string(),
                reason: format!("must be between 1 and {}", MAX_TICKETS_PER_USER_LIMIT),
            }
            .into());
        }

        self.mutate(guild_id, |config| {
            config.max_tickets_per_user = max as u32;
            Ok(())
        })
        .await
    }

    pub async fn set_transcript_channel(
        &self,
        guild_id: u64,
        channel_id: Option<u64>,
    ) -> Result<TicketConfig, AppError> {
        self.mutate(guild_id, |config| {
            config.transcript_channel_id = channel_id;
            Ok(())
        })
        .await
    }

    pub async fn set_parent_category(
        &self,
        guild_id: u64,
        channel_id: Option<u64>,
    ) -> Result<TicketConfig, AppError> {
        self.mutate(guild_id, |config| {
            config.parent_category_id = channel_id;
            Ok(())
        })
        .await
    }

    pub async fn set_delete_on_close(
        &self,
        guild_id: u64,
        delete: bool,
    ) -> Result<TicketConfig, AppError> {
        self.mutate(guild_id, |config| {
            config.delete_on_close = delete;
            Ok(())
        })
        .await
    }

    async fn mutate<F>(&self, guild_id: u64, apply: F) -> Result<TicketConfig, AppError>
    where
        F: FnOnce(&mut TicketConfig) -> Result<(), CommandError>,
    {
        let mut config = self.get_or_create(guild_id).await?;
        apply(&mut config)?;

        let repo = TicketConfigRepository::new(self.db);

        Ok(repo.save(&config).await?)
    }
}
