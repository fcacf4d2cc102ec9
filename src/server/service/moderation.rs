use sea_orm::DatabaseConnection;

use crate::server::{
    data::warning::WarningRepository,
    error::AppError,
    model::warning::{CreateWarningParam, Warning},
};

/// Longest reason stored with a warning or sent to Discord's audit log.
pub const MAX_REASON_LEN: usize = 512;

pub struct ModerationService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ModerationService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a warning and returns it with the user's new warning total.
    pub async fn warn(&self, param: CreateWarningParam) -> Result<(Warning, u64), AppError> {
        let repo = WarningRepository::new(self.db);

        let param = CreateWarningParam {
            reason: normalize_reason(Some(&param.reason)),
            ..param
        };
        let warning = repo.create(param).await?;
        let total = repo.count_by_user(warning.guild_id, warning.user_id).await?;

        Ok((warning, total))
    }

    pub async fn warnings(&self, guild_id: u64, user_id: u64) -> Result<Vec<Warning>, AppError> {
        let repo = WarningRepository::new(self.db);

        Ok(repo.get_by_user(guild_id, user_id).await?)
    }

    /// Removes every warning a user has in a guild and returns how many were removed.
    pub async fn clear_warnings(&self, guild_id: u64, user_id: u64) -> Result<u64, AppError> {
        let repo = WarningRepository::new(self.db);

        Ok(repo.delete_by_user(guild_id, user_id).await?)
    }
}

/// Trims a moderation reason, substituting a placeholder when empty.
pub fn normalize_reason(reason: Option<&str>) -> String {
    match reason.map(str::trim).filter(|r| !r.is_empty()) {
        Some(reason) => reason.chars().take(MAX_REASON_LEN).collect(),
        None => "No reason provided".to_string(),
    }
}
