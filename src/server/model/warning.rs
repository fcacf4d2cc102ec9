use chrono::{DateTime, Utc};
use sea_orm::DbErr;

use crate::server::util::parse::parse_u64_from_string;

/// A moderator-issued warning.
#[derive(Debug, Clone, PartialEq)]
pub struct Warning {
    pub id: i32,
    pub guild_id: u64,
    pub user_id: u64,
    pub moderator_id: u64,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

impl Warning {
    pub fn from_entity(entity: entity::warning::Model) -> Result<Self, DbErr> {
        Ok(Self {
            id: entity.id,
            guild_id: parse_u64_from_string(&entity.guild_id)?,
            user_id: parse_u64_from_string(&entity.user_id)?,
            moderator_id: parse_u64_from_string(&entity.moderator_id)?,
            reason: entity.reason,
            created_at: entity.created_at,
        })
    }
}

#[derive(Debug, Clone)]
pub struct CreateWarningParam {
    pub guild_id: u64,
    pub user_id: u64,
    pub moderator_id: u64,
    pub reason: String,
}
