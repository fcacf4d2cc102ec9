use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use serde::{Deserialize, Serialize};

use crate::server::{
    error::{command::CommandError, internal::InternalError},
    util::parse::{parse_id_list, parse_optional_id, parse_u64_from_string},
};

/// Discord allows at most 25 buttons on a message, which bounds the panel.
pub const MAX_CATEGORIES: usize = 25;
pub const MAX_TICKETS_PER_USER_LIMIT: u32 = 10;
pub const DEFAULT_CATEGORY_KEY: &str = "support";

/// One entry of the guild's ticket category map, stored as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketCategory {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub emoji: Option<String>,
}

/// How the ticket panel embed looks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelAppearance {
    pub title: String,
    pub description: String,
    pub color: u32,
}

/// Per-guild ticket configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketConfig {
    pub id: i32,
    pub guild_id: u64,
    /// Category key → definition, ordered by key for stable panels.
    pub categories: BTreeMap<String, TicketCategory>,
    pub support_role_ids: Vec<u64>,
    /// Discord category channel new ticket channels are created under.
    pub parent_category_id: Option<u64>,
    pub transcript_channel_id: Option<u64>,
    pub max_tickets_per_user: u32,
    pub ticket_counter: i32,
    /// Delete the channel and record on close instead of locking the channel.
    pub delete_on_close: bool,
    pub panel: PanelAppearance,
    pub welcome_message: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl TicketConfig {
    /// Converts an entity model to a domain model at the repository boundary.
    ///
    /// # Returns
    /// - `Ok(TicketConfig)` - Successfully converted
    /// - `Err(DbErr::Custom)` - A stored id or the categories document was malformed
    pub fn from_entity(entity: entity::ticket_config::Model) -> Result<Self, DbErr> {
        let categories: BTreeMap<String, TicketCategory> =
            serde_json::from_value(entity.categories).map_err(|e| InternalError::MalformedJson {
                column: "categories",
                reason: e.to_string(),
            })?;

        Ok(Self {
            id: entity.id,
            guild_id: parse_u64_from_string(&entity.guild_id)?,
            categories,
            support_role_ids: parse_id_list("support_role_ids", &entity.support_role_ids)?,
            parent_category_id: parse_optional_id(entity.parent_category_id.as_deref())?,
            transcript_channel_id: parse_optional_id(entity.transcript_channel_id.as_deref())?,
            max_tickets_per_user: entity.max_tickets_per_user.max(1) as u32,
            ticket_counter: entity.ticket_counter,
            delete_on_close: entity.delete_on_close,
            panel: PanelAppearance {
                title: entity.panel_title,
                description: entity.panel_description,
                color: entity.panel_color.max(0) as u32,
            },
            welcome_message: entity.welcome_message,
            updated_at: entity.updated_at,
        })
    }

    /// Resolves the category a new ticket should use.
    ///
    /// With no key the default `support` category is used when present,
    /// otherwise the first configured category.
    pub fn resolve_category(&self, key: Option<&str>) -> Result<(String, TicketCategory), CommandError> {
        match key {
            Some(key) => {
                let key = key.trim().to_lowercase();
                self.categories
                    .get(&key)
                    .map(|category| (key.clone(), category.clone()))
                    .ok_or(CommandError::UnknownTicketCategory(key))
            }
            None => self
                .categories
                .get_key_value(DEFAULT_CATEGORY_KEY)
                .or_else(|| self.categories.iter().next())
                .map(|(k, v)| (k.clone(), v.clone()))
                .ok_or_else(|| CommandError::UnknownTicketCategory(DEFAULT_CATEGORY_KEY.to_string())),
        }
    }

    pub fn is_support_role(&self, role_ids: &[u64]) -> bool {
        role_ids.iter().any(|id| self.support_role_ids.contains(id))
    }
}

/// Checks that a category key is 1 to 32 characters of `[a-z0-9-]`.
///
/// Keys end up inside button custom ids, so they stay short and plain.
pub fn validate_category_key(key: &str) -> Result<(), CommandError> {
    let valid = !key.is_empty()
        && key.len() <= 32
        && key
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

    if valid {
        Ok(())
    } else {
        Err(CommandError::InvalidArgument {
            name: "key".to_string(),
            reason: "use 1 to 32 lowercase letters, digits or dashes".to_string(),
        })
    }
}

/// Default category map written for new guilds.
pub fn default_categories() -> BTreeMap<String, TicketCategory> {
    BTreeMap::from([(
        DEFAULT_CATEGORY_KEY.to_string(),
        TicketCategory {
            name: "Support".to_string(),
            description: Some("General help and questions".to_string()),
            emoji: Some("🎫".to_string()),
        },
    )])
}
