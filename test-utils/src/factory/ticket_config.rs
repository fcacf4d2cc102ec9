//! Ticket configuration factory for creating test config records.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

use crate::factory::helpers::next_id;

/// Factory for creating test ticket configurations with customizable fields.
///
/// The default configuration has a single `support` category, allows one open
/// ticket per user and deletes ticket channels on close.
pub struct TicketConfigFactory<'a> {
    db: &'a DatabaseConnection,
    guild_id: String,
    categories: serde_json::Value,
    support_role_ids: Vec<String>,
    transcript_channel_id: Option<String>,
    max_tickets_per_user: i32,
    ticket_counter: i32,
    delete_on_close: bool,
}

impl<'a> TicketConfigFactory<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            guild_id: next_id().to_string(),
            categories: serde_json::json!({
                "support": {
                    "name": "Support",
                    "description": "General help",
                    "emoji": null
                }
            }),
            support_role_ids: Vec::new(),
            transcript_channel_id: None,
            max_tickets_per_user: 1,
            ticket_counter: 0,
            delete_on_close: true,
        }
    }

    pub fn guild_id(mut self, guild_id: impl Into<String>) -> Self {
        self.guild_id = guild_id.into();
        self
    }

    /// Replaces the categories document with raw JSON.
    pub fn categories(mut self, categories: serde_json::Value) -> Self {
        self.categories = categories;
        self
    }

    pub fn support_role_ids(mut self, role_ids: Vec<String>) -> Self {
        self.support_role_ids = role_ids;
        self
    }

    pub fn transcript_channel_id(mut self, channel_id: Option<String>) -> Self {
        self.transcript_channel_id = channel_id;
        self
    }

    pub fn max_tickets_per_user(mut self, max: i32) -> Self {
        self.max_tickets_per_user = max;
        self
    }

    pub fn ticket_counter(mut self, counter: i32) -> Self {
        self.ticket_counter = counter;
        self
    }

    pub fn delete_on_close(mut self, delete: bool) -> Self {
        self.delete_on_close = delete;
        self
    }

    /// Builds and inserts the ticket config entity into the database.
    pub async fn build(self) -> Result<entity::ticket_config::Model, DbErr> {
        entity::ticket_config::ActiveModel {
            id: ActiveValue::NotSet,
            guild_id: ActiveValue::Set(self.guild_id),
            categories: ActiveValue::Set(self.categories),
            support_role_ids: ActiveValue::Set(serde_json::json!(self.support_role_ids)),
            parent_category_id: ActiveValue::Set(None),
            transcript_channel_id: ActiveValue::Set(self.transcript_channel_id),
            max_tickets_per_user: ActiveValue::Set(self.max_tickets_per_user),
            ticket_counter: ActiveValue::Set(self.ticket_counter),
            delete_on_close: ActiveValue::Set(self.delete_on_close),
            panel_title: ActiveValue::Set("Support Tickets".to_string()),
            panel_description: ActiveValue::Set("Open a ticket below.".to_string()),
            panel_color: ActiveValue::Set(0x5865F2),
            welcome_message: ActiveValue::Set(None),
            updated_at: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a ticket configuration with default values for the given guild.
pub async fn create_ticket_config(
    db: &DatabaseConnection,
    guild_id: &str,
) -> Result<entity::ticket_config::Model, DbErr> {
    TicketConfigFactory::new(db).guild_id(guild_id).build().await
}
