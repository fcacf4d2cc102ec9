use chrono::Utc;
use sea_orm::{
    sea_query::{Expr, ExprTrait},
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, TransactionTrait,
};

use crate::server::{
    model::ticket_config::{default_categories, TicketConfig},
    util::parse::id_list_to_json,
};

pub const DEFAULT_PANEL_TITLE: &str = "Support Tickets";
pub const DEFAULT_PANEL_DESCRIPTION: &str =
    "Need help? Pick a category below and a private channel will be opened for you.";
pub const DEFAULT_PANEL_COLOR: u32 = 0x5865F2;

pub struct TicketConfigRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TicketConfigRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_by_guild_id(&self, guild_id: u64) -> Result<Option<TicketConfig>, DbErr> {
        entity::prelude::TicketConfig::find()
            .filter(entity::ticket_config::Column::GuildId.eq(guild_id.to_string()))
            .one(self.db)
            .await?
            .map(TicketConfig::from_entity)
            .transpose()
    }

    /// Inserts the default configuration for a guild.
    pub async fn create_default(&self, guild_id: u64) -> Result<TicketConfig, DbErr> {
        let categories = serde_json::to_value(default_categories())
            .map_err(|e| DbErr::Custom(format!("Failed to encode categories: {}", e)))?;

        let model = entity::ticket_config::ActiveModel {
            guild_id: ActiveValue::Set(guild_id.to_string()),
            categories: ActiveValue::Set(categories),
            support_role_ids: ActiveValue::Set(serde_json::json!([])),
            parent_category_id: ActiveValue::Set(None),
            transcript_channel_id: ActiveValue::Set(None),
            max_tickets_per_user: ActiveValue::Set(1),
            ticket_counter: ActiveValue::Set(0),
            delete_on_close: ActiveValue::Set(true),
            panel_title: ActiveValue::Set(DEFAULT_PANEL_TITLE.to_string()),
            panel_description: ActiveValue::Set(DEFAULT_PANEL_DESCRIPTION.to_string()),
            panel_color: ActiveValue::Set(DEFAULT_PANEL_COLOR as i32),
            welcome_message: ActiveValue::Set(None),
            updated_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        TicketConfig::from_entity(model)
    }

    /// Writes every mutable field of `config` back to its row.
    ///
    /// The ticket counter is left alone; it only moves through
    /// [`next_ticket_number`](Self::next_ticket_number).
    pub async fn save(&self, config: &TicketConfig) -> Result<TicketConfig, DbErr> {
        let existing = entity::prelude::TicketConfig::find_by_id(config.id)
            .one(self.db)
            .await?
            .ok_or_else(|| {
                DbErr::RecordNotFound(format!("Ticket config with id {} not found", config.id))
            })?;

        let categories = serde_json::to_value(&config.categories)
            .map_err(|e| DbErr::Custom(format!("Failed to encode categories: {}", e)))?;

        let mut active: entity::ticket_config::ActiveModel = existing.into();
        active.categories = ActiveValue::Set(categories);
        active.support_role_ids = ActiveValue::Set(id_list_to_json(&config.support_role_ids));
        active.parent_category_id =
            ActiveValue::Set(config.parent_category_id.map(|id| id.to_string()));
        active.transcript_channel_id =
            ActiveValue::Set(config.transcript_channel_id.map(|id| id.to_string()));
        active.max_tickets_per_user = ActiveValue::Set(config.max_tickets_per_user as i32);
        active.delete_on_close = ActiveValue::Set(config.delete_on_close);
        active.panel_title = ActiveValue::Set(config.panel.title.clone());
        active.panel_description = ActiveValue::Set(config.panel.description.clone());
        active.panel_color = ActiveValue::Set(config.panel.color as i32);
        active.welcome_message = ActiveValue::Set(config.welcome_message.clone());
        active.updated_at = ActiveValue::Set(Utc::now());

        TicketConfig::from_entity(active.update(self.db).await?)
    }

    /// Increments the guild's ticket counter and returns the new value.
    ///
    /// The increment runs in SQL and the value is read back in the same
    /// transaction, so concurrent callers in one guild never share a number.
    ///
    /// # Returns
    /// - `Ok(i32)` - The number reserved for the next ticket
    /// - `Err(DbErr::RecordNotFound)` - The guild has no ticket configuration
    pub async fn next_ticket_number(&self, guild_id: u64) -> Result<i32, DbErr> {
        let txn = self.db.begin().await?;

        let updated = entity::prelude::TicketConfig::update_many()
            .filter(entity::ticket_config::Column::GuildId.eq(guild_id.to_string()))
            .col_expr(
                entity::ticket_config::Column::TicketCounter,
                Expr::col(entity::ticket_config::Column::TicketCounter).add(1),
            )
            .col_expr(
                entity::ticket_config::Column::UpdatedAt,
                Expr::value(Utc::now()),
            )
            .exec(&txn)
            .await?;
        if updated.rows_affected == 0 {
            return Err(DbErr::RecordNotFound(format!(
                "Ticket config for guild {} not found",
                guild_id
            )));
        }

        let config = entity::prelude::TicketConfig::find()
            .filter(entity::ticket_config::Column::GuildId.eq(guild_id.to_string()))
            .one(&txn)
            .await?
            .ok_or_else(|| {
                DbErr::RecordNotFound(format!("Ticket config for guild {} not found", guild_id))
            })?;

        txn.commit().await?;

        Ok(config.ticket_counter)
    }
}
