use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::server::model::ticket::{CreateTicketParam, Ticket, TicketStatus};

/// Statuses that count toward a user's open-ticket quota.
fn active_statuses() -> Vec<&'static str> {
    TicketStatus::ALL
        .into_iter()
        .filter(|s| s.is_active())
        .map(TicketStatus::as_str)
        .collect()
}

pub struct TicketRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TicketRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts a new ticket with status `open`.
    pub async fn create(&self, param: CreateTicketParam) -> Result<Ticket, DbErr> {
        let now = Utc::now();

        let model = entity::ticket::ActiveModel {
            guild_id: ActiveValue::Set(param.guild_id.to_string()),
            channel_id: ActiveValue::Set(param.channel_id.to_string()),
            user_id: ActiveValue::Set(param.user_id.to_string()),
            number: ActiveValue::Set(param.number),
            category: ActiveValue::Set(param.category),
            subject: ActiveValue::Set(param.subject),
            status: ActiveValue::Set(TicketStatus::Open.as_str().to_string()),
            claimed_by: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            closed_at: ActiveValue::Set(None),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ticket::from_entity(model)
    }

    /// Finds the ticket that owns a channel.
    pub async fn find_by_channel_id(&self, channel_id: u64) -> Result<Option<Ticket>, DbErr> {
        entity::prelude::Ticket::find()
            .filter(entity::ticket::Column::ChannelId.eq(channel_id.to_string()))
            .one(self.db)
            .await?
            .map(Ticket::from_entity)
            .transpose()
    }

    /// Finds a ticket by its per-guild number.
    pub async fn find_by_number(&self, guild_id: u64, number: i32) -> Result<Option<Ticket>, DbErr> {
        entity::prelude::Ticket::find()
            .filter(entity::ticket::Column::GuildId.eq(guild_id.to_string()))
            .filter(entity::ticket::Column::Number.eq(number))
            .one(self.db)
            .await?
            .map(Ticket::from_entity)
            .transpose()
    }

    /// Counts a user's tickets in a guild that are not closed or archived.
    pub async fn count_active_by_user(&self, guild_id: u64, user_id: u64) -> Result<u64, DbErr> {
        entity::prelude::Ticket::find()
            .filter(entity::ticket::Column::GuildId.eq(guild_id.to_string()))
            .filter(entity::ticket::Column::UserId.eq(user_id.to_string()))
            .filter(entity::ticket::Column::Status.is_in(active_statuses()))
            .count(self.db)
            .await
    }

    /// Gets every active ticket in a guild ordered by number.
    pub async fn get_active_by_guild(&self, guild_id: u64) -> Result<Vec<Ticket>, DbErr> {
        entity::prelude::Ticket::find()
            .filter(entity::ticket::Column::GuildId.eq(guild_id.to_string()))
            .filter(entity::ticket::Column::Status.is_in(active_statuses()))
            .order_by_asc(entity::ticket::Column::Number)
            .all(self.db)
            .await?
            .into_iter()
            .map(Ticket::from_entity)
            .collect()
    }

    /// Sets a ticket's status, stamping or clearing `closed_at` to match.
    ///
    /// Does not validate the transition; that is the service's job.
    pub async fn update_status(&self, id: i32, status: TicketStatus) -> Result<Ticket, DbErr> {
        let existing = self.find_model(id).await?;
        let now = Utc::now();

        let mut active: entity::ticket::ActiveModel = existing.into();
        active.status = ActiveValue::Set(status.as_str().to_string());
        active.closed_at = ActiveValue::Set((!status.is_active()).then_some(now));
        active.updated_at = ActiveValue::Set(now);

        Ticket::from_entity(active.update(self.db).await?)
    }

    /// Records the staff member who claimed a ticket.
    pub async fn set_claimed_by(&self, id: i32, staff_id: u64) -> Result<Ticket, DbErr> {
        let existing = self.find_model(id).await?;

        let mut active: entity::ticket::ActiveModel = existing.into();
        active.claimed_by = ActiveValue::Set(Some(staff_id.to_string()));
        active.updated_at = ActiveValue::Set(Utc::now());

        Ticket::from_entity(active.update(self.db).await?)
    }

    /// Deletes a ticket record.
    ///
    /// # Returns
    /// - `Ok(u64)` - Rows removed, 0 when the ticket was already gone
    pub async fn delete(&self, id: i32) -> Result<u64, DbErr> {
        let result = entity::prelude::Ticket::delete_by_id(id).exec(self.db).await?;

        Ok(result.rows_affected)
    }

    /// Counts tickets per status, optionally limited to one guild.
    ///
    /// Statuses with no tickets are absent from the map.
    pub async fn count_by_status(
        &self,
        guild_id: Option<u64>,
    ) -> Result<HashMap<TicketStatus, u64>, DbErr> {
        let mut query = entity::prelude::Ticket::find()
            .select_only()
            .column(entity::ticket::Column::Status)
            .column_as(entity::ticket::Column::Id.count(), "count")
            .group_by(entity::ticket::Column::Status);

        if let Some(guild_id) = guild_id {
            query = query.filter(entity::ticket::Column::GuildId.eq(guild_id.to_string()));
        }

        let rows: Vec<(String, i64)> = query.into_tuple().all(self.db).await?;

        rows.into_iter()
            .map(|(status, count)| {
                let status = status.parse::<TicketStatus>().map_err(|e| {
                    DbErr::Custom(format!("Failed to parse ticket status: {}", e))
                })?;
                Ok((status, count.max(0) as u64))
            })
            .collect()
    }

    async fn find_model(&self, id: i32) -> Result<entity::ticket::Model, DbErr> {
        entity::prelude::Ticket::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("Ticket with id {} not found", id)))
    }
}
