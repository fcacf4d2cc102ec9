//! Ticket factory for creating test ticket records.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

use crate::factory::helpers::next_id;

/// Factory for creating test tickets with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// let ticket = TicketFactory::new(&db)
///     .guild_id("123")
///     .user_id("456")
///     .status("in_progress")
///     .build()
///     .await?;
/// ```
pub struct TicketFactory<'a> {
    db: &'a DatabaseConnection,
    guild_id: String,
    channel_id: String,
    user_id: String,
    number: i32,
    category: String,
    subject: Option<String>,
    status: String,
    claimed_by: Option<String>,
}

impl<'a> TicketFactory<'a> {
    /// Creates a new factory with default values.
    ///
    /// Defaults:
    /// - guild_id, channel_id, user_id: unique counter values
    /// - number: `1`
    /// - category: `"support"`
    /// - status: `"open"`
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            guild_id: next_id().to_string(),
            channel_id: next_id().to_string(),
            user_id: next_id().to_string(),
            number: 1,
            category: "support".to_string(),
            subject: None,
            status: "open".to_string(),
            claimed_by: None,
        }
    }

    pub fn guild_id(mut self, guild_id: impl Into<String>) -> Self {
        self.guild_id = guild_id.into();
        self
    }

    pub fn channel_id(mut self, channel_id: impl Into<String>) -> Self {
        self.channel_id = channel_id.into();
        self
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    pub fn number(mut self, number: i32) -> Self {
        self.number = number;
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn subject(mut self, subject: Option<String>) -> Self {
        self.subject = subject;
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn claimed_by(mut self, claimed_by: Option<String>) -> Self {
        self.claimed_by = claimed_by;
        self
    }

    /// Builds and inserts the ticket entity into the database.
    pub async fn build(self) -> Result<entity::ticket::Model, DbErr> {
        let now = Utc::now();
        let closed_at = matches!(self.status.as_str(), "closed" | "archived").then_some(now);

        entity::ticket::ActiveModel {
            id: ActiveValue::NotSet,
            guild_id: ActiveValue::Set(self.guild_id),
            channel_id: ActiveValue::Set(self.channel_id),
            user_id: ActiveValue::Set(self.user_id),
            number: ActiveValue::Set(self.number),
            category: ActiveValue::Set(self.category),
            subject: ActiveValue::Set(self.subject),
            status: ActiveValue::Set(self.status),
            claimed_by: ActiveValue::Set(self.claimed_by),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            closed_at: ActiveValue::Set(closed_at),
        }
        .insert(self.db)
        .await
    }
}

/// Creates an open ticket for `user_id` in `guild_id`.
pub async fn create_ticket(
    db: &DatabaseConnection,
    guild_id: &str,
    user_id: &str,
) -> Result<entity::ticket::Model, DbErr> {
    TicketFactory::new(db)
        .guild_id(guild_id)
        .user_id(user_id)
        .build()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TestBuilder;
    use entity::prelude::*;

    #[tokio::test]
    async fn creates_multiple_unique_tickets() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_table(Ticket).build().await.unwrap();
        let db = test.db.as_ref().unwrap();

        let first = create_ticket(db, "1", "2").await?;
        let second = create_ticket(db, "1", "2").await?;

        assert_ne!(first.channel_id, second.channel_id);
        assert_eq!(first.status, "open");
        assert!(first.closed_at.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn sets_closed_at_for_closed_status() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_table(Ticket).build().await.unwrap();
        let db = test.db.as_ref().unwrap();

        let ticket = TicketFactory::new(db).status("closed").build().await?;

        assert!(ticket.closed_at.is_some());

        Ok(())
    }
}
