//! Ticket fixtures for creating in-memory test data.

use chrono::{DateTime, TimeZone, Utc};
use entity::ticket;

/// Default test guild ID for tickets.
pub const DEFAULT_GUILD_ID: &str = "987654321";

/// Default ticket channel ID.
pub const DEFAULT_CHANNEL_ID: &str = "555555555";

/// Default ticket opener ID.
pub const DEFAULT_USER_ID: &str = "123456789";

/// Creates a ticket entity model with default values.
///
/// # Default Values
/// - id: `1`, number: `1`
/// - guild_id: `"987654321"`, channel_id: `"555555555"`, user_id: `"123456789"`
/// - category: `"support"`, status: `"open"`
pub fn entity() -> ticket::Model {
    entity_builder().build()
}

/// Creates a ticket entity builder for customization.
pub fn entity_builder() -> TicketEntityBuilder {
    TicketEntityBuilder::default()
}

/// Builder for creating customized ticket entity models.
pub struct TicketEntityBuilder {
    id: i32,
    number: i32,
    channel_id: String,
    status: String,
    claimed_by: Option<String>,
    subject: Option<String>,
    created_at: DateTime<Utc>,
}

impl Default for TicketEntityBuilder {
    fn default() -> Self {
        Self {
            id: 1,
            number: 1,
            channel_id: DEFAULT_CHANNEL_ID.to_string(),
            status: "open".to_string(),
            claimed_by: None,
            subject: None,
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap(),
        }
    }
}

impl TicketEntityBuilder {
    pub fn id(mut self, id: i32) -> Self {
        self.id = id;
        self
    }

    pub fn number(mut self, number: i32) -> Self {
        self.number = number;
        self
    }

    pub fn channel_id(mut self, channel_id: impl Into<String>) -> Self {
        self.channel_id = channel_id.into();
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

    pub fn subject(mut self, subject: Option<String>) -> Self {
        self.subject = subject;
        self
    }

    /// Builds the ticket entity model.
    pub fn build(self) -> ticket::Model {
        ticket::Model {
            id: self.id,
            guild_id: DEFAULT_GUILD_ID.to_string(),
            channel_id: self.channel_id,
            user_id: DEFAULT_USER_ID.to_string(),
            number: self.number,
            category: "support".to_string(),
            subject: self.subject,
            status: self.status,
            claimed_by: self.claimed_by,
            created_at: self.created_at,
            updated_at: self.created_at,
            closed_at: None,
        }
    }
}
