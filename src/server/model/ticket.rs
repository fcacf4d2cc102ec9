use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use sea_orm::DbErr;

use crate::server::{
    error::command::CommandError,
    util::parse::{parse_optional_id, parse_u64_from_string},
};

/// Lifecycle state of a support ticket.
///
/// Stored as its snake_case name in the `ticket.status` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TicketStatus {
    Open,
    InProgress,
    Waiting,
    Closed,
    Archived,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 5] = [
        Self::Open,
        Self::InProgress,
        Self::Waiting,
        Self::Closed,
        Self::Archived,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Waiting => "waiting",
            Self::Closed => "closed",
            Self::Archived => "archived",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::InProgress => "In Progress",
            Self::Waiting => "Waiting",
            Self::Closed => "Closed",
            Self::Archived => "Archived",
        }
    }

    /// Open, in-progress and waiting tickets count toward a user's quota.
    pub fn is_active(self) -> bool {
        !matches!(self, Self::Closed | Self::Archived)
    }

    /// The single place ticket state changes are validated.
    ///
    /// - Active tickets move freely between active states and may close.
    /// - Closed tickets may only reopen or be archived.
    /// - Archived is terminal.
    /// - Staying in the same state is never a transition.
    pub fn can_transition_to(self, next: TicketStatus) -> bool {
        if self == next {
            return false;
        }
        match self {
            Self::Open | Self::InProgress | Self::Waiting => next != Self::Archived,
            Self::Closed => matches!(next, Self::Open | Self::Archived),
            Self::Archived => false,
        }
    }

    /// Returns `next` when the move is allowed, otherwise a user-facing error.
    pub fn transition(self, next: TicketStatus) -> Result<TicketStatus, CommandError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CommandError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: next.as_str().to_string(),
            })
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CommandError::InvalidArgument {
                name: "status".to_string(),
                reason: format!("`{}` is not a ticket status", s),
            })
    }
}

/// A support ticket record.
#[derive(Debug, Clone, PartialEq)]
pub struct Ticket {
    pub id: i32,
    pub guild_id: u64,
    pub channel_id: u64,
    /// User who opened the ticket.
    pub user_id: u64,
    /// Per-guild sequence number shown as `#0001`.
    pub number: i32,
    pub category: String,
    pub subject: Option<String>,
    pub status: TicketStatus,
    pub claimed_by: Option<u64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl Ticket {
    /// Converts an entity model to a domain model at the repository boundary.
    ///
    /// # Returns
    /// - `Ok(Ticket)` - Successfully converted
    /// - `Err(DbErr::Custom)` - A stored id or the status was malformed
    pub fn from_entity(entity: entity::ticket::Model) -> Result<Self, DbErr> {
        let status = entity
            .status
            .parse::<TicketStatus>()
            .map_err(|e| DbErr::Custom(format!("Failed to parse ticket status: {}", e)))?;

        Ok(Self {
            id: entity.id,
            guild_id: parse_u64_from_string(&entity.guild_id)?,
            channel_id: parse_u64_from_string(&entity.channel_id)?,
            user_id: parse_u64_from_string(&entity.user_id)?,
            number: entity.number,
            category: entity.category,
            subject: entity.subject,
            status,
            claimed_by: parse_optional_id(entity.claimed_by.as_deref())?,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
            closed_at: entity.closed_at,
        })
    }

    /// Zero-padded display number, e.g. `0042`.
    pub fn padded_number(&self) -> String {
        format!("{:04}", self.number)
    }

    /// Name of the Discord channel for ticket `number`.
    pub fn channel_name(number: i32) -> String {
        format!("ticket-{:04}", number)
    }
}

/// Fields required to insert a new ticket record.
#[derive(Debug, Clone)]
pub struct CreateTicketParam {
    pub guild_id: u64,
    pub channel_id: u64,
    pub user_id: u64,
    pub number: i32,
    pub category: String,
    pub subject: Option<String>,
}
