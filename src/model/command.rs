use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A registered command as listed on the dashboard.
#[derive(Serialize, Deserialize, ToSchema, Clone, Debug, PartialEq)]
pub struct CommandDto {
    pub name: String,
    pub description: String,
    pub category: String,
    /// Prefix-style usage line, e.g. `ban <user> [reason]`.
    pub usage: String,
    pub owner_only: bool,
    pub guild_only: bool,
    pub subcommands: Vec<String>,
}
