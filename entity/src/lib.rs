//! SeaORM entity definitions for the bot's persistent records.

pub mod prelude;

pub mod guild_settings;
pub mod ticket;
pub mod ticket_config;
pub mod warning;
