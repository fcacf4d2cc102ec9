//! Business logic between the command/controller layers and the data layer.

pub mod automod;
pub mod guild_settings;
pub mod moderation;
pub mod poll;
pub mod presence;
pub mod stats;
pub mod ticket;
pub mod ticket_config;

#[cfg(test)]
mod test;
