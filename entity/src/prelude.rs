pub use super::guild_settings::Entity as GuildSettings;
pub use super::ticket::Entity as Ticket;
pub use super::ticket_config::Entity as TicketConfig;
pub use super::warning::Entity as Warning;
