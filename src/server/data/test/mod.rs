mod guild_settings;
mod ticket;
mod ticket_config;
mod warning;
