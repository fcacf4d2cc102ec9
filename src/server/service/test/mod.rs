mod guild_settings;
mod moderation;
mod ticket;
mod ticket_config;
