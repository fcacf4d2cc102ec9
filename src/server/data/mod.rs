//! Database access layer.
//!
//! Each repository borrows the connection, performs key-based CRUD against one
//! table and converts entity models into domain models before returning.

pub mod guild_settings;
pub mod ticket;
pub mod ticket_config;
pub mod warning;

#[cfg(test)]
mod test;
