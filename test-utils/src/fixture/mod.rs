//! Test fixtures providing reusable test data without database insertion.
//!
//! Unlike factories, fixtures do NOT insert data into the database. Use them for
//! unit tests of conversion logic and as inputs to pure functions.
//!
//! # Example
//!
//! ```rust,ignore
//! use test_utils::fixture;
//!
//! let ticket = fixture::ticket::entity();
//! let closed = fixture::ticket::entity_builder().status("closed").build();
//! ```

pub mod guild_settings;
pub mod ticket;

pub use guild_settings::entity as guild_settings_entity;
pub use ticket::{entity as ticket_entity, entity_builder as ticket_entity_builder};
