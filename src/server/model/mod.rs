//! Domain models and operation parameter types.
//!
//! Entities from the `entity` crate are converted into these types at the
//! repository boundary so services never handle raw string ids or JSON columns.

pub mod guild_settings;
pub mod poll;
pub mod ticket;
pub mod ticket_config;
pub mod warning;
