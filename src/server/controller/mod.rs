//! Dashboard HTTP handlers.
//!
//! Every route sits behind the dashboard token middleware, so handlers only
//! convert between DTOs and services.

pub mod command;
pub mod health;
pub mod settings;
pub mod stats;
pub mod status;
pub mod ws;
