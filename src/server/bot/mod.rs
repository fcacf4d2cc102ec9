//! Discord bot integration.
//!
//! The bot runs in its own tokio task next to the dashboard server and shares
//! [`AppState`](crate::server::state::AppState) with it. Gateway events enter
//! through [`handler::Handler`], commands are described and run by
//! [`command`], and message components and modals are routed by [`component`].
//!
//! # Gateway Intents
//!
//! - `GUILDS` - guild and channel lifecycle, used for the dashboard counters
//! - `GUILD_MEMBERS` - joins and leaves for welcome messages and logging (privileged)
//! - `GUILD_MESSAGES` and `MESSAGE_CONTENT` - prefix commands and auto-moderation (privileged)
//! - `GUILD_MESSAGE_REACTIONS` - reaction poll tallies
//! - `GUILD_MODERATION` - ban events
//!
//! Privileged intents must be enabled in the Discord Developer Portal.

pub mod command;
pub mod component;
pub mod handler;
pub mod log_channel;
pub mod start;
