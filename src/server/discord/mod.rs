//! Discord access used by the ticket and poll workflows.
//!
//! Workflows talk to Discord through the [`connector::DiscordConnector`] trait
//! so they can run against the in-memory fake in tests.

pub mod connector;
pub mod embed;
pub mod rest;

#[cfg(test)]
pub mod fake;
