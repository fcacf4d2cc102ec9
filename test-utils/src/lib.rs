//! Warden Test Utils
//!
//! Provides shared testing utilities for building integration and unit tests for the bot.
//! This crate offers a builder pattern for creating test contexts with in-memory SQLite
//! databases and customizable table schemas.
//!
//! # Overview
//!
//! The test utilities consist of four main components:
//! - **TestBuilder**: Fluent builder for configuring test environments
//! - **TestContext**: Test environment containing the database connection
//! - **Factories**: Insert entities with sensible defaults
//! - **Fixtures**: In-memory entity models that never touch the database
//!
//! # Usage
//!
//! Use `TestBuilder` to create a test context with the required database tables:
//!
//! ```rust,ignore
//! use test_utils::builder::TestBuilder;
//! use entity::prelude::Ticket;
//!
//! #[tokio::test]
//! async fn test_ticket_operations() -> Result<(), TestError> {
//!     let test = TestBuilder::new()
//!         .with_table(Ticket)
//!         .build()
//!         .await?;
//!
//!     let db = test.db.unwrap();
//!     // Perform database operations...
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod factory;
pub mod fixture;
