//! Factory methods for creating test data.
//!
//! This module provides factory methods for inserting test entities with sensible defaults,
//! reducing boilerplate in tests. Each entity has its own factory module with both a
//! `Factory` struct for customization and a `create_*` convenience function for quick
//! default creation.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), sea_orm::DbErr> {
//!     let db = /* ... */;
//!
//!     // Create with defaults
//!     let settings = factory::create_guild_settings(&db, "123").await?;
//!
//!     // Create with dependencies
//!     let (config, ticket) = factory::helpers::create_ticket_with_config(&db).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Customization
//!
//! ```rust,ignore
//! let ticket = factory::ticket::TicketFactory::new(&db)
//!     .guild_id("123")
//!     .user_id("456")
//!     .status("closed")
//!     .build()
//!     .await?;
//! ```

pub mod guild_settings;
pub mod helpers;
pub mod ticket;
pub mod ticket_config;
pub mod warning;

pub use guild_settings::create_guild_settings;
pub use ticket::create_ticket;
pub use ticket_config::create_ticket_config;
pub use warning::create_warning;
