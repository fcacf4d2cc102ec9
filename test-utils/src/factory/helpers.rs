//! Shared helper utilities for factory methods.
//!
//! Provides ID generation and convenience methods for creating entities together
//! with the records they depend on.

use sea_orm::{DatabaseConnection, DbErr};

/// Counter for generating unique IDs in tests.
static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);

/// Gets the next unique counter value for test data.
///
/// # Returns
/// - `u64` - Next unique counter value
pub fn next_id() -> u64 {
    COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst)
}

/// Creates a ticket configuration and one open ticket in the same guild.
///
/// Both entities use default values. Use the individual factories if you need
/// to customize either of them.
///
/// # Arguments
/// - `db` - Database connection
///
/// # Returns
/// - `Ok((config, ticket))` - Tuple of created entities
/// - `Err(DbErr)` - Database error during creation
pub async fn create_ticket_with_config(
    db: &DatabaseConnection,
) -> Result<(entity::ticket_config::Model, entity::ticket::Model), DbErr> {
    let config = crate::factory::ticket_config::TicketConfigFactory::new(db)
        .build()
        .await?;
    let ticket = crate::factory::ticket::TicketFactory::new(db)
        .guild_id(config.guild_id.clone())
        .build()
        .await?;

    Ok((config, ticket))
}
