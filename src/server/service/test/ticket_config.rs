use entity::prelude::*;
use sea_orm::{DbErr, EntityTrait, PaginatorTrait};
use test_utils::builder::TestBuilder;

use crate::server::{
    error::{command::CommandError, AppError},
    model::ticket_config::TicketCategory,
    service::ticket_config::TicketConfigService,
};

fn category(name: &str) -> TicketCategory {
    TicketCategory {
        name: name.to_string(),
        description: Some("  Payments and refunds ".to_string()),
        emoji: Some("💳".to_string()),
    }
}

/// Tests adding a category to a fresh configuration.
///
/// Expected: Ok with both the default and the new category, description trimmed
#[tokio::test]
async fn adds_category() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(TicketConfig)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let config = TicketConfigService::new(db)
        .add_category(10, "Billing", category("Billing"))
        .await
        .unwrap();

    assert_eq!(config.categories.len(), 2);
    let billing = config.categories.get("billing").unwrap();
    assert_eq!(billing.description.as_deref(), Some("Payments and refunds"));
    assert_eq!(TicketConfig::find().count(db).await?, 1);

    Ok(())
}

/// Tests that duplicate and malformed keys are rejected.
///
/// Expected: Err(InvalidArgument) for both
#[tokio::test]
async fn rejects_bad_category_keys() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(TicketConfig)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let service = TicketConfigService::new(db);

    let duplicate = service
        .add_category(10, "support", category("Again"))
        .await;
    let malformed = service
        .add_category(10, "two words", category("Nope"))
        .await;

    assert!(matches!(
        duplicate,
        Err(AppError::CommandErr(CommandError::InvalidArgument { .. }))
    ));
    assert!(matches!(
        malformed,
        Err(AppError::CommandErr(CommandError::InvalidArgument { .. }))
    ));

    Ok(())
}

/// Tests removing categories, keeping at least one.
///
/// Expected: Ok for billing, Err for the last remaining and for unknown keys
#[tokio::test]
async fn removes_category_but_not_the_last() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(TicketConfig)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let service = TicketConfigService::new(db);

    service
        .add_category(10, "billing", category("Billing"))
        .await
        .unwrap();
    let config = service.remove_category(10, "billing").await.unwrap();
    assert_eq!(config.categories.len(), 1);

    assert!(matches!(
        service.remove_category(10, "support").await,
        Err(AppError::CommandErr(CommandError::InvalidArgument { .. }))
    ));
    assert!(matches!(
        service.remove_category(10, "billing").await,
        Err(AppError::CommandErr(CommandError::UnknownTicketCategory(_)))
    ));

    Ok(())
}

/// Tests the per-user ticket limit bounds.
///
/// Expected: Ok for 3, Err for 0 and 11
#[tokio::test]
async fn validates_max_tickets() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(TicketConfig)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let service = TicketConfigService::new(db);

    assert_eq!(service.set_max_tickets(10, 3).await.unwrap().max_tickets_per_user, 3);
    assert!(service.set_max_tickets(10, 0).await.is_err());
    assert!(service.set_max_tickets(10, 11).await.is_err());

    Ok(())
}

/// Tests that support roles are added once and removed.
///
/// Expected: Ok with no duplicates
#[tokio::test]
async fn manages_support_roles() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(TicketConfig)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let service = TicketConfigService::new(db);

    service.add_support_role(10, 5).await.unwrap();
    let config = service.add_support_role(10, 5).await.unwrap();
    assert_eq!(config.support_role_ids, vec![5]);

    let config = service.remove_support_role(10, 5).await.unwrap();
    assert!(config.support_role_ids.is_empty());

    Ok(())
}
