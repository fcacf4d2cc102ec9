use entity::prelude::*;
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

use crate::server::{model::warning::CreateWarningParam, service::moderation::ModerationService};

/// Tests that warning a user reports their running total.
///
/// The user already has one warning in the guild and one in another guild.
///
/// Expected: Ok with total 2 and the reason trimmed
#[tokio::test]
async fn warn_returns_guild_total() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_table(Warning).build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_warning(db, "1", "50").await?;
    factory::create_warning(db, "2", "50").await?;

    let (warning, total) = ModerationService::new(db)
        .warn(CreateWarningParam {
            guild_id: 1,
            user_id: 50,
            moderator_id: 9,
            reason: "  spamming  ".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(total, 2);
    assert_eq!(warning.reason, "spamming");
    assert_eq!(warning.moderator_id, 9);

    Ok(())
}

/// Tests clearing warnings only within one guild.
///
/// Expected: Ok(2) and the other guild's warning untouched
#[tokio::test]
async fn clear_warnings_is_scoped_to_guild() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_table(Warning).build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_warning(db, "1", "50").await?;
    factory::create_warning(db, "1", "50").await?;
    factory::create_warning(db, "2", "50").await?;

    let service = ModerationService::new(db);

    assert_eq!(service.clear_warnings(1, 50).await.unwrap(), 2);
    assert!(service.warnings(1, 50).await.unwrap().is_empty());
    assert_eq!(service.warnings(2, 50).await.unwrap().len(), 1);

    Ok(())
}
