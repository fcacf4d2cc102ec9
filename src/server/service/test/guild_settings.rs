use entity::prelude::*;
use sea_orm::{DbErr, EntityTrait, PaginatorTrait};
use test_utils::{builder::TestBuilder, factory};

use crate::server::{
    error::AppError,
    model::guild_settings::UpdateGuildSettingsParam,
    service::guild_settings::GuildSettingsService,
};

/// Tests that settings for an unknown guild are created exactly once.
///
/// Reads the same guild three times.
///
/// Expected: Ok with one row and identical records on every read
#[tokio::test]
async fn creates_settings_once() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(GuildSettings)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let service = GuildSettingsService::new(db, "!");
    let first = service.get_or_create(42).await.unwrap();
    let second = service.get_or_create(42).await.unwrap();
    let third = service.get_or_create(42).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(second, third);
    assert_eq!(first.prefix, "!");
    assert_eq!(GuildSettings::find().count(db).await?, 1);

    Ok(())
}

/// Tests that existing settings are returned rather than replaced.
///
/// Expected: Ok with the stored prefix
#[tokio::test]
async fn returns_existing_settings() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(GuildSettings)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::guild_settings::GuildSettingsFactory::new(db)
        .guild_id("77")
        .prefix("?")
        .build()
        .await?;

    let settings = GuildSettingsService::new(db, "!")
        .get_or_create(77)
        .await
        .unwrap();

    assert_eq!(settings.prefix, "?");
    assert_eq!(GuildSettings::find().count(db).await?, 1);

    Ok(())
}

/// Tests updating settings of a guild that has no row yet.
///
/// Expected: Ok with the row created and the new prefix applied
#[tokio::test]
async fn update_creates_missing_row() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(GuildSettings)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let settings = GuildSettingsService::new(db, "!")
        .update(
            5,
            UpdateGuildSettingsParam {
                prefix: Some("$".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(settings.prefix, "$");
    assert_eq!(GuildSettings::find().count(db).await?, 1);

    Ok(())
}

/// Tests that a missing table surfaces as a database error.
///
/// Expected: Err(AppError::DbErr)
#[tokio::test]
async fn fails_without_table() -> Result<(), DbErr> {
    let test = TestBuilder::new().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let result = GuildSettingsService::new(db, "!").get_or_create(1).await;

    assert!(matches!(result, Err(AppError::DbErr(_))));

    Ok(())
}
