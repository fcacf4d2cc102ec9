use super::*;
use sea_orm::{EntityTrait, PaginatorTrait};

/// Tests creating default settings for a guild.
///
/// Verifies the row uses the supplied prefix, empty lists and moderation
/// logging enabled with no log channel.
///
/// Expected: Ok with default settings
#[tokio::test]
async fn creates_default_settings() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(GuildSettings)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = GuildSettingsRepository::new(db);
    let settings = repo.create_default(42, "?").await?;

    assert_eq!(settings.guild_id, 42);
    assert_eq!(settings.prefix, "?");
    assert!(settings.log_channel_id.is_none());
    assert!(settings.logging.moderation);
    assert!(!settings.automod.enabled);
    assert!(settings.automod.banned_words.is_empty());
    assert!(settings.mod_role_ids.is_empty());

    Ok(())
}

/// Tests that a second default insert for the same guild fails.
///
/// Expected: Err from the unique constraint on guild_id
#[tokio::test]
async fn rejects_duplicate_guild() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(GuildSettings)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = GuildSettingsRepository::new(db);
    repo.create_default(42, "!").await?;

    let result = repo.create_default(42, "!").await;

    assert!(result.is_err());
    assert_eq!(GuildSettings::find().count(db).await?, 1);

    Ok(())
}
