use super::*;

/// Tests finding settings inserted by the factory.
///
/// Expected: Ok(Some) with parsed ids and lists
#[tokio::test]
async fn finds_existing_settings() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(GuildSettings)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::guild_settings::GuildSettingsFactory::new(db)
        .guild_id("100")
        .prefix("$")
        .log_channel_id(Some("200".to_string()))
        .banned_words(vec!["spam".to_string()])
        .mod_role_ids(vec!["300".to_string()])
        .build()
        .await?;

    let repo = GuildSettingsRepository::new(db);
    let settings = repo.find_by_guild_id(100).await?.unwrap();

    assert_eq!(settings.prefix, "$");
    assert_eq!(settings.log_channel_id, Some(200));
    assert_eq!(settings.automod.banned_words, vec!["spam".to_string()]);
    assert_eq!(settings.mod_role_ids, vec![300]);

    Ok(())
}

/// Tests looking up a guild with no settings row.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_for_unknown_guild() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(GuildSettings)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_guild_settings(db, "100").await?;

    let repo = GuildSettingsRepository::new(db);

    assert!(repo.find_by_guild_id(999).await?.is_none());

    Ok(())
}
