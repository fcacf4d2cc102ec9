use super::*;

/// Tests a partial update touching only the prefix and log channel.
///
/// Verifies untouched fields keep their values and `updated_at` advances.
///
/// Expected: Ok with only the supplied fields changed
#[tokio::test]
async fn updates_only_supplied_fields() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(GuildSettings)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = GuildSettingsRepository::new(db);
    let original = repo.create_default(1, "!").await?;

    let updated = repo
        .update(
            1,
            UpdateGuildSettingsParam {
                prefix: Some("?".to_string()),
                log_channel_id: Some(Some(55)),
                ..Default::default()
            },
        )
        .await?;

    assert_eq!(updated.prefix, "?");
    assert_eq!(updated.log_channel_id, Some(55));
    assert_eq!(updated.logging, original.logging);
    assert_eq!(updated.automod, original.automod);
    assert!(updated.updated_at >= original.updated_at);

    Ok(())
}

/// Tests replacing the logging toggles, auto-moderation rules and id lists.
///
/// Expected: Ok with lists stored and read back in order
#[tokio::test]
async fn replaces_toggles_and_lists() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(GuildSettings)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = GuildSettingsRepository::new(db);
    repo.create_default(1, "!").await?;

    let updated = repo
        .update(
            1,
            UpdateGuildSettingsParam {
                logging: Some(LoggingToggles {
                    message_delete: true,
                    member_join: true,
                    ..Default::default()
                }),
                automod: Some(AutomodConfig {
                    enabled: true,
                    anti_invite: true,
                    anti_link: false,
                    max_mentions: 5,
                    banned_words: vec!["foo".to_string(), "bar".to_string()],
                    exempt_role_ids: vec![9],
                }),
                mod_role_ids: Some(vec![3, 4]),
                disabled_channel_ids: Some(vec![7]),
                ..Default::default()
            },
        )
        .await?;

    assert!(updated.logging.message_delete);
    assert!(!updated.logging.moderation);
    assert_eq!(updated.automod.max_mentions, 5);
    assert_eq!(updated.automod.banned_words, vec!["foo", "bar"]);
    assert_eq!(updated.automod.exempt_role_ids, vec![9]);
    assert_eq!(updated.mod_role_ids, vec![3, 4]);
    assert_eq!(updated.disabled_channel_ids, vec![7]);

    Ok(())
}

/// Tests clearing a nullable field with an explicit `None`.
///
/// Expected: Ok with the log channel removed
#[tokio::test]
async fn clears_log_channel() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(GuildSettings)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::guild_settings::GuildSettingsFactory::new(db)
        .guild_id("5")
        .log_channel_id(Some("10".to_string()))
        .build()
        .await?;

    let repo = GuildSettingsRepository::new(db);
    let updated = repo
        .update(
            5,
            UpdateGuildSettingsParam {
                log_channel_id: Some(None),
                ..Default::default()
            },
        )
        .await?;

    assert!(updated.log_channel_id.is_none());

    Ok(())
}

/// Tests updating a guild that has no settings row.
///
/// Expected: Err(RecordNotFound)
#[tokio::test]
async fn fails_for_missing_guild() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(GuildSettings)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = GuildSettingsRepository::new(db);
    let result = repo.update(404, UpdateGuildSettingsParam::default()).await;

    assert!(matches!(result, Err(DbErr::RecordNotFound(_))));

    Ok(())
}
