use super::*;

/// Tests creating the default ticket configuration.
///
/// Expected: Ok with the `support` category, one ticket per user and delete-on-close
#[tokio::test]
async fn creates_default_config() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(TicketConfig)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = TicketConfigRepository::new(db);
    let config = repo.create_default(77).await?;

    assert_eq!(config.guild_id, 77);
    assert!(config.categories.contains_key(DEFAULT_CATEGORY_KEY));
    assert_eq!(config.max_tickets_per_user, 1);
    assert_eq!(config.ticket_counter, 0);
    assert!(config.delete_on_close);
    assert!(config.support_role_ids.is_empty());

    let found = repo.find_by_guild_id(77).await?;
    assert_eq!(found, Some(config));

    Ok(())
}
