use super::*;

/// Tests saving category, role and channel changes.
///
/// Verifies the counter is not overwritten by a stale in-memory copy.
///
/// Expected: Ok with the new values persisted and the counter preserved
#[tokio::test]
async fn persists_changes_without_touching_counter() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(TicketConfig)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_ticket_config(db, "1").await?;
    let repo = TicketConfigRepository::new(db);

    let mut config = repo.find_by_guild_id(1).await?.unwrap();
    repo.next_ticket_number(1).await?;

    config.categories.insert(
        "billing".to_string(),
        TicketCategory {
            name: "Billing".to_string(),
            description: Some("Payments".to_string()),
            emoji: Some("💳".to_string()),
        },
    );
    config.support_role_ids = vec![10, 11];
    config.transcript_channel_id = Some(500);
    config.max_tickets_per_user = 3;
    config.delete_on_close = false;

    let saved = repo.save(&config).await?;

    assert_eq!(saved.categories.len(), 2);
    assert_eq!(saved.categories["billing"].emoji.as_deref(), Some("💳"));
    assert_eq!(saved.support_role_ids, vec![10, 11]);
    assert_eq!(saved.transcript_channel_id, Some(500));
    assert_eq!(saved.max_tickets_per_user, 3);
    assert!(!saved.delete_on_close);
    assert_eq!(saved.ticket_counter, 1);

    Ok(())
}
