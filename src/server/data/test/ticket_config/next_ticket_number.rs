use super::*;

/// Tests that ticket numbers increase by one per call.
///
/// Expected: Ok(6) then Ok(7) for a counter starting at 5
#[tokio::test]
async fn increments_counter() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(TicketConfig)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::ticket_config::TicketConfigFactory::new(db)
        .guild_id("1")
        .ticket_counter(5)
        .build()
        .await?;

    let repo = TicketConfigRepository::new(db);

    assert_eq!(repo.next_ticket_number(1).await?, 6);
    assert_eq!(repo.next_ticket_number(1).await?, 7);
    assert_eq!(repo.find_by_guild_id(1).await?.unwrap().ticket_counter, 7);

    Ok(())
}

/// Tests numbering for a guild without configuration.
///
/// Expected: Err(RecordNotFound)
#[tokio::test]
async fn fails_without_config() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(TicketConfig)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = TicketConfigRepository::new(db);

    assert!(matches!(
        repo.next_ticket_number(1).await,
        Err(DbErr::RecordNotFound(_))
    ));

    Ok(())
}

/// Tests concurrent numbering within one guild.
///
/// Expected: every caller gets a distinct number and the counter ends at 3
#[tokio::test]
async fn concurrent_calls_get_distinct_numbers() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(TicketConfig)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::ticket_config::create_ticket_config(db, "1").await?;

    let repo = TicketConfigRepository::new(db);

    let (a, b, c) = tokio::join!(
        repo.next_ticket_number(1),
        repo.next_ticket_number(1),
        repo.next_ticket_number(1)
    );
    let mut numbers = vec![a?, b?, c?];
    numbers.sort();

    assert_eq!(numbers, vec![1, 2, 3]);
    assert_eq!(repo.find_by_guild_id(1).await?.unwrap().ticket_counter, 3);

    Ok(())
}
