use super::*;

/// Tests looking up tickets by channel and by number.
///
/// Expected: Ok(Some) for the known channel and number, Ok(None) otherwise
#[tokio::test]
async fn finds_ticket_by_channel_and_number() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_table(Ticket).build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let created = factory::ticket::TicketFactory::new(db)
        .guild_id("10")
        .channel_id("20")
        .number(3)
        .build()
        .await?;

    let repo = TicketRepository::new(db);

    let by_channel = repo.find_by_channel_id(20).await?.unwrap();
    assert_eq!(by_channel.id, created.id);

    let by_number = repo.find_by_number(10, 3).await?.unwrap();
    assert_eq!(by_number.id, created.id);

    assert!(repo.find_by_channel_id(21).await?.is_none());
    assert!(repo.find_by_number(11, 3).await?.is_none());

    Ok(())
}
