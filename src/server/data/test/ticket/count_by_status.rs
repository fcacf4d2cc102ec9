use super::*;

/// Tests aggregating ticket counts per status.
///
/// Expected: Ok with counts for the guild only, empty statuses absent
#[tokio::test]
async fn counts_tickets_per_status() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_table(Ticket).build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    for status in ["open", "open", "waiting", "closed"] {
        factory::ticket::TicketFactory::new(db)
            .guild_id("1")
            .status(status)
            .build()
            .await?;
    }
    factory::create_ticket(db, "2", "5").await?;

    let repo = TicketRepository::new(db);

    let guild_counts = repo.count_by_status(Some(1)).await?;
    assert_eq!(guild_counts.get(&TicketStatus::Open), Some(&2));
    assert_eq!(guild_counts.get(&TicketStatus::Waiting), Some(&1));
    assert_eq!(guild_counts.get(&TicketStatus::Closed), Some(&1));
    assert_eq!(guild_counts.get(&TicketStatus::Archived), None);

    let all_counts = repo.count_by_status(None).await?;
    assert_eq!(all_counts.get(&TicketStatus::Open), Some(&3));

    Ok(())
}
