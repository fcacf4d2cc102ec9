use super::*;

/// Tests that only open, in-progress and waiting tickets count.
///
/// Creates one ticket in every status for the same user plus tickets for
/// another user and another guild.
///
/// Expected: Ok(3)
#[tokio::test]
async fn counts_only_active_tickets_for_user_in_guild() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_table(Ticket).build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    for status in ["open", "in_progress", "waiting", "closed", "archived"] {
        factory::ticket::TicketFactory::new(db)
            .guild_id("1")
            .user_id("100")
            .status(status)
            .build()
            .await?;
    }
    factory::create_ticket(db, "1", "200").await?;
    factory::create_ticket(db, "2", "100").await?;

    let repo = TicketRepository::new(db);

    assert_eq!(repo.count_active_by_user(1, 100).await?, 3);
    assert_eq!(repo.count_active_by_user(1, 300).await?, 0);

    Ok(())
}

/// Tests listing the active tickets of a guild.
///
/// Expected: Ok with closed tickets excluded, ordered by number
#[tokio::test]
async fn lists_active_tickets_by_number() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_table(Ticket).build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    for (number, status) in [(3, "open"), (1, "waiting"), (2, "closed")] {
        factory::ticket::TicketFactory::new(db)
            .guild_id("1")
            .number(number)
            .status(status)
            .build()
            .await?;
    }

    let repo = TicketRepository::new(db);
    let tickets = repo.get_active_by_guild(1).await?;

    let numbers: Vec<i32> = tickets.iter().map(|t| t.number).collect();
    assert_eq!(numbers, vec![1, 3]);

    Ok(())
}
