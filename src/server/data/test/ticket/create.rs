use super::*;

/// Tests creating a ticket record.
///
/// Expected: Ok with status `open`, no claim and no `closed_at`
#[tokio::test]
async fn creates_open_ticket() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_table(Ticket).build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = TicketRepository::new(db);
    let ticket = repo
        .create(CreateTicketParam {
            guild_id: 1,
            channel_id: 2,
            user_id: 3,
            number: 7,
            category: "support".to_string(),
            subject: Some("Cannot log in".to_string()),
        })
        .await?;

    assert_eq!(ticket.channel_id, 2);
    assert_eq!(ticket.number, 7);
    assert_eq!(ticket.status, TicketStatus::Open);
    assert_eq!(ticket.subject.as_deref(), Some("Cannot log in"));
    assert!(ticket.claimed_by.is_none());
    assert!(ticket.closed_at.is_none());

    let stored = entity::prelude::Ticket::find_by_id(ticket.id).one(db).await?;
    assert!(stored.is_some());

    Ok(())
}

/// Tests that two tickets cannot share a channel.
///
/// Expected: Err from the unique constraint on channel_id
#[tokio::test]
async fn rejects_duplicate_channel() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_table(Ticket).build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::ticket::TicketFactory::new(db)
        .channel_id("2")
        .build()
        .await?;

    let repo = TicketRepository::new(db);
    let result = repo
        .create(CreateTicketParam {
            guild_id: 1,
            channel_id: 2,
            user_id: 3,
            number: 2,
            category: "support".to_string(),
            subject: None,
        })
        .await;

    assert!(result.is_err());

    Ok(())
}
