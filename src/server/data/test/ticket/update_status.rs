use super::*;

/// Tests closing then reopening a ticket.
///
/// Verifies `closed_at` is stamped on close and cleared on reopen.
///
/// Expected: Ok with `closed_at` tracking the status
#[tokio::test]
async fn stamps_and_clears_closed_at() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_table(Ticket).build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let created = factory::create_ticket(db, "1", "2").await?;
    let repo = TicketRepository::new(db);

    let closed = repo.update_status(created.id, TicketStatus::Closed).await?;
    assert_eq!(closed.status, TicketStatus::Closed);
    assert!(closed.closed_at.is_some());

    let reopened = repo.update_status(created.id, TicketStatus::Open).await?;
    assert_eq!(reopened.status, TicketStatus::Open);
    assert!(reopened.closed_at.is_none());

    Ok(())
}

/// Tests claiming a ticket.
///
/// Expected: Ok with `claimed_by` set
#[tokio::test]
async fn records_claim() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_table(Ticket).build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let created = factory::create_ticket(db, "1", "2").await?;
    let repo = TicketRepository::new(db);

    let claimed = repo.set_claimed_by(created.id, 99).await?;

    assert_eq!(claimed.claimed_by, Some(99));

    Ok(())
}

/// Tests updating a ticket id that does not exist.
///
/// Expected: Err(RecordNotFound)
#[tokio::test]
async fn fails_for_missing_ticket() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_table(Ticket).build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = TicketRepository::new(db);
    let result = repo.update_status(12345, TicketStatus::Closed).await;

    assert!(matches!(result, Err(DbErr::RecordNotFound(_))));

    Ok(())
}
