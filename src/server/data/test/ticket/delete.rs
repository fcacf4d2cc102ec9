use super::*;

/// Tests deleting a ticket record, twice.
///
/// Expected: Ok(1) the first time, Ok(0) once it is gone
#[tokio::test]
async fn deletes_ticket_once() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_table(Ticket).build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let created = factory::create_ticket(db, "1", "2").await?;
    let repo = TicketRepository::new(db);

    assert_eq!(repo.delete(created.id).await?, 1);
    assert_eq!(repo.delete(created.id).await?, 0);
    assert!(entity::prelude::Ticket::find_by_id(created.id)
        .one(db)
        .await?
        .is_none());

    Ok(())
}
