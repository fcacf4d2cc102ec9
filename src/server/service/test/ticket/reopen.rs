use super::*;

/// Tests reopening a closed ticket.
///
/// Expected: Ok with status open, `closed_at` cleared and the opener able to send again
#[tokio::test]
async fn reopens_closed_ticket() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ticket_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let discord = FakeConnector::new();

    factory::ticket_config::TicketConfigFactory::new(db)
        .guild_id("10")
        .delete_on_close(false)
        .build()
        .await?;
    factory::ticket::TicketFactory::new(db)
        .guild_id("10")
        .channel_id("500")
        .user_id("100")
        .build()
        .await?;
    discord.add_channel(500, 10);

    let service = TicketService::new(db, &discord);
    service.close(500, member(100)).await.unwrap();
    let ticket = service.reopen(500, member(100)).await.unwrap();

    assert_eq!(ticket.status, TicketStatus::Open);
    assert!(ticket.closed_at.is_none());

    let state = discord.state();
    let access = &state.channels.get(&500).unwrap().access;
    let opener = access
        .iter()
        .find(|a| a.target == crate::server::discord::connector::AccessTarget::Member(100))
        .unwrap();
    assert!(opener.allow.send_messages());
    assert!(!opener.deny.send_messages());

    Ok(())
}

/// Tests that only closed tickets can be reopened.
///
/// Expected: Err(InvalidStatusTransition) for an open ticket
#[tokio::test]
async fn rejects_reopening_active_ticket() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ticket_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let discord = FakeConnector::new();

    let (_, ticket) = factory::helpers::create_ticket_with_config(db).await?;
    let channel_id: u64 = ticket.channel_id.parse().unwrap();

    let result = TicketService::new(db, &discord)
        .reopen(channel_id, staff(1))
        .await;

    assert!(is_command_error(
        &result,
        &CommandError::InvalidStatusTransition {
            from: "open".to_string(),
            to: "open".to_string(),
        }
    ));

    Ok(())
}

/// Tests that an archived ticket stays archived.
///
/// Expected: Err(InvalidStatusTransition)
#[tokio::test]
async fn rejects_reopening_archived_ticket() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ticket_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let discord = FakeConnector::new();

    factory::ticket_config::TicketConfigFactory::new(db)
        .guild_id("10")
        .build()
        .await?;
    factory::ticket::TicketFactory::new(db)
        .guild_id("10")
        .channel_id("500")
        .status("archived")
        .build()
        .await?;

    let result = TicketService::new(db, &discord).reopen(500, staff(1)).await;

    assert!(matches!(
        result,
        Err(AppError::CommandErr(CommandError::InvalidStatusTransition { .. }))
    ));

    Ok(())
}
