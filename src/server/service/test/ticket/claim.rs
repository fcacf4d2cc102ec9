use super::*;

/// Tests a staff member claiming an open ticket.
///
/// Expected: Ok with `claimed_by` set and status in progress
#[tokio::test]
async fn staff_claims_open_ticket() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ticket_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let discord = FakeConnector::new();

    let (_, ticket) = factory::helpers::create_ticket_with_config(db).await?;
    let channel_id: u64 = ticket.channel_id.parse().unwrap();

    let ticket = TicketService::new(db, &discord)
        .claim(channel_id, staff(300))
        .await
        .unwrap();

    assert_eq!(ticket.claimed_by, Some(300));
    assert_eq!(ticket.status, TicketStatus::InProgress);

    Ok(())
}

/// Tests that members with a support role count as staff.
///
/// Expected: Ok
#[tokio::test]
async fn support_role_counts_as_staff() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ticket_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let discord = FakeConnector::new();

    factory::ticket_config::TicketConfigFactory::new(db)
        .guild_id("10")
        .support_role_ids(vec!["77".to_string()])
        .build()
        .await?;
    factory::ticket::TicketFactory::new(db)
        .guild_id("10")
        .channel_id("500")
        .build()
        .await?;

    let roles = [77];
    let helper = TicketActor {
        role_ids: &roles,
        ..member(300)
    };

    let ticket = TicketService::new(db, &discord)
        .claim(500, helper)
        .await
        .unwrap();

    assert_eq!(ticket.claimed_by, Some(300));

    Ok(())
}

/// Tests that regular members cannot claim tickets.
///
/// Expected: Err(NotTicketStaff)
#[tokio::test]
async fn member_cannot_claim() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ticket_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let discord = FakeConnector::new();

    let (_, ticket) = factory::helpers::create_ticket_with_config(db).await?;
    let channel_id: u64 = ticket.channel_id.parse().unwrap();

    let result = TicketService::new(db, &discord)
        .claim(channel_id, member(300))
        .await;

    assert!(is_command_error(&result, &CommandError::NotTicketStaff));

    Ok(())
}

/// Tests moving a ticket through statuses.
///
/// Expected: Ok for waiting, Err for closed via set_status
#[tokio::test]
async fn set_status_validates_transitions() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ticket_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let discord = FakeConnector::new();

    let (_, ticket) = factory::helpers::create_ticket_with_config(db).await?;
    let channel_id: u64 = ticket.channel_id.parse().unwrap();
    let service = TicketService::new(db, &discord);

    let ticket = service
        .set_status(channel_id, staff(1), TicketStatus::Waiting)
        .await
        .unwrap();
    assert_eq!(ticket.status, TicketStatus::Waiting);

    let result = service
        .set_status(channel_id, staff(1), TicketStatus::Closed)
        .await;
    assert!(matches!(
        result,
        Err(AppError::CommandErr(CommandError::InvalidArgument { .. }))
    ));

    let result = service
        .set_status(channel_id, staff(1), TicketStatus::Waiting)
        .await;
    assert!(matches!(
        result,
        Err(AppError::CommandErr(CommandError::InvalidStatusTransition { .. }))
    ));

    Ok(())
}

/// Tests adding and removing a member, and that the opener cannot be removed.
///
/// Expected: Ok for the helper, Err(InvalidArgument) for the opener
#[tokio::test]
async fn add_and_remove_users() -> Result<(), DbErr> {
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
        .user_id("100")
        .build()
        .await?;
    discord.add_channel(500, 10);
    let service = TicketService::new(db, &discord);

    service.add_user(500, staff(1), 200).await.unwrap();
    assert_eq!(discord.state().channels.get(&500).unwrap().access.len(), 1);

    service.remove_user(500, staff(1), 200).await.unwrap();
    assert!(discord.state().channels.get(&500).unwrap().access.is_empty());

    let result = service.remove_user(500, staff(1), 100).await;
    assert!(matches!(
        result,
        Err(AppError::CommandErr(CommandError::InvalidArgument { .. }))
    ));

    Ok(())
}
