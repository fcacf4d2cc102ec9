use super::*;

/// Tests opening a ticket in a guild with no configuration yet.
///
/// Expected: Ok with ticket #1 in the default category, a private channel and a welcome message
#[tokio::test]
async fn opens_first_ticket_with_default_config() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ticket_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let discord = FakeConnector::new();

    let ticket = TicketService::new(db, &discord)
        .open(
            OpenTicket {
                subject: Some("Cannot log in".to_string()),
                ..open_request(10)
            },
            member(100),
        )
        .await
        .unwrap();

    assert_eq!(ticket.number, 1);
    assert_eq!(ticket.category, "support");
    assert_eq!(ticket.status, TicketStatus::Open);
    assert_eq!(ticket.subject.as_deref(), Some("Cannot log in"));

    let state = discord.state();
    let channel = state.channels.get(&ticket.channel_id).unwrap();
    assert_eq!(channel.name, "ticket-0001");
    assert_eq!(channel.guild_id, 10);
    assert!(channel.access.iter().any(|a| a.deny.view_channel()));
    drop(state);

    let sent = discord.sent_to(ticket.channel_id);
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0].custom_ids(),
        vec!["ticket:close".to_string(), "ticket:claim".to_string()]
    );

    Ok(())
}

/// Tests that ticket numbers keep counting per guild.
///
/// Expected: Ok with numbers 1 and 2 for two users
#[tokio::test]
async fn numbers_tickets_sequentially() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ticket_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let discord = FakeConnector::new();
    let service = TicketService::new(db, &discord);

    let first = service.open(open_request(10), member(100)).await.unwrap();
    let second = service.open(open_request(10), member(101)).await.unwrap();

    assert_eq!(first.number, 1);
    assert_eq!(second.number, 2);

    Ok(())
}

/// Tests that opening is denied once the user holds the maximum number of active tickets.
///
/// The configuration allows one ticket and the user already has one open.
///
/// Expected: Err(TicketLimitReached) and no new channel or record
#[tokio::test]
async fn denies_ticket_over_limit() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ticket_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let discord = FakeConnector::new();

    factory::ticket_config::TicketConfigFactory::new(db)
        .guild_id("10")
        .max_tickets_per_user(1)
        .build()
        .await?;
    factory::create_ticket(db, "10", "100").await?;

    let result = TicketService::new(db, &discord)
        .open(open_request(10), member(100))
        .await;

    assert!(is_command_error(
        &result,
        &CommandError::TicketLimitReached { max: 1 }
    ));
    assert!(discord.state().channels.is_empty());
    assert_eq!(Ticket::find().count(db).await?, 1);

    Ok(())
}

/// Tests that closed tickets do not count toward the limit.
///
/// Expected: Ok
#[tokio::test]
async fn closed_tickets_do_not_count() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ticket_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let discord = FakeConnector::new();

    factory::ticket_config::TicketConfigFactory::new(db)
        .guild_id("10")
        .ticket_counter(1)
        .build()
        .await?;
    factory::ticket::TicketFactory::new(db)
        .guild_id("10")
        .user_id("100")
        .status("closed")
        .build()
        .await?;

    let ticket = TicketService::new(db, &discord)
        .open(open_request(10), member(100))
        .await
        .unwrap();

    assert_eq!(ticket.number, 2);

    Ok(())
}

/// Tests opening a ticket in a category that does not exist.
///
/// Expected: Err(UnknownTicketCategory)
#[tokio::test]
async fn rejects_unknown_category() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ticket_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let discord = FakeConnector::new();

    let result = TicketService::new(db, &discord)
        .open(
            OpenTicket {
                category: Some("billing"),
                ..open_request(10)
            },
            member(100),
        )
        .await;

    assert!(is_command_error(
        &result,
        &CommandError::UnknownTicketCategory("billing".to_string())
    ));

    Ok(())
}
