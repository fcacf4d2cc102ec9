use chrono::{TimeZone, Utc};

use super::*;

fn message(id: u64, author: &str, content: &str, minute: u32) -> ChannelMessage {
    ChannelMessage {
        id,
        author_id: id,
        author_name: author.to_string(),
        content: content.to_string(),
        timestamp: Utc.with_ymd_and_hms(2026, 3, 1, 12, minute, 0).unwrap(),
        attachments: Vec::new(),
        bot: false,
    }
}

/// Tests closing a ticket whose channel was already deleted by hand.
///
/// Expected: Ok(Deleted) with `channel_existed` false and the record removed
#[tokio::test]
async fn close_succeeds_when_channel_is_gone() -> Result<(), DbErr> {
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

    let outcome = TicketService::new(db, &discord)
        .close(500, member(100))
        .await
        .unwrap();

    assert!(matches!(
        outcome,
        CloseOutcome::Deleted {
            channel_existed: false,
            ..
        }
    ));
    assert_eq!(Ticket::find().count(db).await?, 0);

    Ok(())
}

/// Tests the full close flow with deletion enabled.
///
/// The channel has history and a transcript channel is configured.
///
/// Expected: Ok(Deleted), the channel deleted, the transcript posted and sent to the opener
#[tokio::test]
async fn close_posts_transcript_and_deletes_channel() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ticket_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let discord = FakeConnector::new();

    factory::ticket_config::TicketConfigFactory::new(db)
        .guild_id("10")
        .transcript_channel_id(Some("900".to_string()))
        .build()
        .await?;
    factory::ticket::TicketFactory::new(db)
        .guild_id("10")
        .channel_id("500")
        .user_id("100")
        .number(7)
        .build()
        .await?;
    discord.add_channel(500, 10);
    discord.set_history(
        500,
        vec![
            message(1, "alice", "hello", 0),
            message(2, "staff", "how can I help?", 1),
        ],
    );

    let outcome = TicketService::new(db, &discord)
        .close(500, staff(300))
        .await
        .unwrap();

    assert!(matches!(
        outcome,
        CloseOutcome::Deleted {
            channel_existed: true,
            ..
        }
    ));
    assert_eq!(discord.state().deleted_channels, vec![500]);

    let posted = discord.sent_to(900);
    assert_eq!(posted.len(), 1);
    let file = posted[0].attachment.as_ref().unwrap();
    assert_eq!(file.filename, "transcript-ticket-0007.txt");
    let text = String::from_utf8(file.data.clone()).unwrap();
    assert!(text.contains("[2026-03-01 12:00:00] alice: hello"));
    assert!(text.find("alice").unwrap() < text.find("how can I help?").unwrap());

    let dms = discord.state().dms.clone();
    assert_eq!(dms.len(), 1);
    assert_eq!(dms[0].0, 100);

    Ok(())
}

/// Tests that a failed DM does not stop the close.
///
/// Expected: Ok with the record removed
#[tokio::test]
async fn close_ignores_dm_failure() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ticket_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let discord = FakeConnector::new();
    discord.state().fail_dms = true;

    let (_, ticket) = factory::helpers::create_ticket_with_config(db).await?;
    let user_id: u64 = ticket.user_id.parse().unwrap();
    let channel_id: u64 = ticket.channel_id.parse().unwrap();

    TicketService::new(db, &discord)
        .close(channel_id, member(user_id))
        .await
        .unwrap();

    assert_eq!(Ticket::find().count(db).await?, 0);

    Ok(())
}

/// Tests closing without deletion.
///
/// Expected: Ok(Locked) with status closed, `closed_at` set, the opener unable to send
/// and a Reopen button posted
#[tokio::test]
async fn close_locks_channel_when_not_deleting() -> Result<(), DbErr> {
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

    let outcome = TicketService::new(db, &discord)
        .close(500, member(100))
        .await
        .unwrap();

    let CloseOutcome::Locked(ticket) = outcome else {
        panic!("expected the ticket to be locked");
    };
    assert_eq!(ticket.status, TicketStatus::Closed);
    assert!(ticket.closed_at.is_some());

    let state = discord.state();
    let access = &state.channels.get(&500).unwrap().access;
    assert!(access.iter().any(|a| a.deny.send_messages()));
    drop(state);

    let sent = discord.sent_to(500);
    assert!(sent
        .iter()
        .any(|m| m.custom_ids() == vec!["ticket:reopen".to_string()]));

    Ok(())
}

/// Tests that another member cannot close someone else's ticket.
///
/// Expected: Err(NotTicketStaff) and the record kept
#[tokio::test]
async fn close_requires_opener_or_staff() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ticket_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let discord = FakeConnector::new();

    let (_, ticket) = factory::helpers::create_ticket_with_config(db).await?;
    let channel_id: u64 = ticket.channel_id.parse().unwrap();

    let result = TicketService::new(db, &discord)
        .close(channel_id, member(999_999))
        .await;

    assert!(is_command_error(&result, &CommandError::NotTicketStaff));
    assert_eq!(Ticket::find().count(db).await?, 1);

    Ok(())
}

/// Tests closing in a channel that is not a ticket.
///
/// Expected: Err(NotATicketChannel)
#[tokio::test]
async fn close_outside_ticket_channel() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ticket_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let discord = FakeConnector::new();

    let result = TicketService::new(db, &discord).close(1, member(1)).await;

    assert!(is_command_error(&result, &CommandError::NotATicketChannel));

    Ok(())
}
