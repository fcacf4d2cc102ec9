//! Plain-text transcripts of ticket channels.

use chrono::{DateTime, Utc};

use crate::server::{discord::connector::ChannelMessage, model::ticket::Ticket};

/// Most messages Discord returns in one history request.
pub const TRANSCRIPT_MESSAGE_LIMIT: u8 = 100;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct TranscriptHeader<'a> {
    pub ticket: &'a Ticket,
    /// Display name of whoever triggered the export.
    pub requested_by: &'a str,
    pub generated_at: DateTime<Utc>,
}

/// Renders a transcript: a header block, then one line per message, oldest first.
///
/// Each message line is `[YYYY-MM-DD HH:MM:SS] author: content`, followed by
/// one indented line per attachment URL. Messages may be passed in any order.
pub fn build_transcript(header: &TranscriptHeader<'_>, messages: &[ChannelMessage]) -> String {
    let ticket = header.ticket;
    let mut ordered: Vec<&ChannelMessage> = messages.iter().collect();
    ordered.sort_by_key(|m| (m.timestamp, m.id));

    let mut out = String::new();
    out.push_str(&format!(
        "Transcript for ticket #{} ({})\n",
        ticket.padded_number(),
        ticket.category
    ));
    out.push_str(&format!("Channel: {}\n", Ticket::channel_name(ticket.number)));
    out.push_str(&format!("Opened by: {}\n", ticket.user_id));
    out.push_str(&format!(
        "Created: {} UTC\n",
        ticket.created_at.format(TIMESTAMP_FORMAT)
    ));
    if let Some(subject) = &ticket.subject {
        out.push_str(&format!("Subject: {}\n", subject));
    }
    out.push_str(&format!("Status: {}\n", ticket.status.label()));
    out.push_str(&format!(
        "Exported by {} at {} UTC\n",
        header.requested_by,
        header.generated_at.format(TIMESTAMP_FORMAT)
    ));
    out.push_str(&format!("Messages: {}\n", ordered.len()));
    out.push_str(&"-".repeat(40));
    out.push('\n');

    for message in ordered {
        out.push_str(&format!(
            "[{}] {}: {}\n",
            message.timestamp.format(TIMESTAMP_FORMAT),
            message.author_name,
            message.content
        ));
        for url in &message.attachments {
            out.push_str(&format!("    attachment: {}\n", url));
        }
    }

    out
}

/// File name used when posting a transcript.
pub fn transcript_filename(ticket: &Ticket) -> String {
    format!("transcript-{}.txt", Ticket::channel_name(ticket.number))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::server::model::ticket::TicketStatus;

    fn ticket() -> Ticket {
        Ticket::from_entity(
            test_utils::fixture::ticket::entity_builder()
                .number(12)
                .subject(Some("Refund".to_string()))
                .build(),
        )
        .unwrap()
    }

    fn message(id: u64, minute: u32, author: &str, content: &str) -> ChannelMessage {
        ChannelMessage {
            id,
            author_id: id,
            author_name: author.to_string(),
            content: content.to_string(),
            timestamp: Utc.with_ymd_and_hms(2026, 3, 1, 9, minute, 5).unwrap(),
            attachments: Vec::new(),
            bot: false,
        }
    }

    #[test]
    fn lists_messages_oldest_first_with_timestamps() {
        let ticket = ticket();
        let header = TranscriptHeader {
            ticket: &ticket,
            requested_by: "mod",
            generated_at: Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap(),
        };
        let newest_first = vec![
            message(3, 2, "staff", "on it"),
            message(2, 1, "alice", "second"),
            message(1, 0, "alice", "first"),
        ];

        let transcript = build_transcript(&header, &newest_first);
        let body: Vec<&str> = transcript
            .lines()
            .skip_while(|l| !l.starts_with("---"))
            .skip(1)
            .collect();

        assert_eq!(
            body,
            vec![
                "[2026-03-01 09:00:05] alice: first",
                "[2026-03-01 09:01:05] alice: second",
                "[2026-03-01 09:02:05] staff: on it",
            ]
        );
    }

    #[test]
    fn header_describes_ticket() {
        let ticket = ticket();
        let header = TranscriptHeader {
            ticket: &ticket,
            requested_by: "mod",
            generated_at: Utc::now(),
        };

        let transcript = build_transcript(&header, &[]);

        assert!(transcript.starts_with("Transcript for ticket #0012 (support)\n"));
        assert!(transcript.contains("Channel: ticket-0012\n"));
        assert!(transcript.contains("Subject: Refund\n"));
        assert!(transcript.contains(&format!("Status: {}\n", TicketStatus::Open.label())));
        assert!(transcript.contains("Messages: 0\n"));
    }

    #[test]
    fn lists_attachment_urls_under_their_message() {
        let ticket = ticket();
        let header = TranscriptHeader {
            ticket: &ticket,
            requested_by: "mod",
            generated_at: Utc::now(),
        };
        let mut with_file = message(1, 0, "alice", "");
        with_file.attachments = vec!["https://cdn.example/log.txt".to_string()];

        let transcript = build_transcript(&header, &[with_file]);

        assert!(transcript.contains(
            "[2026-03-01 09:00:05] alice: \n    attachment: https://cdn.example/log.txt\n"
        ));
    }

    #[test]
    fn names_file_after_channel() {
        assert_eq!(transcript_filename(&ticket()), "transcript-ticket-0012.txt");
    }
}
