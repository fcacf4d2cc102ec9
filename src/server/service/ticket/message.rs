//! Messages posted into ticket channels and the ticket panel.

use serenity::all::{ButtonStyle, CreateActionRow, CreateButton, CreateEmbed, ReactionType};

use crate::server::{
    discord::{
        connector::OutgoingMessage,
        embed::{base_embed, neutral_embed, primary_embed, success_embed, truncate, warning_embed},
    },
    model::{
        ticket::Ticket,
        ticket_config::{TicketCategory, TicketConfig},
    },
};

pub const CLOSE_BUTTON_ID: &str = "ticket:close";
pub const CLAIM_BUTTON_ID: &str = "ticket:claim";
pub const REOPEN_BUTTON_ID: &str = "ticket:reopen";
pub const OPEN_BUTTON_PREFIX: &str = "ticket:open:";
pub const MODAL_PREFIX: &str = "ticket:modal:";

const DEFAULT_WELCOME: &str =
    "Thanks for reaching out. Describe your issue and a staff member will be with you shortly.";

/// First message of a new ticket channel, with Close and Claim buttons.
pub fn welcome_message(
    ticket: &Ticket,
    category: &TicketCategory,
    config: &TicketConfig,
) -> OutgoingMessage {
    let mut embed = primary_embed()
        .title(format!("Ticket #{} · {}", ticket.padded_number(), category.name))
        .description(
            config
                .welcome_message
                .clone()
                .unwrap_or_else(|| DEFAULT_WELCOME.to_string()),
        )
        .field("Opened by", format!("<@{}>", ticket.user_id), true)
        .field("Status", ticket.status.label(), true);
    if let Some(subject) = &ticket.subject {
        embed = embed.field("Subject", truncate(subject, 1024), false);
    }

    let mut mentions = format!("<@{}>", ticket.user_id);
    for role_id in &config.support_role_ids {
        mentions.push_str(&format!(" <@&{}>", role_id));
    }

    let buttons = CreateActionRow::Buttons(vec![
        CreateButton::new(CLOSE_BUTTON_ID)
            .label("Close")
            .style(ButtonStyle::Danger),
        CreateButton::new(CLAIM_BUTTON_ID)
            .label("Claim")
            .style(ButtonStyle::Secondary),
    ]);

    OutgoingMessage::new()
        .content(mentions)
        .embed(embed)
        .components(vec![buttons])
}

/// Posted when a ticket is closed without deleting its channel.
pub fn closed_message(ticket: &Ticket, closed_by: u64) -> OutgoingMessage {
    let embed = warning_embed()
        .title(format!("Ticket #{} closed", ticket.padded_number()))
        .description(format!("Closed by <@{}>.", closed_by));
    let buttons = CreateActionRow::Buttons(vec![CreateButton::new(REOPEN_BUTTON_ID)
        .label("Reopen")
        .style(ButtonStyle::Success)]);

    OutgoingMessage::new().embed(embed).components(vec![buttons])
}

pub fn reopened_message(ticket: &Ticket, reopened_by: u64) -> OutgoingMessage {
    OutgoingMessage::new().embed(
        success_embed()
            .title(format!("Ticket #{} reopened", ticket.padded_number()))
            .description(format!("Reopened by <@{}>.", reopened_by)),
    )
}

pub fn claimed_message(staff_id: u64) -> OutgoingMessage {
    OutgoingMessage::new().embed(
        success_embed().description(format!("<@{}> will handle this ticket.", staff_id)),
    )
}

/// Transcript file posted to the transcript channel or sent to the opener.
pub fn transcript_message(ticket: &Ticket, filename: &str, transcript: &str) -> OutgoingMessage {
    OutgoingMessage::new()
        .embed(
            neutral_embed()
                .title(format!("Transcript · Ticket #{}", ticket.padded_number()))
                .field("Opened by", format!("<@{}>", ticket.user_id), true)
                .field("Category", ticket.category.clone(), true),
        )
        .attachment(filename, transcript.as_bytes().to_vec())
}

/// Summary embed used by `ticket view`.
pub fn ticket_embed(ticket: &Ticket) -> CreateEmbed {
    let mut embed = primary_embed()
        .title(format!("Ticket #{}", ticket.padded_number()))
        .field("Channel", format!("<#{}>", ticket.channel_id), true)
        .field("Opened by", format!("<@{}>", ticket.user_id), true)
        .field("Status", ticket.status.label(), true)
        .field("Category", ticket.category.clone(), true)
        .field(
            "Claimed by",
            ticket
                .claimed_by
                .map(|id| format!("<@{}>", id))
                .unwrap_or_else(|| "Unclaimed".to_string()),
            true,
        )
        .field(
            "Created",
            format!("<t:{}:R>", ticket.created_at.timestamp()),
            true,
        );
    if let Some(subject) = &ticket.subject {
        embed = embed.field("Subject", truncate(subject, 1024), false);
    }
    embed
}

/// The ticket panel: the configured appearance plus one button per category.
///
/// Discord allows five buttons per row and five rows per message, which matches
/// the 25 category limit.
pub fn panel_message(config: &TicketConfig) -> OutgoingMessage {
    let mut embed = base_embed(config.panel.color)
        .title(config.panel.title.clone())
        .description(config.panel.description.clone());
    for category in config.categories.values() {
        if let Some(description) = &category.description {
            embed = embed.field(category_label(category), description.clone(), false);
        }
    }

    let buttons: Vec<CreateButton> = config
        .categories
        .iter()
        .map(|(key, category)| {
            let mut button = CreateButton::new(format!("{}{}", OPEN_BUTTON_PREFIX, key))
                .label(truncate(&category.name, 80))
                .style(ButtonStyle::Primary);
            if let Some(emoji) = &category.emoji {
                button = button.emoji(ReactionType::Unicode(emoji.clone()));
            }
            button
        })
        .collect();
    let rows = buttons
        .chunks(5)
        .map(|chunk| CreateActionRow::Buttons(chunk.to_vec()))
        .collect();

    OutgoingMessage::new().embed(embed).components(rows)
}

fn category_label(category: &TicketCategory) -> String {
    match &category.emoji {
        Some(emoji) => format!("{} {}", emoji, category.name),
        None => category.name.clone(),
    }
}
