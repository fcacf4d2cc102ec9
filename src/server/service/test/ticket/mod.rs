use entity::prelude::*;
use sea_orm::{DbErr, EntityTrait, PaginatorTrait};
use serenity::all::Permissions;
use test_utils::{builder::TestBuilder, factory};

use crate::server::{
    discord::{connector::ChannelMessage, fake::FakeConnector},
    error::{command::CommandError, AppError},
    model::ticket::TicketStatus,
    service::ticket::{CloseOutcome, OpenTicket, TicketActor, TicketService},
};

mod claim;
mod close;
mod open;
mod reopen;

fn member(user_id: u64) -> TicketActor<'static> {
    TicketActor {
        user_id,
        name: "member",
        role_ids: &[],
        permissions: Permissions::empty(),
    }
}

fn staff(user_id: u64) -> TicketActor<'static> {
    TicketActor {
        user_id,
        name: "staff",
        role_ids: &[],
        permissions: Permissions::MANAGE_CHANNELS,
    }
}

fn open_request(guild_id: u64) -> OpenTicket<'static> {
    OpenTicket {
        guild_id,
        category: None,
        subject: None,
    }
}

fn is_command_error(result: &Result<impl std::fmt::Debug, AppError>, expected: &CommandError) -> bool {
    matches!(result, Err(AppError::CommandErr(e)) if e == expected)
}
