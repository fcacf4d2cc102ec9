use crate::server::{
    data::ticket_config::TicketConfigRepository,
    model::ticket_config::{TicketCategory, DEFAULT_CATEGORY_KEY},
};
use entity::prelude::*;
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod create_default;
mod next_ticket_number;
mod save;
