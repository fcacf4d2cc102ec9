use crate::server::{
    data::ticket::TicketRepository,
    model::ticket::{CreateTicketParam, TicketStatus},
};
use entity::prelude::*;
use sea_orm::{DbErr, EntityTrait};
use test_utils::{builder::TestBuilder, factory};

mod count_active_by_user;
mod count_by_status;
mod create;
mod delete;
mod find_by_channel_id;
mod update_status;
