use crate::server::{data::warning::WarningRepository, model::warning::CreateWarningParam};
use entity::prelude::*;
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod create;
mod delete_by_user;
