use crate::server::{
    data::guild_settings::GuildSettingsRepository,
    model::guild_settings::{AutomodConfig, LoggingToggles, UpdateGuildSettingsParam},
};
use entity::prelude::*;
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod create_default;
mod find_by_guild_id;
mod update;
