use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GuildSettings::Table)
                    .if_not_exists()
                    .col(pk_auto(GuildSettings::Id))
                    .col(string_uniq(GuildSettings::GuildId))
                    .col(string(GuildSettings::Prefix))
                    .col(string_null(GuildSettings::LogChannelId))
                    .col(boolean(GuildSettings::LogMessageDelete).default(false))
                    .col(boolean(GuildSettings::LogMessageEdit).default(false))
                    .col(boolean(GuildSettings::LogMemberJoin).default(false))
                    .col(boolean(GuildSettings::LogMemberLeave).default(false))
                    .col(boolean(GuildSettings::LogModeration).default(true))
                    .col(boolean(GuildSettings::AutomodEnabled).default(false))
                    .col(boolean(GuildSettings::AntiInvite).default(false))
                    .col(boolean(GuildSettings::AntiLink).default(false))
                    .col(integer(GuildSettings::MaxMentions).default(0))
                    .col(json(GuildSettings::BannedWords))
                    .col(string_null(GuildSettings::WelcomeChannelId))
                    .col(text_null(GuildSettings::WelcomeMessage))
                    .col(json(GuildSettings::ModRoleIds))
                    .col(json(GuildSettings::AutomodExemptRoleIds))
                    .col(json(GuildSettings::DisabledChannelIds))
                    .col(timestamp(GuildSettings::CreatedAt))
                    .col(timestamp(GuildSettings::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GuildSettings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum GuildSettings {
    Table,
    Id,
    GuildId,
    Prefix,
    LogChannelId,
    LogMessageDelete,
    LogMessageEdit,
    LogMemberJoin,
    LogMemberLeave,
    LogModeration,
    AutomodEnabled,
    AntiInvite,
    AntiLink,
    MaxMentions,
    BannedWords,
    WelcomeChannelId,
    WelcomeMessage,
    ModRoleIds,
    AutomodExemptRoleIds,
    DisabledChannelIds,
    CreatedAt,
    UpdatedAt,
}
