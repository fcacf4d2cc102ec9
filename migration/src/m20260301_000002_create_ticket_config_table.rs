use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TicketConfig::Table)
                    .if_not_exists()
                    .col(pk_auto(TicketConfig::Id))
                    .col(string_uniq(TicketConfig::GuildId))
                    .col(json(TicketConfig::Categories))
                    .col(json(TicketConfig::SupportRoleIds))
                    .col(string_null(TicketConfig::ParentCategoryId))
                    .col(string_null(TicketConfig::TranscriptChannelId))
                    .col(integer(TicketConfig::MaxTicketsPerUser).default(1))
                    .col(integer(TicketConfig::TicketCounter).default(0))
                    .col(boolean(TicketConfig::DeleteOnClose).default(true))
                    .col(string(TicketConfig::PanelTitle))
                    .col(text(TicketConfig::PanelDescription))
                    .col(integer(TicketConfig::PanelColor))
                    .col(text_null(TicketConfig::WelcomeMessage))
                    .col(timestamp(TicketConfig::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TicketConfig::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TicketConfig {
    Table,
    Id,
    GuildId,
    Categories,
    SupportRoleIds,
    ParentCategoryId,
    TranscriptChannelId,
    MaxTicketsPerUser,
    TicketCounter,
    DeleteOnClose,
    PanelTitle,
    PanelDescription,
    PanelColor,
    WelcomeMessage,
    UpdatedAt,
}
