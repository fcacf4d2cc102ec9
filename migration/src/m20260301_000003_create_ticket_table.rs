use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Ticket::Table)
                    .if_not_exists()
                    .col(pk_auto(Ticket::Id))
                    .col(string(Ticket::GuildId))
                    .col(string_uniq(Ticket::ChannelId))
                    .col(string(Ticket::UserId))
                    .col(integer(Ticket::Number))
                    .col(string(Ticket::Category))
                    .col(string_null(Ticket::Subject))
                    .col(string(Ticket::Status))
                    .col(string_null(Ticket::ClaimedBy))
                    .col(timestamp(Ticket::CreatedAt))
                    .col(timestamp(Ticket::UpdatedAt))
                    .col(timestamp_null(Ticket::ClosedAt))
                    .to_owned(),
            )
            .await?;

        // Quota checks filter by guild + opener
        manager
            .create_index(
                Index::create()
                    .name("idx_ticket_guild_user")
                    .table(Ticket::Table)
                    .col(Ticket::GuildId)
                    .col(Ticket::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ticket_guild_number")
                    .table(Ticket::Table)
                    .col(Ticket::GuildId)
                    .col(Ticket::Number)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_ticket_guild_number")
                    .table(Ticket::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_ticket_guild_user")
                    .table(Ticket::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Ticket::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Ticket {
    Table,
    Id,
    GuildId,
    ChannelId,
    UserId,
    Number,
    Category,
    Subject,
    Status,
    ClaimedBy,
    CreatedAt,
    UpdatedAt,
    ClosedAt,
}
