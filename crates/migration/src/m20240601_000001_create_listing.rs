//! Create `listing` table.
//! Holds dashboard listings: a name, a description and an optional hosted image URL.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Listing::Table)
                    .if_not_exists()
                    .col(uuid(Listing::Id).primary_key())
                    .col(string(Listing::Name))
                    .col(text(Listing::About))
                    .col(text_null(Listing::Image))
                    .col(timestamp_with_time_zone(Listing::CreatedAt))
                    .col(timestamp_with_time_zone(Listing::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // Listing responses are returned in insertion order
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_listing_created_at")
                    .table(Listing::Table)
                    .col(Listing::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Listing::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Listing {
    Table,
    Id,
    Name,
    About,
    Image,
    CreatedAt,
    UpdatedAt,
}
