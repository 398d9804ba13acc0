use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StorageSlot::Table)
                    .if_not_exists()
                    .col(string(StorageSlot::Name).primary_key())
                    .col(text(StorageSlot::Value))
                    .col(big_integer(StorageSlot::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(StorageSlot::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum StorageSlot {
    Table,
    Name,
    Value,
    UpdatedAt,
}
