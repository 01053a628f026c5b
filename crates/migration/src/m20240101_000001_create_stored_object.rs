//! Create `stored_object` table.
//!
//! One row per registry entry keyed by `"<Class>.<id>"`; the serialized
//! record lives in `payload`, class and timestamps are lifted into columns.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StoredObject::Table)
                    .if_not_exists()
                    .col(string_len(StoredObject::Key, 255).primary_key())
                    .col(string_len(StoredObject::Class, 32))
                    .col(string_len(StoredObject::ObjectId, 255))
                    .col(date_time(StoredObject::CreatedAt))
                    .col(date_time(StoredObject::UpdatedAt))
                    .col(json(StoredObject::Payload))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_stored_object_class")
                    .table(StoredObject::Table)
                    .col(StoredObject::Class)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(StoredObject::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum StoredObject { Table, Key, Class, ObjectId, CreatedAt, UpdatedAt, Payload }
