use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Attendances::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Attendances::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Attendances::UserId).uuid().not_null())
                    .col(ColumnDef::new(Attendances::EventId).uuid().not_null())
                    .col(
                        ColumnDef::new(Attendances::Fields)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Attendances::Verified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Attendances::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Attendances::Table, Attendances::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Duplicate-registration lookups and attendee counts filter on
        // (user_id, event_id) / event_id. Not unique: the one-per-pair
        // invariant lives in the registration transaction.
        manager
            .create_index(
                Index::create()
                    .table(Attendances::Table)
                    .col(Attendances::UserId)
                    .col(Attendances::EventId)
                    .name("idx_attendances_user_id_event_id")
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Attendances::Table)
                    .col(Attendances::EventId)
                    .name("idx_attendances_event_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Attendances::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Attendances {
    Table,
    Id,
    UserId,
    EventId,
    Fields,
    Verified,
    CreatedAt,
}

#[derive(Iden)]
enum Events {
    Table,
    Id,
}
