use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EventAdmins::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(EventAdmins::EventId).uuid().not_null())
                    .col(ColumnDef::new(EventAdmins::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(EventAdmins::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(EventAdmins::EventId)
                            .col(EventAdmins::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(EventAdmins::Table, EventAdmins::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(EventAdmins::Table, EventAdmins::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EventAdmins::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum EventAdmins {
    Table,
    EventId,
    UserId,
    CreatedAt,
}

#[derive(Iden)]
enum Events {
    Table,
    Id,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
