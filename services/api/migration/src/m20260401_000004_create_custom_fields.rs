use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CustomFields::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CustomFields::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CustomFields::EventId).uuid().not_null())
                    .col(ColumnDef::new(CustomFields::FieldName).string().not_null())
                    .col(ColumnDef::new(CustomFields::FieldType).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(CustomFields::Table, CustomFields::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(CustomFields::Table)
                    .col(CustomFields::EventId)
                    .name("idx_custom_fields_event_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CustomFields::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum CustomFields {
    Table,
    Id,
    EventId,
    FieldName,
    FieldType,
}

#[derive(Iden)]
enum Events {
    Table,
    Id,
}
