use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Addresses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Addresses::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Addresses::UserId).uuid().not_null())
                    .col(ColumnDef::new(Addresses::Street).string_len(100).not_null())
                    .col(ColumnDef::new(Addresses::Number).string_len(100).not_null())
                    .col(ColumnDef::new(Addresses::Complement).string_len(100))
                    .col(
                        ColumnDef::new(Addresses::District)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Addresses::City).string_len(100).not_null())
                    .col(ColumnDef::new(Addresses::State).string_len(2).not_null())
                    .col(
                        ColumnDef::new(Addresses::PostalCode)
                            .string_len(9)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Addresses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Addresses::Table, Addresses::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Addresses::Table)
                    .col(Addresses::UserId)
                    .name("idx_addresses_user_id")
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Addresses::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Addresses {
    Table,
    Id,
    UserId,
    Street,
    Number,
    Complement,
    District,
    City,
    State,
    PostalCode,
    CreatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
