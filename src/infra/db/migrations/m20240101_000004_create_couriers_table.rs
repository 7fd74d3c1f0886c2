//! Migration: Create couriers table.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Couriers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Couriers::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Couriers::UserId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Couriers::Status)
                            .string_len(20)
                            .not_null()
                            .default("activo"),
                    )
                    .col(
                        ColumnDef::new(Couriers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_domiciliarios_usuario")
                            .from(Couriers::Table, Couriers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Couriers::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Couriers {
    #[iden = "domiciliarios"]
    Table,
    Id,
    #[iden = "usuario_id"]
    UserId,
    #[iden = "estado"]
    Status,
    #[iden = "creado_en"]
    CreatedAt,
}
