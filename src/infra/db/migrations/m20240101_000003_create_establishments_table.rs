//! Migration: Create establishments table.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;
use super::m20240101_000002_create_establishment_types_table::EstablishmentTypes;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Establishments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Establishments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    // One establishment per owner
                    .col(
                        ColumnDef::new(Establishments::UserId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Establishments::TypeId).uuid().not_null())
                    .col(
                        ColumnDef::new(Establishments::BusinessName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Establishments::Address).text().null())
                    .col(ColumnDef::new(Establishments::Phone).string_len(50).null())
                    .col(
                        ColumnDef::new(Establishments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_establecimientos_usuario")
                            .from(Establishments::Table, Establishments::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_establecimientos_tipo")
                            .from(Establishments::Table, Establishments::TypeId)
                            .to(EstablishmentTypes::Table, EstablishmentTypes::Id),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Establishments::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Establishments {
    #[iden = "establecimientos"]
    Table,
    Id,
    #[iden = "usuario_id"]
    UserId,
    #[iden = "tipo_id"]
    TypeId,
    #[iden = "nombre_negocio"]
    BusinessName,
    #[iden = "direccion"]
    Address,
    #[iden = "telefono"]
    Phone,
    #[iden = "creado_en"]
    CreatedAt,
}
