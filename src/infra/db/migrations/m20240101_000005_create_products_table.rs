//! Migration: Create products table.

use sea_orm_migration::prelude::*;

use super::m20240101_000003_create_establishments_table::Establishments;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Products::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Products::EstablishmentId).uuid().not_null())
                    .col(ColumnDef::new(Products::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Products::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Products::Price)
                            .decimal_len(10, 2)
                            .not_null()
                            .check(Expr::col(Products::Price).gte(0)),
                    )
                    .col(ColumnDef::new(Products::Image).text().null())
                    .col(
                        ColumnDef::new(Products::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_productos_establecimiento")
                            .from(Products::Table, Products::EstablishmentId)
                            .to(Establishments::Table, Establishments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_productos_establecimiento_id")
                    .table(Products::Table)
                    .col(Products::EstablishmentId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_productos_establecimiento_id")
                    .table(Products::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Products {
    #[iden = "productos"]
    Table,
    Id,
    #[iden = "establecimiento_id"]
    EstablishmentId,
    #[iden = "nombre"]
    Name,
    #[iden = "descripcion"]
    Description,
    #[iden = "precio"]
    Price,
    #[iden = "imagen"]
    Image,
    #[iden = "creado_en"]
    CreatedAt,
}
