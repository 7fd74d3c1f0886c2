//! Migration: Create establishment types and seed the two categories.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const SEED: [(&str, &str); 2] = [
    ("comida", "Comida / Restaurante"),
    ("tienda", "Tienda (otros productos)"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EstablishmentTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EstablishmentTypes::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EstablishmentTypes::Key)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(EstablishmentTypes::Name)
                            .string_len(100)
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        let mut insert = Query::insert();
        insert
            .into_table(EstablishmentTypes::Table)
            .columns([
                EstablishmentTypes::Id,
                EstablishmentTypes::Key,
                EstablishmentTypes::Name,
            ])
            .on_conflict(
                OnConflict::column(EstablishmentTypes::Key)
                    .do_nothing()
                    .to_owned(),
            );
        for (key, name) in SEED {
            insert.values_panic([uuid::Uuid::new_v4().into(), key.into(), name.into()]);
        }

        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EstablishmentTypes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum EstablishmentTypes {
    #[iden = "tipos_establecimiento"]
    Table,
    Id,
    #[iden = "clave"]
    Key,
    #[iden = "nombre"]
    Name,
}
