//! Product database entity.
//!
//! Prices are `NUMERIC(10,2)` and map onto `rust_decimal::Decimal`.

use sea_orm::entity::prelude::*;

use crate::domain::Product;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "productos")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_name = "establecimiento_id")]
    pub establishment_id: Uuid,
    #[sea_orm(column_name = "nombre")]
    pub name: String,
    #[sea_orm(column_name = "descripcion")]
    pub description: Option<String>,
    #[sea_orm(column_name = "precio", column_type = "Decimal(Some((10, 2)))")]
    pub price: Decimal,
    #[sea_orm(column_name = "imagen")]
    pub image: Option<String>,
    #[sea_orm(column_name = "creado_en")]
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::establishment::Entity",
        from = "Column::EstablishmentId",
        to = "super::establishment::Column::Id",
        on_delete = "Cascade"
    )]
    Establishment,
}

impl Related<super::establishment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Establishment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Product {
    fn from(model: Model) -> Self {
        Product {
            id: model.id,
            establishment_id: model.establishment_id,
            name: model.name,
            description: model.description.unwrap_or_default(),
            price: model.price,
            image: model.image,
            created_at: model.created_at,
        }
    }
}
