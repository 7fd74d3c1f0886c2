use sea_orm::entity::prelude::*;

use crate::domain::EstablishmentType;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tipos_establecimiento")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_name = "clave", unique)]
    pub key: String,
    #[sea_orm(column_name = "nombre")]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::establishment::Entity")]
    Establishment,
}

impl Related<super::establishment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Establishment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for EstablishmentType {
    fn from(model: Model) -> Self {
        EstablishmentType {
            id: model.id,
            key: model.key,
            name: model.name,
        }
    }
}
