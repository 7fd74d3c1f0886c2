use sea_orm::entity::prelude::*;

use crate::domain::Establishment;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "establecimientos")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_name = "usuario_id", unique)]
    pub user_id: Uuid,
    #[sea_orm(column_name = "tipo_id")]
    pub type_id: Uuid,
    #[sea_orm(column_name = "nombre_negocio")]
    pub business_name: String,
    #[sea_orm(column_name = "direccion")]
    pub address: Option<String>,
    #[sea_orm(column_name = "telefono")]
    pub phone: Option<String>,
    #[sea_orm(column_name = "creado_en")]
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::establishment_type::Entity",
        from = "Column::TypeId",
        to = "super::establishment_type::Column::Id"
    )]
    EstablishmentType,
    #[sea_orm(has_many = "super::product::Entity")]
    Product,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::establishment_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EstablishmentType.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Establishment {
    fn from(model: Model) -> Self {
        Establishment {
            id: model.id,
            user_id: model.user_id,
            type_id: model.type_id,
            business_name: model.business_name,
            address: model.address,
            phone: model.phone,
            created_at: model.created_at,
        }
    }
}
