use sea_orm::entity::prelude::*;

use crate::domain::Courier;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "domiciliarios")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_name = "usuario_id", unique)]
    pub user_id: Uuid,
    #[sea_orm(column_name = "estado")]
    pub status: String,
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
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Courier {
    fn from(model: Model) -> Self {
        Courier {
            id: model.id,
            user_id: model.user_id,
            status: model.status,
            created_at: model.created_at,
        }
    }
}
