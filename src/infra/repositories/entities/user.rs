//! User database entity for SeaORM.

use domain::Role;
use sea_orm::entity::prelude::*;

use crate::domain::User;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "usuarios")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_name = "correo", unique)]
    pub email: String,
    #[sea_orm(column_name = "contrasena_hash")]
    pub password_hash: String,
    #[sea_orm(column_name = "nombre")]
    pub name: String,
    pub roles: Vec<String>,
    #[sea_orm(column_name = "creado_en")]
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::establishment::Entity")]
    Establishment,
    #[sea_orm(has_one = "super::courier::Entity")]
    Courier,
}

impl Related<super::establishment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Establishment.def()
    }
}

impl Related<super::courier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Courier.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for User {
    fn from(model: Model) -> Self {
        let mut roles: Vec<Role> = model.roles.into_iter().map(Role::from).collect();
        if roles.is_empty() {
            roles.push(Role::Client);
        }

        User {
            id: model.id,
            email: model.email,
            password_hash: model.password_hash,
            name: model.name,
            roles,
            created_at: model.created_at,
        }
    }
}
