//! User repository.

use async_trait::async_trait;
use domain::Role;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QuerySelect, Set,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{CreateUser, User};
use crate::errors::{is_unique_violation, AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Look up by an already normalized email
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Insert a user holding only the client role.
    ///
    /// A duplicate email is reported as a conflict even when the insert
    /// races past an earlier lookup.
    async fn create(&self, user: CreateUser) -> AppResult<User>;
}

pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;

        Ok(result.map(User::from))
    }

    async fn create(&self, user: CreateUser) -> AppResult<User> {
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            name: Set(user.name),
            roles: Set(vec![Role::Client.key().to_string()]),
            created_at: Set(chrono::Utc::now()),
        };

        let model = active_model.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict("Ya existe una cuenta con ese correo")
            } else {
                AppError::from(e)
            }
        })?;

        Ok(User::from(model))
    }
}

/// Append `role` to a user's role set inside an open transaction.
///
/// The row is locked first so concurrent grants for the same user
/// cannot overwrite each other. Already held roles are left alone.
pub(crate) async fn append_role<C>(conn: &C, user_id: Uuid, role: &Role) -> AppResult<User>
where
    C: ConnectionTrait,
{
    let model = UserEntity::find_by_id(user_id)
        .lock_exclusive()
        .one(conn)
        .await?
        .ok_or_else(|| AppError::not_found("Usuario no encontrado"))?;

    let key = role.key().to_string();
    if model.roles.contains(&key) {
        return Ok(User::from(model));
    }

    let mut roles = model.roles.clone();
    roles.push(key);

    let mut active: ActiveModel = model.into();
    active.roles = Set(roles);

    let model = active.update(conn).await?;
    Ok(User::from(model))
}
