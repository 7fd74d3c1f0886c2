//! Courier profile repository.

use async_trait::async_trait;
use domain::{Role, COURIER_STATUS_ACTIVE};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use uuid::Uuid;

use super::entities::courier;
use super::user_repository::append_role;
use crate::domain::{Courier, User};
use crate::errors::{is_unique_violation, AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

pub(crate) const DUPLICATE_COURIER: &str = "Ya estás registrado como domiciliario";

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CourierRepository: Send + Sync {
    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Option<Courier>>;

    /// Insert an active courier profile and grant the courier role atomically.
    async fn create_for_user(&self, user_id: Uuid) -> AppResult<User>;
}

pub struct CourierStore {
    db: DatabaseConnection,
}

impl CourierStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CourierRepository for CourierStore {
    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Option<Courier>> {
        let result = courier::Entity::find()
            .filter(courier::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;

        Ok(result.map(Courier::from))
    }

    async fn create_for_user(&self, user_id: Uuid) -> AppResult<User> {
        let txn = self.db.begin().await?;

        let active_model = courier::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            status: Set(COURIER_STATUS_ACTIVE.to_string()),
            created_at: Set(chrono::Utc::now()),
        };

        active_model.insert(&txn).await.map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict(DUPLICATE_COURIER)
            } else {
                AppError::from(e)
            }
        })?;

        let user = append_role(&txn, user_id, &Role::Courier).await?;
        txn.commit().await?;

        Ok(user)
    }
}
