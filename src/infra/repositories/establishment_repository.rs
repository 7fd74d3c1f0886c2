//! Establishment and establishment type repository.

use async_trait::async_trait;
use domain::Role;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use super::entities::{establishment, establishment_type};
use super::user_repository::append_role;
use crate::domain::{
    Establishment, EstablishmentDetails, EstablishmentType, NewEstablishment, User,
};
use crate::errors::{is_unique_violation, AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

pub(crate) const DUPLICATE_ESTABLISHMENT: &str = "Ya tienes un negocio registrado";

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait EstablishmentRepository: Send + Sync {
    /// All categories ordered by display name
    async fn list_types(&self) -> AppResult<Vec<EstablishmentType>>;

    async fn find_type_by_key(&self, key: &str) -> AppResult<Option<EstablishmentType>>;

    /// The establishment owned by `user_id`, with its category
    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Option<EstablishmentDetails>>;

    /// Insert the establishment and grant the establishment role atomically.
    async fn create_for_user(
        &self,
        user_id: Uuid,
        type_id: Uuid,
        establishment: NewEstablishment,
    ) -> AppResult<User>;
}

pub struct EstablishmentStore {
    db: DatabaseConnection,
}

impl EstablishmentStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EstablishmentRepository for EstablishmentStore {
    async fn list_types(&self) -> AppResult<Vec<EstablishmentType>> {
        let models = establishment_type::Entity::find()
            .order_by_asc(establishment_type::Column::Name)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(EstablishmentType::from).collect())
    }

    async fn find_type_by_key(&self, key: &str) -> AppResult<Option<EstablishmentType>> {
        let result = establishment_type::Entity::find()
            .filter(establishment_type::Column::Key.eq(key))
            .one(&self.db)
            .await?;

        Ok(result.map(EstablishmentType::from))
    }

    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Option<EstablishmentDetails>> {
        let row = establishment::Entity::find()
            .filter(establishment::Column::UserId.eq(user_id))
            .find_also_related(establishment_type::Entity)
            .one(&self.db)
            .await?;

        match row {
            None => Ok(None),
            Some((model, Some(kind))) => Ok(Some(EstablishmentDetails {
                establishment: Establishment::from(model),
                kind: EstablishmentType::from(kind),
            })),
            Some((model, None)) => Err(AppError::internal(format!(
                "establishment {} references a missing type",
                model.id
            ))),
        }
    }

    async fn create_for_user(
        &self,
        user_id: Uuid,
        type_id: Uuid,
        establishment: NewEstablishment,
    ) -> AppResult<User> {
        // Dropping the transaction on an early return rolls it back
        let txn = self.db.begin().await?;

        let active_model = establishment::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            type_id: Set(type_id),
            business_name: Set(establishment.business_name),
            address: Set(establishment.address),
            phone: Set(establishment.phone),
            created_at: Set(chrono::Utc::now()),
        };

        active_model.insert(&txn).await.map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict(DUPLICATE_ESTABLISHMENT)
            } else {
                AppError::from(e)
            }
        })?;

        let user = append_role(&txn, user_id, &Role::Establishment).await?;
        txn.commit().await?;

        Ok(user)
    }
}
