//! Account service - profile and role grants.
//!
//! A user becomes an establishment owner or a courier by creating the
//! matching profile. Roles are only ever appended.

use std::sync::Arc;

use async_trait::async_trait;
use domain::{CourierView, EstablishmentTypeView, EstablishmentView, ProfileResponse, RoleGrantResponse};
use uuid::Uuid;

use crate::domain::NewEstablishment;
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::{DUPLICATE_COURIER, DUPLICATE_ESTABLISHMENT};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait AccountService: Send + Sync {
    /// The user with their establishment and courier profiles, if any
    async fn profile(&self, user_id: Uuid) -> AppResult<ProfileResponse>;

    async fn establishment_types(&self) -> AppResult<Vec<EstablishmentTypeView>>;

    async fn register_business(
        &self,
        user_id: Uuid,
        establishment: NewEstablishment,
    ) -> AppResult<RoleGrantResponse>;

    async fn become_courier(&self, user_id: Uuid) -> AppResult<RoleGrantResponse>;
}

pub struct AccountManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> AccountManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> AccountService for AccountManager<U> {
    async fn profile(&self, user_id: Uuid) -> AppResult<ProfileResponse> {
        let users = self.uow.users();
        let establishments = self.uow.establishments();
        let couriers = self.uow.couriers();

        let (user, establishment, courier) = tokio::try_join!(
            users.find_by_id(user_id),
            establishments.find_by_user(user_id),
            couriers.find_by_user(user_id),
        )?;
        let user = user.ok_or_else(|| AppError::not_found("Usuario no encontrado"))?;

        Ok(ProfileResponse {
            user: user.to_snapshot(),
            establishment: establishment.map(EstablishmentView::from),
            courier: courier.map(CourierView::from),
        })
    }

    async fn establishment_types(&self) -> AppResult<Vec<EstablishmentTypeView>> {
        let types = self.uow.establishments().list_types().await?;
        Ok(types.into_iter().map(EstablishmentTypeView::from).collect())
    }

    async fn register_business(
        &self,
        user_id: Uuid,
        establishment: NewEstablishment,
    ) -> AppResult<RoleGrantResponse> {
        let establishments = self.uow.establishments();

        let kind = establishments
            .find_type_by_key(&establishment.type_key)
            .await?
            .ok_or_else(|| AppError::validation("Tipo de establecimiento no válido"))?;

        if establishments.find_by_user(user_id).await?.is_some() {
            return Err(AppError::conflict(DUPLICATE_ESTABLISHMENT));
        }

        let user = establishments
            .create_for_user(user_id, kind.id, establishment)
            .await?;

        tracing::info!(user_id = %user_id, kind = %kind.key, "Business registered");
        Ok(RoleGrantResponse {
            message: "Negocio registrado correctamente".to_string(),
            user: user.to_snapshot(),
        })
    }

    async fn become_courier(&self, user_id: Uuid) -> AppResult<RoleGrantResponse> {
        let couriers = self.uow.couriers();

        if couriers.find_by_user(user_id).await?.is_some() {
            return Err(AppError::conflict(DUPLICATE_COURIER));
        }

        let user = couriers.create_for_user(user_id).await?;

        tracing::info!(user_id = %user_id, "Courier registered");
        Ok(RoleGrantResponse {
            message: "Te has registrado como domiciliario".to_string(),
            user: user.to_snapshot(),
        })
    }
}
