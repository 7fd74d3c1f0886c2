//! Service Container - Centralized service access.
//!
//! Builds every service from the database connection and configuration,
//! choosing the image store and payment gateway from what is configured.

use std::sync::Arc;

use super::{
    AccountManager, AccountService, AuthService, Authenticator, Payments, PaymentService,
    ProductCatalog, ProductService,
};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{
    CloudinaryStore, ImageStore, LocalDiskStore, MercadoPagoClient, PaymentGateway, Persistence,
};

pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn accounts(&self) -> Arc<dyn AccountService>;

    fn products(&self) -> Arc<dyn ProductService>;

    fn payments(&self) -> Arc<dyn PaymentService>;
}

#[derive(Clone)]
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    account_service: Arc<dyn AccountService>,
    product_service: Arc<dyn ProductService>,
    payment_service: Arc<dyn PaymentService>,
}

impl Services {
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        account_service: Arc<dyn AccountService>,
        product_service: Arc<dyn ProductService>,
        payment_service: Arc<dyn PaymentService>,
    ) -> Self {
        Self {
            auth_service,
            account_service,
            product_service,
            payment_service,
        }
    }

    /// Wire the production services.
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: &Config) -> AppResult<Self> {
        let uow = Arc::new(Persistence::new(db));

        let images: Arc<dyn ImageStore> = match &config.cloudinary {
            Some(credentials) => {
                tracing::info!(cloud = %credentials.cloud_name, "Storing images on Cloudinary");
                Arc::new(CloudinaryStore::new(credentials.clone())?)
            }
            None => {
                tracing::info!(dir = %config.upload_dir.display(), "Storing images on local disk");
                Arc::new(LocalDiskStore::new(
                    config.upload_dir.clone(),
                    config.public_base_url(),
                ))
            }
        };

        let gateway: Option<Arc<dyn PaymentGateway>> = match config.mp_access_token() {
            Some(token) => Some(Arc::new(MercadoPagoClient::new(
                config.mp_api_url.clone(),
                token,
            )?)),
            None => {
                tracing::warn!("MP_ACCESS_TOKEN not set, payments are disabled");
                None
            }
        };

        Ok(Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), config.clone())?),
            account_service: Arc::new(AccountManager::new(uow.clone())),
            product_service: Arc::new(ProductCatalog::new(uow, images)),
            payment_service: Arc::new(Payments::new(gateway, config.frontend_url.clone())),
        })
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn accounts(&self) -> Arc<dyn AccountService> {
        self.account_service.clone()
    }

    fn products(&self) -> Arc<dyn ProductService> {
        self.product_service.clone()
    }

    fn payments(&self) -> Arc<dyn PaymentService> {
        self.payment_service.clone()
    }
}
