//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{Database, HealthCheck};
use crate::services::{
    AccountService, AuthService, PaymentService, ProductService, ServiceContainer, Services,
};

/// Everything a handler can reach
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub account_service: Arc<dyn AccountService>,
    pub product_service: Arc<dyn ProductService>,
    pub payment_service: Arc<dyn PaymentService>,
    /// Database connectivity, reported by the health endpoint
    pub database: Arc<dyn HealthCheck>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Build the production state on top of a connected database.
    pub fn from_config(database: Arc<Database>, config: Config) -> AppResult<Self> {
        let services = Services::from_connection(database.connection().clone(), &config)?;
        Ok(Self::new(&services, database, config))
    }

    /// Assemble state from already built services.
    pub fn new(
        services: &impl ServiceContainer,
        database: Arc<dyn HealthCheck>,
        config: Config,
    ) -> Self {
        Self {
            auth_service: services.auth(),
            account_service: services.accounts(),
            product_service: services.products(),
            payment_service: services.payments(),
            database,
            config: Arc::new(config),
        }
    }
}
