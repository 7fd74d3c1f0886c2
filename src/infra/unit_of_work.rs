//! Unit of Work: one place that owns every repository.
//!
//! Services receive the repositories they need from here. Multi-table
//! writes (role grants) open their own transaction inside the repository,
//! so callers never hold a transaction across an await on another service.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::repositories::{
    CourierRepository, CourierStore, EstablishmentRepository, EstablishmentStore,
    ProductRepository, ProductStore, UserRepository, UserStore,
};

pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn establishments(&self) -> Arc<dyn EstablishmentRepository>;

    fn couriers(&self) -> Arc<dyn CourierRepository>;

    fn products(&self) -> Arc<dyn ProductRepository>;
}

/// Postgres-backed repositories sharing one connection pool
pub struct Persistence {
    users: Arc<UserStore>,
    establishments: Arc<EstablishmentStore>,
    couriers: Arc<CourierStore>,
    products: Arc<ProductStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: Arc::new(UserStore::new(db.clone())),
            establishments: Arc::new(EstablishmentStore::new(db.clone())),
            couriers: Arc::new(CourierStore::new(db.clone())),
            products: Arc::new(ProductStore::new(db)),
        }
    }
}

impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn establishments(&self) -> Arc<dyn EstablishmentRepository> {
        self.establishments.clone()
    }

    fn couriers(&self) -> Arc<dyn CourierRepository> {
        self.couriers.clone()
    }

    fn products(&self) -> Arc<dyn ProductRepository> {
        self.products.clone()
    }
}
