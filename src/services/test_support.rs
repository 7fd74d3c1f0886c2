//! Fixtures shared by the service unit tests.

use std::sync::Arc;

use chrono::Utc;
use domain::Role;
use uuid::Uuid;

use crate::config::Config;
use crate::domain::{Password, User};
use crate::infra::{
    CourierRepository, EstablishmentRepository, MockCourierRepository,
    MockEstablishmentRepository, MockProductRepository, MockUserRepository, ProductRepository,
    UnitOfWork, UserRepository,
};

/// Mock repositories collected before expectations are frozen
#[derive(Default)]
pub struct TestUow {
    pub users: MockUserRepository,
    pub establishments: MockEstablishmentRepository,
    pub couriers: MockCourierRepository,
    pub products: MockProductRepository,
}

pub struct MockedUow {
    users: Arc<MockUserRepository>,
    establishments: Arc<MockEstablishmentRepository>,
    couriers: Arc<MockCourierRepository>,
    products: Arc<MockProductRepository>,
}

impl TestUow {
    pub fn build(self) -> Arc<MockedUow> {
        Arc::new(MockedUow {
            users: Arc::new(self.users),
            establishments: Arc::new(self.establishments),
            couriers: Arc::new(self.couriers),
            products: Arc::new(self.products),
        })
    }
}

impl UnitOfWork for MockedUow {
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

pub fn config() -> Config {
    Config::from_lookup(|key| match key {
        "JWT_SECRET" => Some("unit-test-secret-that-is-long-enough".to_string()),
        _ => None,
    })
    .unwrap()
}

pub fn user(roles: Vec<Role>) -> User {
    User {
        id: Uuid::new_v4(),
        email: "a@b.com".into(),
        password_hash: String::new(),
        name: "Ana".into(),
        roles,
        created_at: Utc::now(),
    }
}

pub fn user_with_password(password: &str) -> User {
    User {
        password_hash: Password::new(password).unwrap().into_string(),
        ..user(vec![Role::Client])
    }
}
