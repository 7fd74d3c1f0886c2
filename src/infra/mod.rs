//! Infrastructure layer - External systems integration
//!
//! - Database connection, migrations and repositories
//! - Image storage (local disk, Cloudinary)
//! - Payment provider client (Mercado Pago)
//! - Unit of Work aggregating the repositories

pub mod db;
pub mod payments;
pub mod repositories;
pub mod storage;
pub mod unit_of_work;

pub use db::{Database, HealthCheck, Migrator};
pub use payments::{
    BackUrls, CheckoutItem, CheckoutPreference, CreatedPreference, MercadoPagoClient,
    PaymentDetails, PaymentGateway,
};
pub use repositories::{
    CourierRepository, CourierStore, EstablishmentRepository, EstablishmentStore,
    ProductRepository, ProductStore, UserRepository, UserStore,
};
pub use storage::{CloudinaryStore, ImageStore, ImageUpload, LocalDiskStore};
pub use unit_of_work::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use payments::MockPaymentGateway;
#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockCourierRepository, MockEstablishmentRepository, MockProductRepository,
    MockUserRepository,
};
