//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

mod courier_repository;
pub(crate) mod entities;
mod establishment_repository;
mod product_repository;
mod user_repository;

pub use courier_repository::{CourierRepository, CourierStore};
pub use establishment_repository::{EstablishmentRepository, EstablishmentStore};
pub use product_repository::{ProductRepository, ProductStore};
pub use user_repository::{UserRepository, UserStore};

pub(crate) use courier_repository::DUPLICATE_COURIER;
pub(crate) use establishment_repository::DUPLICATE_ESTABLISHMENT;

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use courier_repository::MockCourierRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use establishment_repository::MockEstablishmentRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use product_repository::MockProductRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
