//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.

mod account_service;
mod auth_service;
pub mod container;
mod payment_service;
mod product_service;

#[cfg(test)]
mod test_support;

pub use container::{ServiceContainer, Services};

pub use account_service::{AccountManager, AccountService};
pub use auth_service::{AuthService, Authenticator, Claims};
pub use payment_service::{notified_payment_id, sanitize_item, PaymentService, Payments};
pub use product_service::{accept_image, ProductCatalog, ProductService};
