//! Domain layer - Server-side entities and value objects.
//!
//! These types carry what the database stores. They convert into the wire
//! payloads of the shared `domain` crate at the API boundary.

pub mod courier;
pub mod establishment;
pub mod password;
pub mod product;
pub mod user;

pub use courier::Courier;
pub use establishment::{Establishment, EstablishmentDetails, EstablishmentType, NewEstablishment};
pub use password::Password;
pub use product::{Product, ProductDraft, ProductListing};
pub use user::{normalize_email, CreateUser, User};
