//! Domain layer - Roles, accounts, the cart and the wire payloads.
//!
//! This crate holds pure domain logic with no infrastructure dependencies.
//! The API server and the client library both build on it, so the JSON
//! shapes defined in [`wire`] are the single source of truth for the API.

pub mod account;
pub mod cart;
pub mod constants;
pub mod error;
pub mod role;
pub mod wire;

pub use account::Account;
pub use cart::{CartProduct, CartStore, LineItem, SubscriptionId};
pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use role::Role;
pub use wire::{
    AuthResponse, CourierView, ErrorBody, EstablishmentTypeView, EstablishmentView, Payer,
    PreferenceItem, PreferenceRequest, PreferenceResponse, ProductView, ProfileResponse,
    RoleGrantResponse, UploadResponse, UserSnapshot,
};
