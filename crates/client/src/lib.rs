//! Client runtime for the Snappy marketplace.
//!
//! Provides the authenticated [`Session`], the [`Products`] catalogue client,
//! the [`Checkout`] initiator and the [`App`] container that owns the
//! process-wide cart. Presentation is left to the host.

pub mod api;
pub mod app;
pub mod checkout;
pub mod config;
pub mod error;
mod pending;
pub mod products;
pub mod session;
pub mod storage;

pub use api::ApiClient;
pub use app::App;
pub use checkout::{Checkout, CheckoutRedirect};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use products::{ProductInput, Products};
pub use session::{BusinessRegistration, Session};
pub use storage::{MemoryStorage, SessionStorage, TOKEN_KEY, USER_KEY};

pub use domain::{Account, CartProduct, CartStore, LineItem, ProductView, Role};
