//! Process-wide client state.

use std::sync::Arc;

use domain::CartStore;

use crate::api::ApiClient;
use crate::checkout::{Checkout, CheckoutRedirect};
use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::products::Products;
use crate::session::Session;
use crate::storage::{MemoryStorage, SessionStorage};

/// Everything a client process shares: one session, one cart, the product
/// client and the checkout initiator.
///
/// Build it once at startup and pass clones around; every clone points at the
/// same session and the same cart.
#[derive(Clone)]
pub struct App {
    session: Session,
    cart: CartStore,
    products: Products,
    checkout: Checkout,
}

impl App {
    /// Build the application with in-memory session storage.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        Self::with_storage(config, Arc::new(MemoryStorage::new()))
    }

    pub fn with_storage(
        config: &ClientConfig,
        storage: Arc<dyn SessionStorage>,
    ) -> ClientResult<Self> {
        let api = ApiClient::new(config)?;
        tracing::debug!(base_url = %api.base_url(), "Client initialised");
        let session = Session::new(api.clone(), storage);
        Ok(Self {
            products: Products::new(api.clone(), session.clone()),
            session,
            cart: CartStore::new(),
            checkout: Checkout::new(api),
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub fn products(&self) -> &Products {
        &self.products
    }

    pub fn checkout(&self) -> &Checkout {
        &self.checkout
    }

    /// Start checkout for the shared cart, adding the signed-in user's email
    /// as payer when available.
    pub async fn start_checkout(&self) -> ClientResult<CheckoutRedirect> {
        let email = self.session.current().map(|a| a.email().to_string());
        self.checkout.start(&self.cart, email.as_deref()).await
    }
}
