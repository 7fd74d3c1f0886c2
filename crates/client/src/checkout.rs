//! Hands the cart over to the payment provider's hosted checkout.

use std::sync::{Arc, RwLock};

use domain::{CartStore, LineItem, Payer, PreferenceItem, PreferenceRequest, PreferenceResponse};

use crate::api::ApiClient;
use crate::error::{ClientError, ClientResult};
use crate::pending::InFlight;

const PREFERENCE_PATH: &str = "/api/pagos/preferencia";
const PREFERENCE_FAILED: &str = "Error al crear el pago";

/// External URL the host must navigate to, leaving the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRedirect {
    url: String,
}

impl CheckoutRedirect {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn into_url(self) -> String {
        self.url
    }
}

#[derive(Default)]
struct CheckoutState {
    last_error: RwLock<Option<String>>,
    in_flight: InFlight,
}

/// Creates payment preferences from cart contents.
#[derive(Clone)]
pub struct Checkout {
    api: ApiClient,
    state: Arc<CheckoutState>,
}

impl Checkout {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: Arc::default(),
        }
    }

    /// Message of the last failed checkout attempt
    pub fn last_error(&self) -> Option<String> {
        self.state
            .last_error
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn is_busy(&self) -> bool {
        self.state.in_flight.is_busy()
    }

    fn set_error(&self, message: Option<String>) {
        *self
            .state
            .last_error
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = message;
    }

    /// Ask the backend for a payment preference and return its redirect URL.
    ///
    /// The URL may be empty if the provider did not return one.
    pub async fn create_payment_preference(
        &self,
        items: &[LineItem],
        payer: Option<Payer>,
    ) -> ClientResult<String> {
        let request = PreferenceRequest {
            items: items.iter().map(PreferenceItem::from).collect(),
            payer,
        };
        let response: PreferenceResponse = self.api.post(PREFERENCE_PATH, &request, None).await?;
        Ok(response.url)
    }

    /// Start checkout for the current cart contents.
    ///
    /// An empty cart is rejected before any request is made. The cart is left
    /// as it is whatever the outcome; clearing it is up to the caller once the
    /// payment is confirmed.
    pub async fn start(
        &self,
        cart: &CartStore,
        payer_email: Option<&str>,
    ) -> ClientResult<CheckoutRedirect> {
        self.set_error(None);

        let items = cart.items();
        if items.is_empty() {
            return Err(self.fail(ClientError::EmptyCart));
        }

        let payer = payer_email
            .filter(|email| !email.trim().is_empty())
            .map(|email| Payer {
                email: email.to_string(),
            });

        let result = {
            let _pending = self.state.in_flight.start();
            self.create_payment_preference(&items, payer).await
        };

        match result {
            Ok(url) if url.trim().is_empty() => Err(self.fail(ClientError::MissingCheckoutUrl)),
            Ok(url) => {
                tracing::info!(items = items.len(), "Redirecting to payment checkout");
                Ok(CheckoutRedirect { url })
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    fn fail(&self, err: ClientError) -> ClientError {
        let message = err.user_message(PREFERENCE_FAILED);
        tracing::warn!(error = %err, "Checkout failed");
        self.set_error(Some(message));
        err
    }
}
