//! Mercado Pago Checkout Pro client.

use std::time::Duration;

use async_trait::async_trait;
use domain::Payer;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::UPSTREAM_TIMEOUT_SECS;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

pub(crate) const PREFERENCE_FAILURE: &str = "Error al crear la preferencia de pago.";

/// Line of a provider preference; prices are whole currency units
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutItem {
    pub title: String,
    pub quantity: u32,
    pub unit_price: i64,
    pub currency_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackUrls {
    pub success: String,
    pub failure: String,
    pub pending: String,
}

/// Body of `POST /checkout/preferences`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutPreference {
    pub items: Vec<CheckoutItem>,
    pub back_urls: BackUrls,
    pub auto_return: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer: Option<Payer>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatedPreference {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub init_point: Option<String>,
    #[serde(default)]
    pub sandbox_init_point: Option<String>,
}

impl CreatedPreference {
    /// Sandbox checkout first, then production; blank URLs are skipped
    pub fn checkout_url(&self) -> Option<&str> {
        [&self.sandbox_init_point, &self.init_point]
            .into_iter()
            .filter_map(|url| url.as_deref())
            .find(|url| !url.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentDetails {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub transaction_amount: Option<Decimal>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_preference(&self, preference: &CheckoutPreference)
        -> AppResult<CreatedPreference>;

    async fn fetch_payment(&self, payment_id: &str) -> AppResult<PaymentDetails>;
}

pub struct MercadoPagoClient {
    http: reqwest::Client,
    api_url: String,
    access_token: String,
}

impl MercadoPagoClient {
    pub fn new(api_url: impl Into<String>, access_token: impl Into<String>) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(UPSTREAM_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::internal(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        })
    }

    async fn read<T>(response: reqwest::Response, what: &str) -> AppResult<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(%status, %body, "Mercado Pago rejected {}", what);
            return Err(AppError::upstream(PREFERENCE_FAILURE));
        }

        response.json::<T>().await.map_err(|e| {
            tracing::error!(error = %e, "Unreadable Mercado Pago {}", what);
            AppError::upstream(PREFERENCE_FAILURE)
        })
    }
}

#[async_trait]
impl PaymentGateway for MercadoPagoClient {
    async fn create_preference(
        &self,
        preference: &CheckoutPreference,
    ) -> AppResult<CreatedPreference> {
        let response = self
            .http
            .post(format!("{}/checkout/preferences", self.api_url))
            .bearer_auth(&self.access_token)
            .json(preference)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Mercado Pago unreachable");
                AppError::upstream(PREFERENCE_FAILURE)
            })?;

        let created: CreatedPreference = Self::read(response, "preference").await?;
        tracing::info!(preference_id = ?created.id, "Payment preference created");
        Ok(created)
    }

    async fn fetch_payment(&self, payment_id: &str) -> AppResult<PaymentDetails> {
        let response = self
            .http
            .get(format!("{}/v1/payments/{}", self.api_url, payment_id))
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| AppError::upstream(format!("Mercado Pago unreachable: {}", e)))?;

        Self::read(response, "payment").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn preference() -> CheckoutPreference {
        CheckoutPreference {
            items: vec![CheckoutItem {
                title: "Combo".into(),
                quantity: 2,
                unit_price: 1000,
                currency_id: "COP".into(),
            }],
            back_urls: BackUrls {
                success: "http://localhost:5173/cliente?pago=ok".into(),
                failure: "http://localhost:5173/cliente?pago=error".into(),
                pending: "http://localhost:5173/cliente?pago=pending".into(),
            },
            auto_return: "approved".into(),
            payer: None,
        }
    }

    #[test]
    fn test_checkout_url_prefers_sandbox() {
        let created = CreatedPreference {
            id: None,
            init_point: Some("https://mp/prod".into()),
            sandbox_init_point: Some("https://mp/sandbox".into()),
        };
        assert_eq!(created.checkout_url(), Some("https://mp/sandbox"));

        let created = CreatedPreference {
            sandbox_init_point: Some(String::new()),
            ..created
        };
        assert_eq!(created.checkout_url(), Some("https://mp/prod"));
        assert_eq!(CreatedPreference::default().checkout_url(), None);
    }

    #[tokio::test]
    async fn test_create_preference_sends_bearer_and_body() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/checkout/preferences")
                    .header("authorization", "Bearer TEST-token")
                    .json_body_partial(
                        r#"{ "items": [{ "title": "Combo", "quantity": 2, "unit_price": 1000, "currency_id": "COP" }], "auto_return": "approved" }"#,
                    );
                then.status(201).json_body(json!({
                    "id": "pref-1",
                    "init_point": "https://mp/prod",
                    "sandbox_init_point": "https://mp/sandbox",
                }));
            })
            .await;

        let client = MercadoPagoClient::new(server.base_url(), "TEST-token").unwrap();
        let created = client.create_preference(&preference()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(created.id.as_deref(), Some("pref-1"));
        assert_eq!(created.checkout_url(), Some("https://mp/sandbox"));
    }

    #[tokio::test]
    async fn test_provider_error_is_upstream() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/checkout/preferences");
                then.status(400).json_body(json!({ "message": "invalid items" }));
            })
            .await;

        let client = MercadoPagoClient::new(server.base_url(), "TEST-token").unwrap();
        let err = client.create_preference(&preference()).await.unwrap_err();

        assert!(matches!(err, AppError::Upstream(_)));
    }

    #[tokio::test]
    async fn test_fetch_payment() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/payments/98765");
                then.status(200).json_body(json!({
                    "id": 98765,
                    "status": "approved",
                    "transaction_amount": 2500.5,
                }));
            })
            .await;

        let client = MercadoPagoClient::new(server.base_url(), "TEST-token").unwrap();
        let payment = client.fetch_payment("98765").await.unwrap();

        assert_eq!(payment.status.as_deref(), Some("approved"));
        assert_eq!(payment.transaction_amount, Some(Decimal::new(25005, 1)));
    }
}
