//! Checkout and payment notifications.
//!
//! The cart arrives as loose JSON, so every item is sanitised before it is
//! forwarded to the provider.

use std::sync::Arc;

use async_trait::async_trait;
use domain::{Payer, PreferenceResponse, PAYMENT_CURRENCY};
use serde_json::Value;

use crate::config::{
    PAYMENT_AUTO_RETURN, PAYMENT_RETURN_ROUTE, PAYMENT_STATUS_APPROVED, WEBHOOK_TYPE_PAYMENT,
};
use crate::errors::{AppError, AppResult};
use crate::infra::{BackUrls, CheckoutItem, CheckoutPreference, PaymentGateway};

const DEFAULT_ITEM_TITLE: &str = "Producto";

#[async_trait]
pub trait PaymentService: Send + Sync {
    /// Create a provider preference and return the checkout URL
    async fn create_checkout(
        &self,
        items: Vec<Value>,
        payer: Option<Payer>,
    ) -> AppResult<PreferenceResponse>;

    /// Look a notified payment up and log its outcome
    async fn process_payment(&self, payment_id: String) -> AppResult<()>;
}

pub struct Payments {
    gateway: Option<Arc<dyn PaymentGateway>>,
    frontend_url: String,
}

impl Payments {
    /// `gateway` is `None` when no access token is configured.
    pub fn new(gateway: Option<Arc<dyn PaymentGateway>>, frontend_url: impl Into<String>) -> Self {
        Self {
            gateway,
            frontend_url: frontend_url.into(),
        }
    }

    fn gateway(&self) -> AppResult<&Arc<dyn PaymentGateway>> {
        self.gateway.as_ref().ok_or_else(|| {
            AppError::service_unavailable(
                "Mercado Pago no configurado. Añade MP_ACCESS_TOKEN en el .env del servidor.",
            )
        })
    }

    fn back_urls(&self) -> BackUrls {
        let base = format!("{}{}", self.frontend_url, PAYMENT_RETURN_ROUTE);
        BackUrls {
            success: format!("{}?pago=ok", base),
            failure: format!("{}?pago=error", base),
            pending: format!("{}?pago=pending", base),
        }
    }
}

/// Numbers and numeric strings; anything else is `None`
fn number(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

/// Quantity is floored with a minimum of one; price is rounded to whole units.
pub fn sanitize_item(item: &Value) -> CheckoutItem {
    let title = item
        .get("title")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_ITEM_TITLE)
        .to_string();

    let quantity = number(item.get("quantity"))
        .map(|q| q.floor().clamp(1.0, f64::from(u32::MAX)) as u32)
        .unwrap_or(1);

    let unit_price = number(item.get("unit_price"))
        .map(|p| p.round().max(0.0) as i64)
        .unwrap_or(0);

    CheckoutItem {
        title,
        quantity,
        unit_price,
        currency_id: PAYMENT_CURRENCY.to_string(),
    }
}

/// Payment id of a `payment` notification.
///
/// Accepts both `{type, data: {id}}` and the older `{topic, id}` shape;
/// ids may be strings or numbers.
pub fn notified_payment_id(body: &Value) -> Option<String> {
    let kind = body
        .get("type")
        .or_else(|| body.get("topic"))
        .and_then(Value::as_str)?;
    if kind != WEBHOOK_TYPE_PAYMENT {
        return None;
    }

    let id = body
        .get("data")
        .and_then(|data| data.get("id"))
        .or_else(|| body.get("id"))
        .or_else(|| body.get("data.id"))?;

    match id {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[async_trait]
impl PaymentService for Payments {
    async fn create_checkout(
        &self,
        items: Vec<Value>,
        payer: Option<Payer>,
    ) -> AppResult<PreferenceResponse> {
        if items.is_empty() {
            return Err(AppError::validation(
                r#"Se requiere un array "items" con al menos un producto."#,
            ));
        }
        let gateway = self.gateway()?;

        let preference = CheckoutPreference {
            items: items.iter().map(sanitize_item).collect(),
            back_urls: self.back_urls(),
            auto_return: PAYMENT_AUTO_RETURN.to_string(),
            payer: payer.filter(|p| !p.email.trim().is_empty()),
        };

        let created = gateway.create_preference(&preference).await?;
        let url = created
            .checkout_url()
            .ok_or_else(|| {
                AppError::upstream("No se pudo obtener la URL de pago de Mercado Pago.")
            })?
            .to_string();

        Ok(PreferenceResponse { url })
    }

    async fn process_payment(&self, payment_id: String) -> AppResult<()> {
        let payment = self.gateway()?.fetch_payment(&payment_id).await?;
        let status = payment.status.as_deref().unwrap_or("desconocido");

        tracing::info!(%payment_id, %status, "Payment notification processed");
        if status == PAYMENT_STATUS_APPROVED {
            tracing::info!(
                %payment_id,
                amount = ?payment.transaction_amount,
                "Payment approved"
            );
        }

        Ok(())
    }
}
