//! Checkout handlers (`/api/pagos`).

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::post,
    Router,
};
use domain::{ErrorBody, Payer, PreferenceResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::services::notified_payment_id;

/// Cart as sent by the storefront. Items are sanitised server-side.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct CheckoutRequest {
    #[schema(value_type = Vec<domain::PreferenceItem>)]
    pub items: Option<Value>,
    pub payer: Option<Payer>,
}

/// Notification fields some providers send in the query string
#[derive(Debug, Default, Deserialize, Serialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WebhookQuery {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "data.id", skip_serializing_if = "Option::is_none")]
    pub data_id: Option<String>,
}

pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/preferencia", post(create_preference))
        .route("/webhook", post(webhook))
}

/// Create a Mercado Pago preference for the cart
#[utoipa::path(
    post,
    path = "/api/pagos/preferencia",
    tag = "Payments",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Checkout URL", body = PreferenceResponse),
        (status = 400, description = "Empty cart", body = ErrorBody),
        (status = 502, description = "Provider returned no URL", body = ErrorBody),
        (status = 503, description = "Payments not configured", body = ErrorBody)
    )
)]
pub async fn create_preference(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CheckoutRequest>,
) -> AppResult<Json<PreferenceResponse>> {
    let items = match payload.items {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    };

    let preference = state
        .payment_service
        .create_checkout(items, payload.payer)
        .await?;

    Ok(Json(preference))
}

/// Provider notification endpoint.
///
/// Always acknowledges; payment lookups run in the background.
#[utoipa::path(
    post,
    path = "/api/pagos/webhook",
    tag = "Payments",
    params(WebhookQuery),
    responses((status = 200, description = "Notification received"))
)]
pub async fn webhook(
    State(state): State<AppState>,
    Query(query): Query<WebhookQuery>,
    body: Bytes,
) -> StatusCode {
    let payment_id = serde_json::from_slice::<Value>(&body)
        .ok()
        .and_then(|payload| notified_payment_id(&payload))
        .or_else(|| {
            serde_json::to_value(&query)
                .ok()
                .and_then(|params| notified_payment_id(&params))
        });

    match payment_id {
        Some(payment_id) => {
            tracing::debug!(%payment_id, "Payment notification received");
            let payments = state.payment_service.clone();
            tokio::spawn(async move {
                if let Err(e) = payments.process_payment(payment_id.clone()).await {
                    tracing::error!(%payment_id, error = %e, "Payment notification failed");
                }
            });
        }
        None => tracing::debug!("Ignoring non-payment notification"),
    }

    StatusCode::OK
}
