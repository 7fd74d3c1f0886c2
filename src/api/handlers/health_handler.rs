//! Liveness endpoint.

use axum::{extract::State, http::StatusCode, response::Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub ok: bool,
    #[schema(example = "API Snappy")]
    pub mensaje: String,
    /// `conectada` or `desconectada`
    pub database: String,
}

/// API and database status
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses(
        (status = 200, description = "API and database are up", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (status, database) = match state.database.ping().await {
        Ok(()) => (StatusCode::OK, "conectada"),
        Err(e) => {
            tracing::error!(error = %e, "Health check could not reach the database");
            (StatusCode::SERVICE_UNAVAILABLE, "desconectada")
        }
    };

    (
        status,
        Json(HealthResponse {
            ok: status.is_success(),
            mensaje: "API Snappy".to_string(),
            database: database.to_string(),
        }),
    )
}
