//! Application route configuration.

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use tower_http::{cors::{AllowOrigin, CorsLayer}, services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{auth_routes, health, payment_routes, product_routes};
use super::openapi::ApiDoc;
use super::AppState;
use crate::config::{Config, DEV_FRONTEND_ORIGINS, UPLOADS_ROUTE};

/// Room for multipart framing around the largest accepted image
const BODY_LIMIT_SLACK: usize = 64 * 1024;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    let config = state.config.clone();

    Router::new()
        .route("/", get(root))
        .route("/api/health", get(health))
        // OpenAPI Swagger UI documentation
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api/auth", auth_routes(state.clone()))
        .nest("/api/productos", product_routes(state.clone()))
        .nest("/api/pagos", payment_routes())
        // Locally stored product images
        .nest_service(UPLOADS_ROUTE, ServeDir::new(&config.upload_dir))
        // Global middleware
        .layer(DefaultBodyLimit::max(
            config.upload_max_bytes().saturating_add(BODY_LIMIT_SLACK),
        ))
        .layer(cors_layer(&config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Root redirects to the health check
async fn root() -> impl IntoResponse {
    (StatusCode::FOUND, [(header::LOCATION, "/api/health")])
}

/// Development origins plus the configured frontend
fn cors_layer(config: &Config) -> CorsLayer {
    let mut origins: Vec<HeaderValue> = DEV_FRONTEND_ORIGINS
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    match HeaderValue::from_str(&config.frontend_url) {
        Ok(origin) if !origins.contains(&origin) => origins.push(origin),
        Ok(_) => {}
        Err(_) => tracing::warn!(url = %config.frontend_url, "FRONTEND_URL is not a valid origin"),
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}
