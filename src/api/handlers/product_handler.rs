//! Product handlers (`/api/productos`).

use std::str::FromStr;

use axum::{
    extract::{Multipart, Path, Query, State},
    middleware,
    response::Json,
    routing::{get, post, put},
    Extension, Router,
};
use domain::{ErrorBody, ProductView, UploadResponse};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{auth_middleware, CurrentUser};
use crate::api::AppState;
use crate::config::UPLOAD_FIELD_NAME;
use crate::domain::ProductDraft;
use crate::errors::{AppError, AppResult};
use crate::services::accept_image;
use crate::types::{Created, NoContent, Uncached};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ProductQuery {
    /// Only products of this establishment
    pub establecimiento_id: Option<String>,
}

/// Create or replace a product
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct ProductRequest {
    #[schema(example = "Combo familiar")]
    pub nombre: Option<String>,
    pub descripcion: Option<String>,
    /// Number or numeric string, at least 0
    #[schema(value_type = f64, example = 24900)]
    pub precio: Option<Value>,
    pub imagen: Option<String>,
}

impl ProductRequest {
    fn into_draft(self) -> AppResult<ProductDraft> {
        ProductDraft::parse(
            self.nombre.as_deref(),
            self.descripcion.as_deref(),
            self.precio.as_ref().and_then(parse_price),
            self.imagen.as_deref(),
        )
    }
}

/// Prices may arrive as JSON numbers or numeric strings
fn parse_price(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .ok(),
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

fn product_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::not_found("Producto no encontrado o no te pertenece"))
}

pub fn product_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(create_product))
        .route("/mis-productos", get(my_products))
        .route("/subir-imagen", post(upload_image))
        .route("/:id", put(update_product).delete(delete_product))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new().route("/", get(list_products)).merge(protected)
}

/// Public catalogue, newest first
#[utoipa::path(
    get,
    path = "/api/productos",
    tag = "Products",
    params(ProductQuery),
    responses(
        (status = 200, description = "Products with their establishment", body = [ProductView]),
        (status = 400, description = "Malformed establishment id", body = ErrorBody)
    )
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> AppResult<Uncached<Vec<ProductView>>> {
    let establishment_id = match query.establecimiento_id.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(
            Uuid::parse_str(raw)
                .map_err(|_| AppError::validation("establecimiento_id no es válido"))?,
        ),
    };

    let products = state.product_service.list(establishment_id).await?;
    Ok(Uncached(products))
}

/// Products of the caller's establishment
#[utoipa::path(
    get,
    path = "/api/productos/mis-productos",
    tag = "Products",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own products", body = [ProductView]),
        (status = 403, description = "Caller has no establishment", body = ErrorBody)
    )
)]
pub async fn my_products(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<ProductView>>> {
    Ok(Json(state.product_service.list_mine(current_user.id).await?))
}

/// Upload a product image (multipart field `imagen`)
#[utoipa::path(
    post,
    path = "/api/productos/subir-imagen",
    tag = "Products",
    security(("bearer_auth" = [])),
    request_body(content = Vec<u8>, content_type = "multipart/form-data", description = "Image in the `imagen` field"),
    responses(
        (status = 201, description = "Public image URL", body = UploadResponse),
        (status = 400, description = "Missing, wrong type or too large", body = ErrorBody),
        (status = 502, description = "Image host failed", body = ErrorBody)
    )
)]
pub async fn upload_image(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    mut multipart: Multipart,
) -> AppResult<Created<UploadResponse>> {
    let missing = || AppError::validation(r#"Debes enviar un archivo de imagen (campo "imagen")"#);

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::warn!(error = %e, "Unreadable multipart body");
        missing()
    })? {
        if field.name() != Some(UPLOAD_FIELD_NAME) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(|e| {
            tracing::warn!(error = %e, "Image upload interrupted");
            AppError::validation(format!(
                "La imagen no puede superar {} MB",
                state.config.upload_max_mb
            ))
        })?;

        let image = accept_image(
            file_name.as_deref(),
            content_type.as_deref(),
            bytes.to_vec(),
            state.config.upload_max_mb,
        )?;
        let url = state.product_service.upload_image(image).await?;

        tracing::info!(user_id = %current_user.id, %url, "Product image uploaded");
        return Ok(Created(UploadResponse { url }));
    }

    Err(missing())
}

#[utoipa::path(
    post,
    path = "/api/productos",
    tag = "Products",
    request_body = ProductRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Product created", body = ProductView),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 403, description = "Caller has no establishment", body = ErrorBody)
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<ProductRequest>,
) -> AppResult<Created<ProductView>> {
    let draft = payload.into_draft()?;
    let product = state.product_service.create(current_user.id, draft).await?;
    Ok(Created(product))
}

#[utoipa::path(
    put,
    path = "/api/productos/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = ProductRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Product updated", body = ProductView),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 403, description = "Caller has no establishment", body = ErrorBody),
        (status = 404, description = "Not found or not owned", body = ErrorBody)
    )
)]
pub async fn update_product(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<ProductRequest>,
) -> AppResult<Json<ProductView>> {
    let id = product_id(&id)?;
    let draft = payload.into_draft()?;
    let product = state
        .product_service
        .update(current_user.id, id, draft)
        .await?;

    Ok(Json(product))
}

#[utoipa::path(
    delete,
    path = "/api/productos/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "Product id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 403, description = "Caller has no establishment", body = ErrorBody),
        (status = 404, description = "Not found or not owned", body = ErrorBody)
    )
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<NoContent> {
    let id = product_id(&id)?;
    state.product_service.delete(current_user.id, id).await?;
    Ok(NoContent)
}
