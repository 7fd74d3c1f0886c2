//! Authentication and account handlers (`/api/auth`).

use axum::{
    extract::State,
    middleware,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use domain::{
    AuthResponse, ErrorBody, EstablishmentTypeView, ProfileResponse, RoleGrantResponse,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::{Validate, ValidateEmail, ValidationError};

use crate::api::extractors::{not_blank, ValidatedJson};
use crate::api::middleware::{auth_middleware, CurrentUser};
use crate::api::AppState;
use crate::domain::NewEstablishment;
use crate::errors::AppResult;

/// Login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "El correo es obligatorio"))]
    #[schema(example = "ana@example.com")]
    pub email: String,
    #[serde(rename = "contraseña", default)]
    #[schema(example = "secret1")]
    pub password: String,
}

/// Registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(custom(function = "required_email"))]
    #[schema(example = "ana@example.com")]
    pub correo: String,
    #[serde(default)]
    #[validate(length(min = 6, message = "La contraseña debe tener al menos 6 caracteres"))]
    #[schema(example = "secret1", min_length = 6)]
    pub contrasena: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "El nombre es obligatorio"))]
    #[schema(example = "Ana")]
    pub nombre: String,
}

/// Business registration request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct RegisterBusinessRequest {
    #[schema(example = "Popsy")]
    pub nombre_negocio: Option<String>,
    #[schema(example = "Calle 10 # 5-20")]
    pub direccion: Option<String>,
    #[schema(example = "3001234567")]
    pub telefono: Option<String>,
    /// `comida` or `tienda`
    #[schema(example = "comida")]
    pub tipo_establecimiento: Option<String>,
}

fn required_email(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    let (code, message) = if value.is_empty() {
        ("required", "El correo es obligatorio")
    } else if !value.validate_email() {
        ("email", "El correo no es válido")
    } else {
        return Ok(());
    };

    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    Err(error)
}

pub fn auth_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/registrar-negocio", post(register_business))
        .route("/ser-domiciliario", post(become_courier))
        .route("/yo", get(me))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/login", post(login))
        .route("/registro", post(register))
        .route("/tipos-establecimiento", get(establishment_types))
        .merge(protected)
}

/// Sign in with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = AuthResponse),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 401, description = "Wrong email or password", body = ErrorBody)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let response = state
        .auth_service
        .login(payload.email, payload.password)
        .await?;

    Ok(Json(response))
}

/// Create a client account
#[utoipa::path(
    post,
    path = "/api/auth/registro",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created and signed in", body = AuthResponse),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<Json<AuthResponse>> {
    let response = state
        .auth_service
        .register(payload.correo, payload.contrasena, payload.nombre)
        .await?;

    Ok(Json(response))
}

/// Establishment categories, ordered by name
#[utoipa::path(
    get,
    path = "/api/auth/tipos-establecimiento",
    tag = "Auth",
    responses((status = 200, description = "Categories", body = [EstablishmentTypeView]))
)]
pub async fn establishment_types(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<EstablishmentTypeView>>> {
    Ok(Json(state.account_service.establishment_types().await?))
}

/// Register the caller's business and grant the establishment role
#[utoipa::path(
    post,
    path = "/api/auth/registrar-negocio",
    tag = "Auth",
    request_body = RegisterBusinessRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Business registered", body = RoleGrantResponse),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 409, description = "Caller already owns a business", body = ErrorBody)
    )
)]
pub async fn register_business(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<RegisterBusinessRequest>,
) -> AppResult<Json<RoleGrantResponse>> {
    let establishment = NewEstablishment::parse(
        payload.nombre_negocio.as_deref(),
        payload.direccion.as_deref(),
        payload.telefono.as_deref(),
        payload.tipo_establecimiento.as_deref(),
    )?;

    let response = state
        .account_service
        .register_business(current_user.id, establishment)
        .await?;

    Ok(Json(response))
}

/// Grant the courier role to the caller
#[utoipa::path(
    post,
    path = "/api/auth/ser-domiciliario",
    tag = "Auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Courier profile created", body = RoleGrantResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 409, description = "Caller is already a courier", body = ErrorBody)
    )
)]
pub async fn become_courier(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<RoleGrantResponse>> {
    let response = state.account_service.become_courier(current_user.id).await?;
    Ok(Json(response))
}

/// The caller's account with its establishment and courier profiles
#[utoipa::path(
    get,
    path = "/api/auth/yo",
    tag = "Auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current profile", body = ProfileResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "User no longer exists", body = ErrorBody)
    )
)]
pub async fn me(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<ProfileResponse>> {
    Ok(Json(state.account_service.profile(current_user.id).await?))
}
