//! Integration tests for API endpoints.
//!
//! The router is driven in-process with stub services, so no database or
//! provider credentials are needed.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::Utc;
use domain::{
    AuthResponse, EstablishmentTypeView, ProductView, ProfileResponse, Role, RoleGrantResponse,
    UserSnapshot,
};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use sea_orm::DbErr;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use snappy::api::{create_router, AppState};
use snappy::config::Config;
use snappy::domain::{NewEstablishment, ProductDraft};
use snappy::errors::{AppError, AppResult};
use snappy::infra::{HealthCheck, ImageUpload};
use snappy::services::{AccountService, AuthService, Claims, Payments, ProductService, Services};

const VALID_TOKEN: &str = "valid-test-token";

// =============================================================================
// Stub Services
// =============================================================================

struct StubAuth {
    user_id: Uuid,
}

#[async_trait]
impl AuthService for StubAuth {
    async fn register(&self, email: String, _password: String, name: String) -> AppResult<AuthResponse> {
        if email == "taken@example.com" {
            return Err(AppError::conflict("Ya existe una cuenta con ese correo"));
        }

        Ok(AuthResponse {
            token: "issued-token".to_string(),
            user: UserSnapshot {
                id: Some(self.user_id),
                email: Some(email),
                name: Some(name),
                roles: Some(vec![Role::Client]),
                ..Default::default()
            },
        })
    }

    async fn login(&self, _email: String, _password: String) -> AppResult<AuthResponse> {
        Err(AppError::InvalidCredentials)
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        if token != VALID_TOKEN {
            return Err(AppError::InvalidToken);
        }

        Ok(Claims {
            id: self.user_id,
            email: "ana@example.com".to_string(),
            exp: Utc::now().timestamp() + 3600,
            iat: Utc::now().timestamp(),
        })
    }
}

/// Remembers who already registered a business
#[derive(Default)]
struct StubAccounts {
    owners: Mutex<Vec<Uuid>>,
}

#[async_trait]
impl AccountService for StubAccounts {
    async fn profile(&self, user_id: Uuid) -> AppResult<ProfileResponse> {
        Ok(ProfileResponse {
            user: UserSnapshot {
                id: Some(user_id),
                email: Some("ana@example.com".to_string()),
                roles: Some(vec![Role::Client]),
                ..Default::default()
            },
            establishment: None,
            courier: None,
        })
    }

    async fn establishment_types(&self) -> AppResult<Vec<EstablishmentTypeView>> {
        Ok(vec![EstablishmentTypeView {
            id: Uuid::new_v4(),
            key: "comida".to_string(),
            name: "Comida / Restaurante".to_string(),
        }])
    }

    async fn register_business(
        &self,
        user_id: Uuid,
        establishment: NewEstablishment,
    ) -> AppResult<RoleGrantResponse> {
        let mut owners = self.owners.lock().unwrap();
        if owners.contains(&user_id) {
            return Err(AppError::conflict("Ya tienes un negocio registrado"));
        }
        owners.push(user_id);

        Ok(RoleGrantResponse {
            message: format!("Negocio registrado correctamente: {}", establishment.business_name),
            user: UserSnapshot {
                id: Some(user_id),
                roles: Some(vec![Role::Client, Role::Establishment]),
                ..Default::default()
            },
        })
    }

    async fn become_courier(&self, _user_id: Uuid) -> AppResult<RoleGrantResponse> {
        Err(AppError::conflict("Ya estás registrado como domiciliario"))
    }
}

/// Records the establishment filter of the last listing
#[derive(Default)]
struct StubProducts {
    last_filter: Mutex<Option<Option<Uuid>>>,
}

fn product_view(name: &str) -> ProductView {
    ProductView {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: String::new(),
        price: Decimal::new(249000, 1),
        image: None,
        establishment_id: Some(Uuid::new_v4()),
        establishment_name: Some("Popsy".to_string()),
        type_name: Some("Comida / Restaurante".to_string()),
        type_key: Some("comida".to_string()),
        created_at: Utc::now(),
    }
}

#[async_trait]
impl ProductService for StubProducts {
    async fn list(&self, establishment_id: Option<Uuid>) -> AppResult<Vec<ProductView>> {
        *self.last_filter.lock().unwrap() = Some(establishment_id);
        Ok(vec![product_view("Combo familiar")])
    }

    async fn list_mine(&self, _user_id: Uuid) -> AppResult<Vec<ProductView>> {
        Err(AppError::forbidden("No tienes un establecimiento registrado"))
    }

    async fn create(&self, _user_id: Uuid, draft: ProductDraft) -> AppResult<ProductView> {
        let mut view = product_view(&draft.name);
        view.price = draft.price;
        Ok(view)
    }

    async fn update(&self, _user_id: Uuid, _id: Uuid, _draft: ProductDraft) -> AppResult<ProductView> {
        Err(AppError::not_found("Producto no encontrado o no te pertenece"))
    }

    async fn delete(&self, _user_id: Uuid, _id: Uuid) -> AppResult<()> {
        Ok(())
    }

    async fn upload_image(&self, image: ImageUpload) -> AppResult<String> {
        Ok(format!("http://localhost:3000/uploads/{}.{}", Uuid::new_v4(), image.extension))
    }
}

struct StubDatabase {
    up: bool,
}

#[async_trait]
impl HealthCheck for StubDatabase {
    async fn ping(&self) -> Result<(), DbErr> {
        if self.up {
            Ok(())
        } else {
            Err(DbErr::Custom("connection refused".to_string()))
        }
    }
}

// =============================================================================
// Test Helpers
// =============================================================================

struct TestApp {
    router: Router,
    products: Arc<StubProducts>,
}

fn test_app_with(db_up: bool) -> TestApp {
    let config = Config::from_lookup(|key| match key {
        "UPLOAD_MAX_MB" => Some("1".to_string()),
        "UPLOAD_DIR" => Some(std::env::temp_dir().display().to_string()),
        _ => None,
    })
    .unwrap();

    let products = Arc::new(StubProducts::default());
    let services = Services::new(
        Arc::new(StubAuth {
            user_id: Uuid::new_v4(),
        }),
        Arc::new(StubAccounts::default()),
        products.clone(),
        Arc::new(Payments::new(None, config.frontend_url.clone())),
    );

    let state = AppState::new(&services, Arc::new(StubDatabase { up: db_up }), config);
    TestApp {
        router: create_router(state),
        products,
    }
}

fn test_app() -> TestApp {
    test_app_with(true)
}

fn json_request(method: &str, uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

// =============================================================================
// Health & Root
// =============================================================================

#[tokio::test]
async fn test_root_redirects_to_health() {
    let app = test_app();
    let response = app.router.clone().oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/api/health");
}

#[tokio::test]
async fn test_health_reports_database() {
    let (status, body) = send(&test_app().router, get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["mensaje"], "API Snappy");
    assert_eq!(body["database"], "conectada");

    let (status, body) = send(&test_app_with(false).router, get("/api/health")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["ok"], false);
    assert_eq!(body["database"], "desconectada");
}

// =============================================================================
// Auth Endpoints
// =============================================================================

#[tokio::test]
async fn test_register_returns_token_and_user() {
    let app = test_app();
    let (status, body) = send(
        &app.router,
        json_request(
            "POST",
            "/api/auth/registro",
            json!({ "correo": "ana@example.com", "contrasena": "secret1", "nombre": "Ana" }),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token"], "issued-token");
    assert_eq!(body["usuario"]["email"], "ana@example.com");
    assert_eq!(body["usuario"]["roles"], json!(["cliente"]));
}

#[tokio::test]
async fn test_register_validation_messages() {
    let app = test_app();
    let (status, body) = send(
        &app.router,
        json_request(
            "POST",
            "/api/auth/registro",
            json!({ "correo": "ana@example.com", "contrasena": "123", "nombre": "Ana" }),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["mensaje"], "La contraseña debe tener al menos 6 caracteres");
    assert_eq!(body["codigo"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let app = test_app();
    let (status, body) = send(
        &app.router,
        json_request(
            "POST",
            "/api/auth/registro",
            json!({ "correo": "taken@example.com", "contrasena": "secret1", "nombre": "Ana" }),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["mensaje"], "Ya existe una cuenta con ese correo");
}

#[tokio::test]
async fn test_login_with_wrong_credentials() {
    let app = test_app();
    let (status, body) = send(
        &app.router,
        json_request(
            "POST",
            "/api/auth/login",
            json!({ "email": "ana@example.com", "contraseña": "nope" }),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["mensaje"], "Correo o contraseña incorrectos");
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = test_app();

    let (status, body) = send(&app.router, get("/api/auth/yo")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["mensaje"], "Token requerido");

    let (status, body) = send(
        &app.router,
        json_request("POST", "/api/auth/ser-domiciliario", json!({}), Some("forged")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["mensaje"], "Token inválido o expirado");
}

#[tokio::test]
async fn test_me_returns_profile() {
    let app = test_app();
    let request = Request::builder()
        .uri("/api/auth/yo")
        .header(header::AUTHORIZATION, format!("Bearer {}", VALID_TOKEN))
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["usuario"]["email"], "ana@example.com");
}

#[tokio::test]
async fn test_second_business_registration_conflicts() {
    let app = test_app();
    let payload = json!({ "nombre_negocio": "Popsy", "tipo_establecimiento": "Comida" });

    let (status, body) = send(
        &app.router,
        json_request("POST", "/api/auth/registrar-negocio", payload.clone(), Some(VALID_TOKEN)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["usuario"]["roles"], json!(["cliente", "establecimiento"]));

    let (status, body) = send(
        &app.router,
        json_request("POST", "/api/auth/registrar-negocio", payload, Some(VALID_TOKEN)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["mensaje"], "Ya tienes un negocio registrado");
}

#[tokio::test]
async fn test_business_registration_requires_known_type() {
    let app = test_app();
    let (status, _) = send(
        &app.router,
        json_request(
            "POST",
            "/api/auth/registrar-negocio",
            json!({ "nombre_negocio": "Popsy", "tipo_establecimiento": "farmacia" }),
            Some(VALID_TOKEN),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Product Endpoints
// =============================================================================

#[tokio::test]
async fn test_product_listing_is_uncached() {
    let app = test_app();
    let response = app.router.clone().oneshot(get("/api/productos")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CACHE_CONTROL]
        .to_str()
        .unwrap()
        .contains("no-store"));

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body[0]["nombre"], "Combo familiar");
    assert_eq!(body[0]["establecimiento"], "Popsy");
    assert_eq!(*app.products.last_filter.lock().unwrap(), Some(None));
}

#[tokio::test]
async fn test_product_listing_filter() {
    let app = test_app();
    let id = Uuid::new_v4();

    let (status, _) = send(&app.router, get(&format!("/api/productos?establecimiento_id={}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(*app.products.last_filter.lock().unwrap(), Some(Some(id)));

    let (status, _) = send(&app.router, get("/api/productos?establecimiento_id=abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_product_accepts_string_price() {
    let app = test_app();
    let (status, body) = send(
        &app.router,
        json_request(
            "POST",
            "/api/productos",
            json!({ "nombre": "  Jugo  ", "precio": "4500.555" }),
            Some(VALID_TOKEN),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["nombre"], "Jugo");
    assert_eq!(body["precio"], 4500.56);
}

#[tokio::test]
async fn test_create_product_rejects_negative_price() {
    let app = test_app();
    let (status, body) = send(
        &app.router,
        json_request(
            "POST",
            "/api/productos",
            json!({ "nombre": "Jugo", "precio": -1 }),
            Some(VALID_TOKEN),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["mensaje"], "El precio debe ser un número mayor o igual a 0");
}

#[tokio::test]
async fn test_own_products_without_establishment_is_forbidden() {
    let app = test_app();
    let request = Request::builder()
        .uri("/api/productos/mis-productos")
        .header(header::AUTHORIZATION, format!("Bearer {}", VALID_TOKEN))
        .body(Body::empty())
        .unwrap();

    let (status, _) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_update_and_delete_by_id() {
    let app = test_app();
    let uri = format!("/api/productos/{}", Uuid::new_v4());

    let (status, _) = send(
        &app.router,
        json_request("PUT", &uri, json!({ "nombre": "Jugo", "precio": 10 }), Some(VALID_TOKEN)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let request = Request::builder()
        .method("DELETE")
        .uri(&uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", VALID_TOKEN))
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let request = Request::builder()
        .method("DELETE")
        .uri("/api/productos/not-a-uuid")
        .header(header::AUTHORIZATION, format!("Bearer {}", VALID_TOKEN))
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

fn multipart_request(field: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Request<Body> {
    let boundary = "snappy-boundary";
    let mut body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/productos/subir-imagen")
        .header(header::AUTHORIZATION, format!("Bearer {}", VALID_TOKEN))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_image_upload() {
    let app = test_app();

    let (status, body) = send(
        &app.router,
        multipart_request("imagen", "combo.png", "image/png", b"\x89PNG fake"),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["url"].as_str().unwrap().ends_with(".png"));

    let (status, body) = send(
        &app.router,
        multipart_request("archivo", "combo.png", "image/png", b"\x89PNG fake"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["mensaje"], r#"Debes enviar un archivo de imagen (campo "imagen")"#);

    let (status, _) = send(
        &app.router,
        multipart_request("imagen", "notes.txt", "text/plain", b"hello"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Payment Endpoints
// =============================================================================

#[tokio::test]
async fn test_preference_requires_items() {
    let app = test_app();

    for payload in [json!({ "items": [] }), json!({}), json!({ "items": "combo" })] {
        let (status, _) = send(
            &app.router,
            json_request("POST", "/api/pagos/preferencia", payload, None),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_preference_without_credentials_is_unavailable() {
    let app = test_app();
    let (status, body) = send(
        &app.router,
        json_request(
            "POST",
            "/api/pagos/preferencia",
            json!({ "items": [{ "title": "Combo", "quantity": 1, "unit_price": 1000 }] }),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["mensaje"].as_str().unwrap().contains("MP_ACCESS_TOKEN"));
}

#[tokio::test]
async fn test_webhook_always_acknowledges() {
    let app = test_app();

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/pagos/webhook",
            json!({ "type": "payment", "data": { "id": "123" } }),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let request = Request::builder()
        .method("POST")
        .uri("/api/pagos/webhook?topic=merchant_order&id=9")
        .body(Body::from("not json"))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
