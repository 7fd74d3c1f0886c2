use std::sync::Arc;

use httpmock::prelude::*;
use rust_decimal::Decimal;
use serde_json::json;
use snappy_client::{
    App, ClientConfig, ClientError, MemoryStorage, ProductInput, SessionStorage, TOKEN_KEY,
    USER_KEY,
};
use uuid::Uuid;

const ESTABLISHMENT_ID: &str = "6ba7b810-9dad-11d1-80b4-00c04fd430c8";

fn listed_product(name: &str) -> serde_json::Value {
    json!({
        "id": Uuid::new_v4(),
        "nombre": name,
        "descripcion": "",
        "precio": 24900,
        "imagen": null,
        "establecimiento_id": ESTABLISHMENT_ID,
        "establecimiento": "Popsy",
        "tipo_nombre": "Comida / Restaurante",
        "tipo_clave": "comida",
        "creado_en": "2024-01-01T00:00:00Z",
    })
}

fn signed_in_app(server: &MockServer) -> App {
    let storage = Arc::new(MemoryStorage::new());
    storage.set(TOKEN_KEY, "tok").unwrap();
    storage
        .set(
            USER_KEY,
            &json!({
                "id": "550e8400-e29b-41d4-a716-446655440000",
                "email": "a@b.com",
                "nombre": "Ana",
                "roles": ["cliente", "establecimiento"],
            })
            .to_string(),
        )
        .unwrap();
    App::with_storage(&ClientConfig::new(server.base_url()), storage).unwrap()
}

fn combo() -> ProductInput {
    ProductInput {
        name: "Combo".into(),
        description: Some("Hamburguesa y papas".into()),
        price: Decimal::from(24900),
        image: None,
    }
}

#[tokio::test]
async fn test_listed_products_can_go_into_the_cart() {
    let server = MockServer::start_async().await;
    let list = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/productos");
            then.status(200).json_body(json!([listed_product("Combo")]));
        })
        .await;

    let app = App::new(&ClientConfig::new(server.base_url())).unwrap();
    let products = app.products().list(None).await.unwrap();

    list.assert_async().await;
    app.cart().add(&products[0]);
    assert_eq!(app.cart().total_price(), Decimal::from(24900));
    assert_eq!(app.cart().items()[0].establishment.as_deref(), Some("Popsy"));
}

#[tokio::test]
async fn test_listing_filters_by_establishment() {
    let server = MockServer::start_async().await;
    let filtered = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/productos")
                .query_param("establecimiento_id", ESTABLISHMENT_ID);
            then.status(200).json_body(json!([]));
        })
        .await;

    let app = App::new(&ClientConfig::new(server.base_url())).unwrap();
    let id = Uuid::parse_str(ESTABLISHMENT_ID).unwrap();
    let products = app.products().list(Some(id)).await.unwrap();

    filtered.assert_async().await;
    assert!(products.is_empty());
}

#[tokio::test]
async fn test_listing_failure_uses_fallback_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/productos");
            then.status(500).body("boom");
        })
        .await;

    let app = App::new(&ClientConfig::new(server.base_url())).unwrap();
    app.products().list(None).await.unwrap_err();

    assert_eq!(
        app.products().last_error().as_deref(),
        Some("Error al cargar productos")
    );
    assert!(!app.products().is_busy());
}

#[tokio::test]
async fn test_own_products_send_the_session_token() {
    let server = MockServer::start_async().await;
    let mine = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/productos/mis-productos")
                .header("authorization", "Bearer tok");
            then.status(200).json_body(json!([listed_product("Combo")]));
        })
        .await;

    let app = signed_in_app(&server);
    let products = app.products().list_mine().await.unwrap();

    mine.assert_async().await;
    assert_eq!(products[0].name, "Combo");
}

#[tokio::test]
async fn test_own_products_without_establishment_surface_server_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/productos/mis-productos");
            then.status(403)
                .json_body(json!({ "mensaje": "No tienes un establecimiento registrado" }));
        })
        .await;

    let app = signed_in_app(&server);
    let err = app.products().list_mine().await.unwrap_err();

    assert_eq!(err.status(), Some(403));
    assert_eq!(
        app.products().last_error().as_deref(),
        Some("No tienes un establecimiento registrado")
    );
}

#[tokio::test]
async fn test_create_sends_wire_fields() {
    let server = MockServer::start_async().await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/productos")
                .header("authorization", "Bearer tok")
                .json_body(json!({
                    "nombre": "Combo",
                    "descripcion": "Hamburguesa y papas",
                    "precio": 24900.0,
                    "imagen": null,
                }));
            then.status(201).json_body(listed_product("Combo"));
        })
        .await;

    let app = signed_in_app(&server);
    let created = app.products().create(&combo()).await.unwrap();

    create.assert_async().await;
    assert_eq!(created.price, Decimal::from(24900));
}

#[tokio::test]
async fn test_update_of_foreign_product_reports_not_found() {
    let server = MockServer::start_async().await;
    let id = Uuid::new_v4();
    server
        .mock_async(|when, then| {
            when.method(PUT).path(format!("/api/productos/{}", id));
            then.status(404)
                .json_body(json!({ "mensaje": "Producto no encontrado o no te pertenece" }));
        })
        .await;

    let app = signed_in_app(&server);
    let err = app.products().update(id, &combo()).await.unwrap_err();

    assert!(matches!(err, ClientError::Api { status: 404, .. }));
    assert_eq!(
        app.products().last_error().as_deref(),
        Some("Producto no encontrado o no te pertenece")
    );
}

#[tokio::test]
async fn test_delete_accepts_no_content() {
    let server = MockServer::start_async().await;
    let id = Uuid::new_v4();
    let delete = server
        .mock_async(|when, then| {
            when.method(DELETE).path(format!("/api/productos/{}", id));
            then.status(204);
        })
        .await;

    let app = signed_in_app(&server);
    app.products().delete(id).await.unwrap();

    delete.assert_async().await;
    assert_eq!(app.products().last_error(), None);
}

#[tokio::test]
async fn test_delete_failure_uses_fallback_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(DELETE).path_contains("/api/productos/");
            then.status(500);
        })
        .await;

    let app = signed_in_app(&server);
    app.products().delete(Uuid::new_v4()).await.unwrap_err();

    assert_eq!(
        app.products().last_error().as_deref(),
        Some("Error al eliminar el producto")
    );
}

#[tokio::test]
async fn test_image_upload_returns_url() {
    let server = MockServer::start_async().await;
    let upload = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/productos/subir-imagen")
                .header("authorization", "Bearer tok")
                .header_exists("content-type")
                .body_contains("name=\"imagen\"")
                .body_contains("filename=\"combo.png\"");
            then.status(201)
                .json_body(json!({ "url": "http://localhost:3000/uploads/abc.png" }));
        })
        .await;

    let app = signed_in_app(&server);
    let url = app
        .products()
        .upload_image("combo.png", "image/png", b"\x89PNG".to_vec())
        .await
        .unwrap();

    upload.assert_async().await;
    assert_eq!(url, "http://localhost:3000/uploads/abc.png");
}

#[tokio::test]
async fn test_rejected_upload_surfaces_server_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/productos/subir-imagen");
            then.status(400).json_body(json!({
                "mensaje": "Solo se permiten imágenes (JPEG, PNG, GIF, WebP)",
            }));
        })
        .await;

    let app = signed_in_app(&server);
    app.products()
        .upload_image("notes.txt", "text/plain", b"hello".to_vec())
        .await
        .unwrap_err();

    assert_eq!(
        app.products().last_error().as_deref(),
        Some("Solo se permiten imágenes (JPEG, PNG, GIF, WebP)")
    );
}
