use std::sync::Arc;
use std::time::Duration;

use httpmock::prelude::*;
use rust_decimal::Decimal;
use serde_json::json;
use snappy_client::{
    App, CartProduct, ClientConfig, ClientError, MemoryStorage, SessionStorage, TOKEN_KEY,
    USER_KEY,
};
use uuid::Uuid;

fn product(name: &str, price: i64) -> CartProduct {
    CartProduct {
        id: Uuid::new_v4(),
        name: name.to_string(),
        price: Decimal::from(price),
        image: None,
        establishment: Some("Popsy".into()),
    }
}

fn app_for(server: &MockServer) -> App {
    App::new(&ClientConfig::new(server.base_url())).unwrap()
}

#[tokio::test]
async fn test_empty_cart_is_rejected_before_any_request() {
    let server = MockServer::start_async().await;
    let preference = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/pagos/preferencia");
            then.status(200).json_body(json!({ "url": "https://mp.test/checkout" }));
        })
        .await;

    let app = app_for(&server);
    let err = app.start_checkout().await.unwrap_err();

    assert!(matches!(err, ClientError::EmptyCart));
    assert_eq!(app.checkout().last_error().as_deref(), Some("El carrito está vacío"));
    assert_eq!(preference.hits_async().await, 0);
}

#[tokio::test]
async fn test_cart_items_become_preference_items() {
    let server = MockServer::start_async().await;
    let preference = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/pagos/preferencia").json_body(json!({
                "items": [
                    { "title": "Combo", "quantity": 2, "unit_price": 1000.0 },
                    { "title": "Jugo", "quantity": 1, "unit_price": 500.0 },
                ]
            }));
            then.status(200).json_body(json!({ "url": "https://mp.test/checkout/123" }));
        })
        .await;

    let app = app_for(&server);
    let combo = product("Combo", 1000);
    app.cart().add(combo.clone());
    app.cart().add(combo);
    app.cart().add(product("Jugo", 500));

    let redirect = app.start_checkout().await.unwrap();

    preference.assert_async().await;
    assert_eq!(redirect.url(), "https://mp.test/checkout/123");
    assert_eq!(app.cart().total_item_count(), 3);
    assert!(!app.checkout().is_busy());
}

#[tokio::test]
async fn test_empty_url_is_an_error_and_keeps_cart() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/pagos/preferencia");
            then.status(200).json_body(json!({ "url": "" }));
        })
        .await;

    let app = app_for(&server);
    app.cart().add(product("Combo", 1000));

    let err = app.start_checkout().await.unwrap_err();

    assert!(matches!(err, ClientError::MissingCheckoutUrl));
    assert_eq!(
        app.checkout().last_error().as_deref(),
        Some("No se obtuvo la URL de pago.")
    );
    assert_eq!(app.cart().items().len(), 1);
}

#[tokio::test]
async fn test_provider_unavailable_message_is_surfaced() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/pagos/preferencia");
            then.status(503).json_body(json!({
                "mensaje": "Mercado Pago no configurado. Añade MP_ACCESS_TOKEN en el .env del servidor.",
                "codigo": "SERVICE_UNAVAILABLE",
            }));
        })
        .await;

    let app = app_for(&server);
    app.cart().add(product("Combo", 1000));

    let err = app.start_checkout().await.unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert!(app
        .checkout()
        .last_error()
        .unwrap()
        .starts_with("Mercado Pago no configurado"));
    assert!(!app.cart().is_empty());
}

#[tokio::test]
async fn test_signed_in_email_is_sent_as_payer() {
    let server = MockServer::start_async().await;
    let preference = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/pagos/preferencia")
                .json_body_partial(r#"{ "payer": { "email": "a@b.com" } }"#);
            then.status(200).json_body(json!({ "url": "https://mp.test/checkout" }));
        })
        .await;

    let storage = Arc::new(MemoryStorage::new());
    storage.set(TOKEN_KEY, "tok").unwrap();
    storage
        .set(
            USER_KEY,
            &json!({
                "id": "550e8400-e29b-41d4-a716-446655440000",
                "email": "a@b.com",
                "roles": ["cliente"],
            })
            .to_string(),
        )
        .unwrap();

    let app = App::with_storage(&ClientConfig::new(server.base_url()), storage).unwrap();
    app.cart().add(product("Combo", 1000));

    app.start_checkout().await.unwrap();
    preference.assert_async().await;
}

#[tokio::test]
async fn test_logout_leaves_cart_untouched() {
    let server = MockServer::start_async().await;
    let app = app_for(&server);
    app.cart().add(product("Combo", 1000));

    app.session().logout().unwrap();

    assert_eq!(app.cart().total_item_count(), 1);
}

#[tokio::test]
async fn test_abandoned_checkout_releases_busy_flag() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/pagos/preferencia");
            then.status(200)
                .delay(Duration::from_secs(2))
                .json_body(json!({ "url": "https://mp.test/checkout" }));
        })
        .await;

    let app = app_for(&server);
    app.cart().add(product("Combo", 1000));

    let abandoned = tokio::time::timeout(Duration::from_millis(200), app.start_checkout()).await;

    assert!(abandoned.is_err());
    assert!(!app.checkout().is_busy());
}

#[tokio::test]
async fn test_overlapping_checkouts_stay_busy_until_both_finish() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/pagos/preferencia");
            then.status(200)
                .delay(Duration::from_millis(300))
                .json_body(json!({ "url": "https://mp.test/checkout" }));
        })
        .await;

    let app = app_for(&server);
    app.cart().add(product("Combo", 1000));

    let slow = tokio::spawn({
        let app = app.clone();
        async move { app.start_checkout().await }
    });
    // The second attempt is dropped early; the first must still count as busy
    let _ = tokio::time::timeout(Duration::from_millis(50), app.start_checkout()).await;

    assert!(app.checkout().is_busy());
    slow.await.unwrap().unwrap();
    assert!(!app.checkout().is_busy());
}
