//! Product catalogue and establishment product management.
//!
//! Listing is public. Everything else acts on the signed-in user's
//! establishment and sends the session token when there is one; the backend
//! decides whether the caller may do it.

use std::future::Future;
use std::sync::{Arc, RwLock};

use domain::{ProductView, UploadResponse};
use reqwest::multipart::{Form, Part};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::api::ApiClient;
use crate::error::{ClientError, ClientResult};
use crate::pending::InFlight;
use crate::session::Session;

const PRODUCTS_PATH: &str = "/api/productos";
const MY_PRODUCTS_PATH: &str = "/api/productos/mis-productos";
const UPLOAD_PATH: &str = "/api/productos/subir-imagen";
const UPLOAD_FIELD: &str = "imagen";

const LIST_FAILED: &str = "Error al cargar productos";
const LIST_MINE_FAILED: &str = "Error al cargar tus productos";
const CREATE_FAILED: &str = "Error al crear el producto";
const UPDATE_FAILED: &str = "Error al actualizar el producto";
const DELETE_FAILED: &str = "Error al eliminar el producto";
const UPLOAD_FAILED: &str = "Error al subir la imagen";

/// Fields sent when creating or replacing a product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductInput {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "precio", with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Sent as `null` when there is no image
    #[serde(rename = "imagen")]
    pub image: Option<String>,
}

#[derive(Default)]
struct ProductsState {
    last_error: RwLock<Option<String>>,
    in_flight: InFlight,
}

/// Product endpoints, authenticated through a shared [`Session`].
#[derive(Clone)]
pub struct Products {
    api: ApiClient,
    session: Session,
    state: Arc<ProductsState>,
}

impl Products {
    pub fn new(api: ApiClient, session: Session) -> Self {
        Self {
            api,
            session,
            state: Arc::default(),
        }
    }

    /// Message of the most recent failed operation
    pub fn last_error(&self) -> Option<String> {
        self.state
            .last_error
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn is_busy(&self) -> bool {
        self.state.in_flight.is_busy()
    }

    /// Public catalogue, newest first, optionally for one establishment.
    pub async fn list(&self, establishment_id: Option<Uuid>) -> ClientResult<Vec<ProductView>> {
        self.track(LIST_FAILED, async {
            match establishment_id {
                Some(id) => {
                    let query = [("establecimiento_id", id.to_string())];
                    self.api.get_with_query(PRODUCTS_PATH, &query, None).await
                }
                None => self.api.get(PRODUCTS_PATH, None).await,
            }
        })
        .await
    }

    /// Products of the signed-in user's establishment
    pub async fn list_mine(&self) -> ClientResult<Vec<ProductView>> {
        let token = self.session.token();
        self.track(LIST_MINE_FAILED, self.api.get(MY_PRODUCTS_PATH, token.as_deref()))
            .await
    }

    pub async fn create(&self, product: &ProductInput) -> ClientResult<ProductView> {
        let token = self.session.token();
        self.track(
            CREATE_FAILED,
            self.api.post(PRODUCTS_PATH, product, token.as_deref()),
        )
        .await
    }

    pub async fn update(&self, id: Uuid, product: &ProductInput) -> ClientResult<ProductView> {
        let token = self.session.token();
        let path = product_path(id);
        self.track(UPDATE_FAILED, self.api.put(&path, product, token.as_deref()))
            .await
    }

    pub async fn delete(&self, id: Uuid) -> ClientResult<()> {
        let token = self.session.token();
        let path = product_path(id);
        self.track(DELETE_FAILED, self.api.delete(&path, token.as_deref()))
            .await
    }

    /// Upload a product image and return its public URL.
    pub async fn upload_image(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> ClientResult<String> {
        let token = self.session.token();
        self.track(UPLOAD_FAILED, async {
            let part = Part::bytes(bytes)
                .file_name(file_name.to_string())
                .mime_str(content_type)?;
            let form = Form::new().part(UPLOAD_FIELD, part);

            let uploaded: UploadResponse = self
                .api
                .post_multipart(UPLOAD_PATH, form, token.as_deref())
                .await?;
            Ok(uploaded.url)
        })
        .await
    }

    async fn track<T, F>(&self, fallback: &str, operation: F) -> ClientResult<T>
    where
        F: Future<Output = ClientResult<T>>,
    {
        self.set_error(None);
        let _pending = self.state.in_flight.start();

        operation.await.map_err(|err| {
            let message = err.user_message(fallback);
            tracing::warn!(error = %err, "{}", message);
            self.set_error(Some(message));
            err
        })
    }

    fn set_error(&self, message: Option<String>) {
        *self
            .state
            .last_error
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = message;
    }
}

fn product_path(id: Uuid) -> String {
    format!("{}/{}", PRODUCTS_PATH, id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_input_uses_wire_names_and_null_image() {
        let input = ProductInput {
            name: "Combo".into(),
            description: None,
            price: Decimal::new(249005, 1),
            image: None,
        };

        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            json!({ "nombre": "Combo", "precio": 24900.5, "imagen": null })
        );
    }
}
