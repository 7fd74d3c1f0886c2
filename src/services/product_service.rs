//! Product catalogue service.

use std::sync::Arc;

use async_trait::async_trait;
use domain::ProductView;
use uuid::Uuid;

use crate::config::{ALLOWED_IMAGE_EXTENSIONS, ALLOWED_IMAGE_MIME_TYPES};
use crate::domain::ProductDraft;
use crate::errors::{AppError, AppResult};
use crate::infra::{ImageStore, ImageUpload, UnitOfWork};

const NOT_AN_IMAGE: &str = "Solo se permiten imágenes (JPEG, PNG, GIF, WebP)";
const NOT_OWNED: &str = "Producto no encontrado o no te pertenece";

#[async_trait]
pub trait ProductService: Send + Sync {
    /// Public catalogue, newest first
    async fn list(&self, establishment_id: Option<Uuid>) -> AppResult<Vec<ProductView>>;

    /// Products of the caller's establishment
    async fn list_mine(&self, user_id: Uuid) -> AppResult<Vec<ProductView>>;

    async fn create(&self, user_id: Uuid, draft: ProductDraft) -> AppResult<ProductView>;

    async fn update(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        draft: ProductDraft,
    ) -> AppResult<ProductView>;

    async fn delete(&self, user_id: Uuid, product_id: Uuid) -> AppResult<()>;

    /// Store a product image and return its public URL
    async fn upload_image(&self, image: ImageUpload) -> AppResult<String>;
}

/// Check an uploaded file against the accepted image types and size ceiling.
///
/// Both the declared MIME type and the file extension must match.
pub fn accept_image(
    file_name: Option<&str>,
    content_type: Option<&str>,
    bytes: Vec<u8>,
    max_mb: u64,
) -> AppResult<ImageUpload> {
    let content_type = content_type.unwrap_or_default().to_ascii_lowercase();
    let extension = file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    if !ALLOWED_IMAGE_MIME_TYPES.contains(&content_type.as_str())
        || !ALLOWED_IMAGE_EXTENSIONS.contains(&extension.as_str())
    {
        return Err(AppError::validation(NOT_AN_IMAGE));
    }

    let max_bytes = max_mb.saturating_mul(1024 * 1024);
    if bytes.len() as u64 > max_bytes {
        return Err(AppError::validation(format!(
            "La imagen no puede superar {} MB",
            max_mb
        )));
    }

    Ok(ImageUpload {
        bytes,
        extension,
        content_type,
    })
}

pub struct ProductCatalog<U: UnitOfWork> {
    uow: Arc<U>,
    images: Arc<dyn ImageStore>,
}

impl<U: UnitOfWork> ProductCatalog<U> {
    pub fn new(uow: Arc<U>, images: Arc<dyn ImageStore>) -> Self {
        Self { uow, images }
    }

    /// Establishment owned by the caller
    async fn owned_establishment(&self, user_id: Uuid) -> AppResult<Uuid> {
        self.uow
            .establishments()
            .find_by_user(user_id)
            .await?
            .map(|details| details.establishment.id)
            .ok_or_else(|| AppError::forbidden("No tienes un establecimiento registrado"))
    }
}

#[async_trait]
impl<U: UnitOfWork> ProductService for ProductCatalog<U> {
    async fn list(&self, establishment_id: Option<Uuid>) -> AppResult<Vec<ProductView>> {
        let listings = self.uow.products().list(establishment_id).await?;
        Ok(listings.into_iter().map(ProductView::from).collect())
    }

    async fn list_mine(&self, user_id: Uuid) -> AppResult<Vec<ProductView>> {
        let establishment_id = self.owned_establishment(user_id).await?;
        let products = self
            .uow
            .products()
            .list_for_establishment(establishment_id)
            .await?;

        Ok(products.into_iter().map(ProductView::from).collect())
    }

    async fn create(&self, user_id: Uuid, draft: ProductDraft) -> AppResult<ProductView> {
        let establishment_id = self.owned_establishment(user_id).await?;
        let product = self.uow.products().create(establishment_id, draft).await?;

        tracing::info!(product_id = %product.id, %establishment_id, "Product created");
        Ok(ProductView::from(product))
    }

    async fn update(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        draft: ProductDraft,
    ) -> AppResult<ProductView> {
        let establishment_id = self.owned_establishment(user_id).await?;
        self.uow
            .products()
            .update(product_id, establishment_id, draft)
            .await?
            .map(ProductView::from)
            .ok_or_else(|| AppError::not_found(NOT_OWNED))
    }

    async fn delete(&self, user_id: Uuid, product_id: Uuid) -> AppResult<()> {
        let establishment_id = self.owned_establishment(user_id).await?;
        if !self
            .uow
            .products()
            .delete(product_id, establishment_id)
            .await?
        {
            return Err(AppError::not_found(NOT_OWNED));
        }

        tracing::info!(%product_id, %establishment_id, "Product deleted");
        Ok(())
    }

    async fn upload_image(&self, image: ImageUpload) -> AppResult<String> {
        self.images.store(image).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Establishment, EstablishmentDetails, EstablishmentType, Product};
    use crate::infra::LocalDiskStore;
    use crate::services::test_support::TestUow;
    use chrono::Utc;
    use mockall::predicate::eq;
    use rust_decimal::Decimal;

    fn details(user_id: Uuid, establishment_id: Uuid) -> EstablishmentDetails {
        let type_id = Uuid::new_v4();
        EstablishmentDetails {
            establishment: Establishment {
                id: establishment_id,
                user_id,
                type_id,
                business_name: "Popsy".into(),
                address: None,
                phone: None,
                created_at: Utc::now(),
            },
            kind: EstablishmentType {
                id: type_id,
                key: "comida".into(),
                name: "Comida / Restaurante".into(),
            },
        }
    }

    fn draft() -> ProductDraft {
        ProductDraft::parse(Some("Combo"), None, Some(Decimal::from(24900)), None).unwrap()
    }

    fn catalog(uow: TestUow) -> ProductCatalog<crate::services::test_support::MockedUow> {
        let images = Arc::new(LocalDiskStore::new(
            std::env::temp_dir(),
            "http://localhost:3000",
        ));
        ProductCatalog::new(uow.build(), images)
    }

    #[test]
    fn test_accept_image_requires_mime_and_extension() {
        assert!(accept_image(Some("foto.PNG"), Some("image/png"), vec![1], 1).is_ok());

        let err = accept_image(Some("foto.png"), Some("text/plain"), vec![1], 1).unwrap_err();
        assert_eq!(err.to_string(), NOT_AN_IMAGE);
        assert!(accept_image(Some("foto.exe"), Some("image/png"), vec![1], 1).is_err());
        assert!(accept_image(Some("foto"), Some("image/png"), vec![1], 1).is_err());
    }

    #[test]
    fn test_accept_image_enforces_size() {
        let err = accept_image(
            Some("foto.jpg"),
            Some("image/jpeg"),
            vec![0; 1024 * 1024 + 1],
            1,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "La imagen no puede superar 1 MB");
    }

    #[tokio::test]
    async fn test_create_without_establishment_is_forbidden() {
        let mut uow = TestUow::default();
        uow.establishments
            .expect_find_by_user()
            .returning(|_| Ok(None));
        uow.products.expect_create().never();

        let err = catalog(uow)
            .create(Uuid::new_v4(), draft())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Forbidden(_)));
        assert_eq!(err.to_string(), "No tienes un establecimiento registrado");
    }

    #[tokio::test]
    async fn test_create_uses_callers_establishment() {
        let user_id = Uuid::new_v4();
        let establishment_id = Uuid::new_v4();
        let mut uow = TestUow::default();
        uow.establishments
            .expect_find_by_user()
            .with(eq(user_id))
            .returning(move |id| Ok(Some(details(id, establishment_id))));
        uow.products
            .expect_create()
            .withf(move |id, _| *id == establishment_id)
            .returning(|establishment_id, draft| {
                Ok(Product {
                    id: Uuid::new_v4(),
                    establishment_id,
                    name: draft.name,
                    description: draft.description,
                    price: draft.price,
                    image: draft.image,
                    created_at: Utc::now(),
                })
            });

        let view = catalog(uow).create(user_id, draft()).await.unwrap();

        assert_eq!(view.name, "Combo");
        assert!(view.establishment_id.is_none());
    }

    #[tokio::test]
    async fn test_update_of_foreign_product_is_not_found() {
        let mut uow = TestUow::default();
        uow.establishments
            .expect_find_by_user()
            .returning(|id| Ok(Some(details(id, Uuid::new_v4()))));
        uow.products
            .expect_update()
            .returning(|_, _, _| Ok(None));

        let err = catalog(uow)
            .update(Uuid::new_v4(), Uuid::new_v4(), draft())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), NOT_OWNED);
    }

    #[tokio::test]
    async fn test_delete_reports_missing_product() {
        let mut uow = TestUow::default();
        uow.establishments
            .expect_find_by_user()
            .returning(|id| Ok(Some(details(id, Uuid::new_v4()))));
        uow.products.expect_delete().returning(|_, _| Ok(false));

        let err = catalog(uow)
            .delete(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }
}
