//! Product entities.

use chrono::{DateTime, Utc};
use domain::ProductView;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Largest price a NUMERIC(10,2) column holds
const MAX_PRICE_CENTS: i64 = 9_999_999_999;

/// Stored product
#[derive(Debug, Clone)]
pub struct Product {
    pub id: Uuid,
    pub establishment_id: Uuid,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Product joined with its establishment, as shown in the public catalogue
#[derive(Debug, Clone)]
pub struct ProductListing {
    pub product: Product,
    pub establishment_name: String,
    pub type_name: String,
    pub type_key: String,
}

impl From<Product> for ProductView {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            price: p.price,
            image: p.image,
            establishment_id: None,
            establishment_name: None,
            type_name: None,
            type_key: None,
            created_at: p.created_at,
        }
    }
}

impl From<ProductListing> for ProductView {
    fn from(listing: ProductListing) -> Self {
        let establishment_id = listing.product.establishment_id;
        Self {
            establishment_id: Some(establishment_id),
            establishment_name: Some(listing.establishment_name),
            type_name: Some(listing.type_name),
            type_key: Some(listing.type_key),
            ..ProductView::from(listing.product)
        }
    }
}

/// Validated product fields for create and update
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image: Option<String>,
}

impl ProductDraft {
    /// Trim and check product fields.
    ///
    /// `price` is `None` when the client sent something that is not a number.
    /// A blank image becomes `None`. The price is rounded to cents.
    pub fn parse(
        name: Option<&str>,
        description: Option<&str>,
        price: Option<Decimal>,
        image: Option<&str>,
    ) -> AppResult<Self> {
        let name = name.map(str::trim).unwrap_or_default();
        if name.is_empty() {
            return Err(AppError::validation("El nombre del producto es obligatorio"));
        }

        let price = price
            .map(|p| p.round_dp(2))
            .filter(|p| !p.is_sign_negative() && *p <= Decimal::new(MAX_PRICE_CENTS, 2))
            .ok_or_else(|| {
                AppError::validation("El precio debe ser un número mayor o igual a 0")
            })?;

        Ok(Self {
            name: name.to_string(),
            description: description.map(str::trim).unwrap_or_default().to_string(),
            price,
            image: image
                .map(str::trim)
                .filter(|i| !i.is_empty())
                .map(str::to_string),
        })
    }
}
