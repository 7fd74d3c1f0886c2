//! Product repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, QueryTrait, RelationTrait, Set,
};
use uuid::Uuid;

use super::entities::{establishment, establishment_type, product};
use crate::domain::{Product, ProductDraft, ProductListing};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Public catalogue, newest first, optionally for one establishment
    async fn list(&self, establishment_id: Option<Uuid>) -> AppResult<Vec<ProductListing>>;

    /// Products of one establishment, newest first
    async fn list_for_establishment(&self, establishment_id: Uuid) -> AppResult<Vec<Product>>;

    async fn create(&self, establishment_id: Uuid, draft: ProductDraft) -> AppResult<Product>;

    /// `None` when the product does not exist or belongs to another establishment
    async fn update(
        &self,
        id: Uuid,
        establishment_id: Uuid,
        draft: ProductDraft,
    ) -> AppResult<Option<Product>>;

    /// `false` when nothing owned by `establishment_id` matched
    async fn delete(&self, id: Uuid, establishment_id: Uuid) -> AppResult<bool>;
}

pub struct ProductStore {
    db: DatabaseConnection,
}

impl ProductStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Flat row of the catalogue join
#[derive(Debug, FromQueryResult)]
struct ListingRow {
    id: Uuid,
    establishment_id: Uuid,
    name: String,
    description: Option<String>,
    price: Decimal,
    image: Option<String>,
    created_at: DateTime<Utc>,
    establishment_name: String,
    type_name: String,
    type_key: String,
}

impl From<ListingRow> for ProductListing {
    fn from(row: ListingRow) -> Self {
        ProductListing {
            product: Product {
                id: row.id,
                establishment_id: row.establishment_id,
                name: row.name,
                description: row.description.unwrap_or_default(),
                price: row.price,
                image: row.image,
                created_at: row.created_at,
            },
            establishment_name: row.establishment_name,
            type_name: row.type_name,
            type_key: row.type_key,
        }
    }
}

#[async_trait]
impl ProductRepository for ProductStore {
    async fn list(&self, establishment_id: Option<Uuid>) -> AppResult<Vec<ProductListing>> {
        let rows = product::Entity::find()
            .select_only()
            .column_as(product::Column::Id, "id")
            .column_as(product::Column::EstablishmentId, "establishment_id")
            .column_as(product::Column::Name, "name")
            .column_as(product::Column::Description, "description")
            .column_as(product::Column::Price, "price")
            .column_as(product::Column::Image, "image")
            .column_as(product::Column::CreatedAt, "created_at")
            .column_as(establishment::Column::BusinessName, "establishment_name")
            .column_as(establishment_type::Column::Name, "type_name")
            .column_as(establishment_type::Column::Key, "type_key")
            .join(JoinType::InnerJoin, product::Relation::Establishment.def())
            .join(
                JoinType::InnerJoin,
                establishment::Relation::EstablishmentType.def(),
            )
            .apply_if(establishment_id, |query, id| {
                query.filter(product::Column::EstablishmentId.eq(id))
            })
            .order_by_desc(product::Column::CreatedAt)
            .into_model::<ListingRow>()
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(ProductListing::from).collect())
    }

    async fn list_for_establishment(&self, establishment_id: Uuid) -> AppResult<Vec<Product>> {
        let models = product::Entity::find()
            .filter(product::Column::EstablishmentId.eq(establishment_id))
            .order_by_desc(product::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Product::from).collect())
    }

    async fn create(&self, establishment_id: Uuid, draft: ProductDraft) -> AppResult<Product> {
        let active_model = product::ActiveModel {
            id: Set(Uuid::new_v4()),
            establishment_id: Set(establishment_id),
            name: Set(draft.name),
            description: Set(Some(draft.description)),
            price: Set(draft.price),
            image: Set(draft.image),
            created_at: Set(Utc::now()),
        };

        let model = active_model.insert(&self.db).await?;
        Ok(Product::from(model))
    }

    async fn update(
        &self,
        id: Uuid,
        establishment_id: Uuid,
        draft: ProductDraft,
    ) -> AppResult<Option<Product>> {
        let Some(existing) = product::Entity::find_by_id(id)
            .filter(product::Column::EstablishmentId.eq(establishment_id))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active: product::ActiveModel = existing.into();
        active.name = Set(draft.name);
        active.description = Set(Some(draft.description));
        active.price = Set(draft.price);
        active.image = Set(draft.image);

        let model = active.update(&self.db).await?;
        Ok(Some(Product::from(model)))
    }

    async fn delete(&self, id: Uuid, establishment_id: Uuid) -> AppResult<bool> {
        let result = product::Entity::delete_many()
            .filter(product::Column::Id.eq(id))
            .filter(product::Column::EstablishmentId.eq(establishment_id))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
