//! Product repository.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::conflict_or_db;
use super::entities::product::{self, ActiveModel, Entity as ProductEntity};
use crate::domain::{NewProduct, Product, ProductChanges};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>>;

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Product>>;

    async fn slug_exists(&self, slug: &str, except: Option<Uuid>) -> AppResult<bool>;

    /// Active products, newest first, optionally in one category
    async fn list_active(
        &self,
        category: Option<String>,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Product>, u64)>;

    /// Active products in any of `categories`, best rated then newest first
    async fn top_rated_in_categories(
        &self,
        categories: Vec<String>,
        limit: u64,
    ) -> AppResult<Vec<Product>>;

    async fn create(&self, product: NewProduct) -> AppResult<Product>;

    async fn update(&self, id: Uuid, changes: ProductChanges) -> AppResult<Product>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    async fn count(&self) -> AppResult<u64>;
}

pub struct ProductStore {
    db: Arc<DatabaseConnection>,
}

impl ProductStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for ProductStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>> {
        let result = ProductEntity::find_by_id(id).one(self.db.as_ref()).await?;
        Ok(result.map(Product::from))
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Product>> {
        let result = ProductEntity::find()
            .filter(product::Column::Slug.eq(slug))
            .one(self.db.as_ref())
            .await?;
        Ok(result.map(Product::from))
    }

    async fn slug_exists(&self, slug: &str, except: Option<Uuid>) -> AppResult<bool> {
        let mut query = ProductEntity::find().filter(product::Column::Slug.eq(slug));
        if let Some(id) = except {
            query = query.filter(product::Column::Id.ne(id));
        }
        Ok(query.count(self.db.as_ref()).await? > 0)
    }

    async fn list_active(
        &self,
        category: Option<String>,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Product>, u64)> {
        let mut query = ProductEntity::find()
            .filter(product::Column::IsActive.eq(true))
            .order_by_desc(product::Column::CreatedAt);
        if let Some(category) = category {
            query = query.filter(product::Column::Category.eq(category));
        }

        let paginator = query.paginate(self.db.as_ref(), params.limit());
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(params.page() - 1).await?;

        Ok((models.into_iter().map(Product::from).collect(), total))
    }

    async fn top_rated_in_categories(
        &self,
        categories: Vec<String>,
        limit: u64,
    ) -> AppResult<Vec<Product>> {
        if categories.is_empty() {
            return Ok(Vec::new());
        }
        let models = ProductEntity::find()
            .filter(product::Column::IsActive.eq(true))
            .filter(product::Column::Category.is_in(categories))
            .order_by_desc(product::Column::RatingAverage)
            .order_by_desc(product::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await?;
        Ok(models.into_iter().map(Product::from).collect())
    }

    async fn create(&self, new_product: NewProduct) -> AppResult<Product> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(new_product.title),
            slug: Set(new_product.slug),
            category: Set(new_product.category),
            price: Set(new_product.price),
            discount_price: Set(new_product.discount_price),
            stock: Set(new_product.stock),
            rating_average: Set(0.0),
            rating_count: Set(0),
            is_active: Set(new_product.is_active),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| conflict_or_db(e, "Product"))?;
        Ok(Product::from(model))
    }

    async fn update(&self, id: Uuid, changes: ProductChanges) -> AppResult<Product> {
        let model = ProductEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or_not_found("Product")?;

        let mut active: ActiveModel = model.into();
        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(slug) = changes.slug {
            active.slug = Set(slug);
        }
        if let Some(category) = changes.category {
            active.category = Set(category);
        }
        if let Some(price) = changes.price {
            active.price = Set(price);
        }
        if let Some(discount) = changes.discount_price {
            active.discount_price = Set(discount);
        }
        if let Some(stock) = changes.stock {
            active.stock = Set(stock);
        }
        if let Some(is_active) = changes.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active
            .update(self.db.as_ref())
            .await
            .map_err(|e| conflict_or_db(e, "Product"))?;
        Ok(Product::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = ProductEntity::delete_by_id(id).exec(self.db.as_ref()).await?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Product"));
        }
        Ok(())
    }

    async fn count(&self) -> AppResult<u64> {
        ProductEntity::find()
            .count(self.db.as_ref())
            .await
            .map_err(Into::into)
    }
}
