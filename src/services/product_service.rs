//! Product service - storefront catalog and admin management.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::course_service::first_free_slug;
use crate::domain::course::slugify;
use crate::domain::policy::{self, Action};
use crate::domain::product::check_pricing;
use crate::domain::{Actor, NewProduct, Product, ProductChanges};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[derive(Debug, Clone)]
pub struct ProductDraft {
    pub title: String,
    pub category: String,
    pub price: f64,
    pub discount_price: Option<f64>,
    pub stock: i32,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub title: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    /// `Some(None)` clears the discount
    pub discount_price: Option<Option<f64>>,
    pub stock: Option<i32>,
    pub is_active: Option<bool>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductService: Send + Sync {
    async fn list_active(
        &self,
        category: Option<String>,
        params: PaginationParams,
    ) -> AppResult<(Vec<Product>, u64)>;

    async fn get_by_slug(&self, slug: &str) -> AppResult<Product>;

    async fn create(&self, actor: Actor, draft: ProductDraft) -> AppResult<Product>;

    async fn update(&self, actor: Actor, id: Uuid, update: ProductUpdate) -> AppResult<Product>;

    async fn delete(&self, actor: Actor, id: Uuid) -> AppResult<()>;
}

pub struct ProductManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ProductManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn unique_slug(&self, title: &str, except: Option<Uuid>) -> AppResult<String> {
        let products = self.uow.products();
        first_free_slug(&slugify(title), |candidate| {
            let products = products.clone();
            async move { products.slug_exists(&candidate, except).await }
        })
        .await
    }
}

#[async_trait]
impl<U: UnitOfWork> ProductService for ProductManager<U> {
    async fn list_active(
        &self,
        category: Option<String>,
        params: PaginationParams,
    ) -> AppResult<(Vec<Product>, u64)> {
        let category = category.map(|c| c.trim().to_lowercase());
        self.uow.products().list_active(category, &params).await
    }

    async fn get_by_slug(&self, slug: &str) -> AppResult<Product> {
        self.uow
            .products()
            .find_by_slug(slug)
            .await?
            .filter(|p| p.is_active)
            .ok_or_not_found("Product")
    }

    async fn create(&self, actor: Actor, draft: ProductDraft) -> AppResult<Product> {
        policy::authorize(&actor, Action::ManageProducts)?;
        check_pricing(draft.price, draft.discount_price)?;

        let title = draft.title.trim().to_string();
        let slug = self.unique_slug(&title, None).await?;

        let product = self
            .uow
            .products()
            .create(NewProduct {
                title,
                slug,
                category: draft.category.trim().to_lowercase(),
                price: draft.price,
                discount_price: draft.discount_price,
                stock: draft.stock.max(0),
                is_active: draft.is_active,
            })
            .await?;

        tracing::info!(product_id = %product.id, slug = %product.slug, "Product created");
        Ok(product)
    }

    async fn update(&self, actor: Actor, id: Uuid, update: ProductUpdate) -> AppResult<Product> {
        policy::authorize(&actor, Action::ManageProducts)?;

        let products = self.uow.products();
        let current = products.find_by_id(id).await?.ok_or_not_found("Product")?;

        let price = update.price.unwrap_or(current.price);
        let discount = update.discount_price.unwrap_or(current.discount_price);
        check_pricing(price, discount)?;

        let title = update.title.map(|t| t.trim().to_string());
        let slug = match &title {
            Some(t) if *t != current.title => Some(self.unique_slug(t, Some(id)).await?),
            _ => None,
        };

        products
            .update(
                id,
                ProductChanges {
                    title,
                    slug,
                    category: update.category.map(|c| c.trim().to_lowercase()),
                    price: update.price,
                    discount_price: update.discount_price,
                    stock: update.stock.map(|s| s.max(0)),
                    is_active: update.is_active,
                },
            )
            .await
    }

    async fn delete(&self, actor: Actor, id: Uuid) -> AppResult<()> {
        policy::authorize(&actor, Action::ManageProducts)?;
        self.uow.products().delete(id).await?;
        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Rating, UserRole};
    use crate::errors::AppError;
    use crate::infra::MockProductRepository;
    use crate::services::testing::{MockUow, MockedPersistence};
    use chrono::Utc;

    fn product(price: f64, discount_price: Option<f64>) -> Product {
        Product {
            id: Uuid::new_v4(),
            title: "USB-C Cable".into(),
            slug: "usb-c-cable".into(),
            category: "cables".into(),
            price,
            discount_price,
            stock: 10,
            rating: Rating::default(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn service(products: MockProductRepository) -> ProductManager<MockedPersistence> {
        ProductManager::new(
            MockUow {
                products,
                ..Default::default()
            }
            .build(),
        )
    }

    fn admin() -> Actor {
        Actor::new(Uuid::new_v4(), UserRole::Admin)
    }

    #[tokio::test]
    async fn test_create_derives_slug_and_category() {
        let mut products = MockProductRepository::new();
        products.expect_slug_exists().returning(|_, _| Ok(false));
        products
            .expect_create()
            .withf(|p| p.slug == "usb-c-cable" && p.category == "cables")
            .times(1)
            .returning(|p| Ok(product(p.price, p.discount_price)));

        let draft = ProductDraft {
            title: "USB-C Cable".into(),
            category: "Cables".into(),
            price: 9.99,
            discount_price: Some(7.99),
            stock: 5,
            is_active: true,
        };
        service(products).create(admin(), draft).await.unwrap();
    }

    #[tokio::test]
    async fn test_discount_above_price_rejected_on_update() {
        let existing = product(10.0, None);
        let mut products = MockProductRepository::new();
        products
            .expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        products.expect_update().never();

        let update = ProductUpdate {
            discount_price: Some(Some(12.0)),
            ..Default::default()
        };
        let err = service(products)
            .update(admin(), Uuid::new_v4(), update)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_inactive_product_hidden() {
        let mut hidden = product(5.0, None);
        hidden.is_active = false;
        let mut products = MockProductRepository::new();
        products
            .expect_find_by_slug()
            .returning(move |_| Ok(Some(hidden.clone())));

        let err = service(products).get_by_slug("usb-c-cable").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_instructor_cannot_manage_products() {
        let mut products = MockProductRepository::new();
        products.expect_delete().never();

        let bob = Actor::new(Uuid::new_v4(), UserRole::Instructor);
        let err = service(products).delete(bob, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
