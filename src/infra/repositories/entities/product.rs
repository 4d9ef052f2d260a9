//! Product database entity.

use sea_orm::entity::prelude::*;

use crate::domain::{Product, Rating};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub category: String,
    pub price: f64,
    pub discount_price: Option<f64>,
    pub stock: i32,
    pub rating_average: f64,
    pub rating_count: i64,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Product {
    fn from(model: Model) -> Self {
        Product {
            id: model.id,
            title: model.title,
            slug: model.slug,
            category: model.category,
            price: model.price,
            discount_price: model.discount_price,
            stock: model.stock,
            rating: Rating {
                average: model.rating_average,
                count: model.rating_count,
            },
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
