//! Storefront products.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::course::Rating;
use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub category: String,
    pub price: f64,
    pub discount_price: Option<f64>,
    pub stock: i32,
    pub rating: Rating,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub title: String,
    pub slug: String,
    pub category: String,
    pub price: f64,
    pub discount_price: Option<f64>,
    pub stock: i32,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    /// `Some(None)` clears the discount.
    pub discount_price: Option<Option<f64>>,
    pub stock: Option<i32>,
    pub is_active: Option<bool>,
}

/// A discount must not exceed the regular price.
pub fn check_pricing(price: f64, discount_price: Option<f64>) -> AppResult<()> {
    if price < 0.0 {
        return Err(AppError::validation("Price cannot be negative"));
    }
    match discount_price {
        Some(d) if d < 0.0 => Err(AppError::validation("Discount price cannot be negative")),
        Some(d) if d > price => Err(AppError::validation(
            "Discount price cannot exceed price",
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_pricing() {
        assert!(check_pricing(10.0, None).is_ok());
        assert!(check_pricing(10.0, Some(8.0)).is_ok());
        assert!(check_pricing(10.0, Some(12.0)).is_err());
        assert!(check_pricing(-1.0, None).is_err());
    }
}
