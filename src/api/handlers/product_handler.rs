//! Store catalog handlers.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post, put},
    Extension, Router,
};
use serde::{Deserialize, Deserializer};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::Product;
use crate::errors::AppResult;
use crate::services::{ProductDraft, ProductUpdate};
use crate::types::{Created, NoContent, Paginated, PaginationParams};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    pub category: Option<String>,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    #[schema(example = "Mechanical keyboard")]
    pub title: String,
    #[validate(length(min = 1, max = 64, message = "Category is required"))]
    pub category: String,
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: f64,
    #[validate(range(min = 0.0))]
    pub discount_price: Option<f64>,
    #[serde(default)]
    pub stock: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// Distinguishes an absent field from an explicit `null`.
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<f64>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub category: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    /// `null` removes the discount
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<f64>)]
    pub discount_price: Option<Option<f64>>,
    pub stock: Option<i32>,
    pub is_active: Option<bool>,
}

impl From<UpdateProductRequest> for ProductUpdate {
    fn from(req: UpdateProductRequest) -> Self {
        Self {
            title: req.title,
            category: req.category,
            price: req.price,
            discount_price: req.discount_price,
            stock: req.stock,
            is_active: req.is_active,
        }
    }
}

pub fn public_product_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products))
        .route("/products/:slug", get(get_product))
}

/// Store management (authenticated; admin enforced by services)
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/products", post(create_product))
        .route(
            "/admin/products/:id",
            put(update_product).delete(delete_product),
        )
}

/// List active products
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Store",
    params(PaginationParams, ProductQuery),
    responses((status = 200, description = "One page of active products", body = [Product]))
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<Paginated<Product>>> {
    let category = query.category.filter(|c| !c.trim().is_empty());
    let (products, total) = state
        .services
        .products()
        .list_active(category, params.clone())
        .await?;
    Ok(Json(Paginated::new(products, &params, total)))
}

#[utoipa::path(
    get,
    path = "/api/products/{slug}",
    tag = "Store",
    params(("slug" = String, Path, description = "Product slug")),
    responses(
        (status = 200, description = "Product", body = Product),
        (status = 404, description = "Product not found or inactive")
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Product>> {
    Ok(Json(state.services.products().get_by_slug(&slug).await?))
}

#[utoipa::path(
    post,
    path = "/api/admin/products",
    tag = "Store",
    security(("bearer_auth" = [])),
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Invalid pricing"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateProductRequest>,
) -> AppResult<Created<Product>> {
    let draft = ProductDraft {
        title: payload.title,
        category: payload.category,
        price: payload.price,
        discount_price: payload.discount_price,
        stock: payload.stock,
        is_active: payload.is_active,
    };
    let product = state
        .services
        .products()
        .create(current_user.actor(), draft)
        .await?;
    Ok(Created(product))
}

#[utoipa::path(
    put,
    path = "/api/admin/products/{id}",
    tag = "Store",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn update_product(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateProductRequest>,
) -> AppResult<Json<Product>> {
    let product = state
        .services
        .products()
        .update(current_user.actor(), id, payload.into())
        .await?;
    Ok(Json(product))
}

#[utoipa::path(
    delete,
    path = "/api/admin/products/{id}",
    tag = "Store",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state
        .services
        .products()
        .delete(current_user.actor(), id)
        .await?;
    Ok(NoContent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discount_absent_vs_null() {
        let absent: UpdateProductRequest = serde_json::from_str(r#"{"price":10}"#).unwrap();
        assert_eq!(absent.discount_price, None);

        let cleared: UpdateProductRequest =
            serde_json::from_str(r#"{"discountPrice":null}"#).unwrap();
        assert_eq!(cleared.discount_price, Some(None));

        let set: UpdateProductRequest = serde_json::from_str(r#"{"discountPrice":7.5}"#).unwrap();
        assert_eq!(set.discount_price, Some(Some(7.5)));
    }

    #[test]
    fn test_create_defaults_to_active() {
        let req: CreateProductRequest =
            serde_json::from_str(r#"{"title":"Mug","category":"merch","price":12}"#).unwrap();
        assert!(req.is_active);
        assert_eq!(req.stock, 0);
    }
}
