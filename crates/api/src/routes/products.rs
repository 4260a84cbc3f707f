//! Catalog routes: public browse plus admin CRUD.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use mangaiyar_core::ProductId;

use crate::categories::{self, Category, name_from_slug};
use crate::db::products::{ProductData, ProductFilter};
use crate::db::{ProductRepository, RepositoryError};
use crate::error::{ApiError, internal};
use crate::middleware::RequireAdmin;
use crate::models::{Product, WeightVariant};
use crate::models::post::slugify;
use crate::routes::MessageResponse;
use crate::state::AppState;

/// Query parameters for `GET /api/products`.
#[derive(Debug, Deserialize)]
pub struct ListProductsParams {
    /// Category slug (e.g. `dairy-eggs`).
    #[serde(default)]
    pub category: Option<String>,
    /// Case-insensitive title search.
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
}

/// `GET /api/products` - plain product array, manual sort order first.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListProductsParams>,
) -> Result<Json<Vec<Product>>, ApiError> {
    // Categories are stored by display name; the query parameter is a slug.
    let category = params
        .category
        .as_deref()
        .and_then(name_from_slug)
        .map(String::from);

    let filter = ProductFilter {
        category,
        search: params.search,
        limit: params.limit,
    };

    let products = ProductRepository::new(state.pool())
        .list(&filter)
        .await
        .map_err(|e| internal(e, "Error fetching products"))?;

    Ok(Json(products))
}

/// `GET /api/products/{slug}`
#[instrument(skip(state))]
pub async fn get_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let product = ProductRepository::new(state.pool())
        .get_by_slug(&slug)
        .await
        .map_err(|e| internal(e, "Error fetching product"))?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    Ok(Json(product))
}

/// `GET /api/categories` - the static category list.
#[allow(clippy::unused_async)]
pub async fn list_categories() -> Json<&'static [Category]> {
    Json(categories::CATEGORIES)
}

/// Request body for creating or replacing a product.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub title: Option<String>,
    /// Derived from the title when omitted.
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Option<Decimal>,
    #[serde(default)]
    pub mrp: Option<Decimal>,
    #[serde(default)]
    pub stock: Option<i32>,
    #[serde(default)]
    pub weight: Option<String>,
    #[serde(default)]
    pub weight_variants: Option<Vec<WeightVariant>>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    #[serde(default)]
    pub sort_order: Option<i32>,
}

fn validate_product(request: ProductRequest) -> Result<ProductData, &'static str> {
    let title = match request.title {
        Some(title) if !title.trim().is_empty() => title,
        _ => return Err("Title is required"),
    };

    let Some(price) = request.price else {
        return Err("Price is required");
    };

    let slug = request
        .slug
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| slugify(&title));

    Ok(ProductData {
        title,
        slug,
        description: request.description,
        price,
        mrp: request.mrp,
        stock: request.stock.unwrap_or(0),
        weight: request.weight,
        weight_variants: request.weight_variants.unwrap_or_default(),
        images: request.images.unwrap_or_default(),
        categories: request.categories.unwrap_or_default(),
        sort_order: request.sort_order.unwrap_or(1),
    })
}

fn map_catalog_error(err: RepositoryError, public_message: &str) -> ApiError {
    match err {
        RepositoryError::Conflict(message) => ApiError::BadRequest(message),
        other => internal(other, public_message),
    }
}

/// `POST /api/products` (admin)
#[instrument(skip(state, request))]
pub async fn create(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(request): Json<ProductRequest>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let data =
        validate_product(request).map_err(|message| ApiError::BadRequest(message.to_string()))?;

    let product = ProductRepository::new(state.pool())
        .create(data)
        .await
        .map_err(|e| map_catalog_error(e, "Error creating product"))?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// `PUT /api/products/{id}` (admin) - full replace.
#[instrument(skip(state, request))]
pub async fn update(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ProductRequest>,
) -> Result<Json<Product>, ApiError> {
    let data =
        validate_product(request).map_err(|message| ApiError::BadRequest(message.to_string()))?;

    let product = ProductRepository::new(state.pool())
        .update(ProductId::new(id), data)
        .await
        .map_err(|e| map_catalog_error(e, "Error updating product"))?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    Ok(Json(product))
}

/// `DELETE /api/products/{id}` (admin) - hard delete. Orders referencing
/// the product keep their snapshots.
#[instrument(skip(state))]
pub async fn delete(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let deleted = ProductRepository::new(state.pool())
        .delete(ProductId::new(id))
        .await
        .map_err(|e| internal(e, "Error deleting product"))?;

    if deleted {
        Ok(Json(MessageResponse::new("Product deleted successfully")))
    } else {
        Err(ApiError::NotFound("Product not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(value: serde_json::Value) -> ProductRequest {
        serde_json::from_value(value).expect("valid request shape")
    }

    #[test]
    fn test_validate_requires_title_and_price() {
        let result = validate_product(request(json!({"price": 45})));
        assert_eq!(result.unwrap_err(), "Title is required");

        let result = validate_product(request(json!({"title": "Country Eggs"})));
        assert_eq!(result.unwrap_err(), "Price is required");
    }

    #[test]
    fn test_validate_derives_slug_from_title() {
        let data = validate_product(request(json!({
            "title": "Country Eggs (6 pcs)",
            "price": 45
        })))
        .expect("valid");
        assert_eq!(data.slug, "country-eggs-6-pcs");
    }

    #[test]
    fn test_validate_keeps_explicit_slug() {
        let data = validate_product(request(json!({
            "title": "Country Eggs",
            "slug": "desi-eggs",
            "price": 45
        })))
        .expect("valid");
        assert_eq!(data.slug, "desi-eggs");
    }

    #[test]
    fn test_validate_defaults() {
        let data = validate_product(request(json!({
            "title": "Bananas",
            "price": 38
        })))
        .expect("valid");
        assert_eq!(data.stock, 0);
        assert_eq!(data.sort_order, 1);
        assert!(data.weight_variants.is_empty());
        assert!(data.images.is_empty());
    }

    #[test]
    fn test_weight_variants_deserialize() {
        let data = validate_product(request(json!({
            "title": "Shimla Apples",
            "price": 180,
            "weightVariants": [
                {"weight": "250 g", "price": 50, "mrp": 65, "stock": 40},
                {"weight": "500 g", "price": 95, "mrp": 130, "stock": 35}
            ]
        })))
        .expect("valid");
        assert_eq!(data.weight_variants.len(), 2);
        assert_eq!(data.weight_variants[0].weight, "250 g");
    }
}
