//! Product repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use mangaiyar_core::ProductId;

use super::RepositoryError;
use crate::models::{Product, WeightVariant};

const PRODUCT_COLUMNS: &str = "id, title, slug, description, price, mrp, stock, weight, \
     weight_variants, images, categories, sort_order, created_at";

/// Internal row type for product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    title: String,
    slug: String,
    description: Option<String>,
    price: Decimal,
    mrp: Option<Decimal>,
    stock: i32,
    weight: Option<String>,
    weight_variants: Json<Vec<WeightVariant>>,
    images: Json<Vec<String>>,
    categories: Json<Vec<String>>,
    sort_order: i32,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            title: row.title,
            slug: row.slug,
            description: row.description,
            price: row.price,
            mrp: row.mrp,
            stock: row.stock,
            weight: row.weight,
            weight_variants: row.weight_variants.0,
            images: row.images.0,
            categories: row.categories.0,
            sort_order: row.sort_order,
            created_at: row.created_at,
        }
    }
}

/// Fields for creating or replacing a product.
#[derive(Debug)]
pub struct ProductData {
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub mrp: Option<Decimal>,
    pub stock: i32,
    pub weight: Option<String>,
    pub weight_variants: Vec<WeightVariant>,
    pub images: Vec<String>,
    pub categories: Vec<String>,
    pub sort_order: i32,
}

/// Listing filters. `None` means "no constraint"; `limit: None` returns
/// everything.
#[derive(Debug, Default)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub search: Option<String>,
    pub limit: Option<i64>,
}

/// Repository for catalog database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products, manual sort order first, then newest.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE ($1::text IS NULL OR categories @> jsonb_build_array($1::text)) \
               AND ($2::text IS NULL OR title ILIKE '%' || $2 || '%') \
             ORDER BY sort_order ASC, created_at DESC \
             LIMIT $3"
        ))
        .bind(&filter.category)
        .bind(&filter.search)
        .bind(filter.limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a product by its id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Get a product by its slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Insert a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` on a duplicate slug.
    /// Returns `RepositoryError::Database` for other failures.
    pub async fn create(&self, data: ProductData) -> Result<Product, RepositoryError> {
        let id = ProductId::generate();

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO products \
                 (id, title, slug, description, price, mrp, stock, weight, \
                  weight_variants, images, categories, sort_order) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(&data.title)
        .bind(&data.slug)
        .bind(&data.description)
        .bind(data.price)
        .bind(data.mrp)
        .bind(data.stock)
        .bind(&data.weight)
        .bind(Json(&data.weight_variants))
        .bind(Json(&data.images))
        .bind(Json(&data.categories))
        .bind(data.sort_order)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "product slug already exists"))?;

        Ok(row.into())
    }

    /// Replace a product's fields. Returns `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` on a duplicate slug.
    /// Returns `RepositoryError::Database` for other failures.
    pub async fn update(
        &self,
        id: ProductId,
        data: ProductData,
    ) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE products SET \
                 title = $2, slug = $3, description = $4, price = $5, mrp = $6, \
                 stock = $7, weight = $8, weight_variants = $9, images = $10, \
                 categories = $11, sort_order = $12 \
             WHERE id = $1 \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(&data.title)
        .bind(&data.slug)
        .bind(&data.description)
        .bind(data.price)
        .bind(data.mrp)
        .bind(data.stock)
        .bind(&data.weight)
        .bind(Json(&data.weight_variants))
        .bind(Json(&data.images))
        .bind(Json(&data.categories))
        .bind(data.sort_order)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "product slug already exists"))?;

        Ok(row.map(Into::into))
    }

    /// Hard-delete a product. Returns `false` when it does not exist.
    /// Existing orders keep their snapshots; their weak references dangle.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_uuid())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
