//! Order repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use mangaiyar_core::{OrderId, OrderStatus};

use super::RepositoryError;
use crate::models::{Order, OrderItem};

const ORDER_COLUMNS: &str = "id, items, shipping_address, total, payment_method, \
     razorpay_order_id, razorpay_payment_id, razorpay_signature, status, created_at";

/// Internal row type for order queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    items: Json<Vec<OrderItem>>,
    shipping_address: Value,
    total: Decimal,
    payment_method: String,
    razorpay_order_id: Option<String>,
    razorpay_payment_id: Option<String>,
    razorpay_signature: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status: OrderStatus = row.status.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid order status in database: {e}"))
        })?;

        Ok(Self {
            id: OrderId::new(row.id),
            items: row.items.0,
            shipping_address: row.shipping_address,
            total: row.total,
            payment_method: row.payment_method,
            razorpay_order_id: row.razorpay_order_id,
            razorpay_payment_id: row.razorpay_payment_id,
            razorpay_signature: row.razorpay_signature,
            status,
            created_at: row.created_at,
        })
    }
}

/// Fields needed to persist a new order. Status is always `pending`.
#[derive(Debug)]
pub struct NewOrder {
    pub items: Vec<OrderItem>,
    pub shipping_address: Value,
    pub total: Decimal,
    pub payment_method: String,
    pub razorpay_order_id: Option<String>,
    pub razorpay_payment_id: Option<String>,
    pub razorpay_signature: Option<String>,
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist one order with `status = pending` and return it with its
    /// generated id. A single indivisible INSERT.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, new_order: NewOrder) -> Result<Order, RepositoryError> {
        let id = OrderId::generate();

        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "INSERT INTO orders \
                 (id, items, shipping_address, total, payment_method, \
                  razorpay_order_id, razorpay_payment_id, razorpay_signature, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(Json(&new_order.items))
        .bind(&new_order.shipping_address)
        .bind(new_order.total)
        .bind(&new_order.payment_method)
        .bind(&new_order.razorpay_order_id)
        .bind(&new_order.razorpay_payment_id)
        .bind(&new_order.razorpay_signature)
        .bind(OrderStatus::Pending.as_str())
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Total number of orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// One page of orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             ORDER BY created_at DESC \
             LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get an order by its id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Update an order's status, returning the updated order or `None` when
    /// it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "UPDATE orders SET status = $2 WHERE id = $1 RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(status.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Hard-delete an order. Returns `false` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: OrderId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id.as_uuid())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Orders containing at least one line item with a missing title or
    /// image snapshot. Used by the backfill CLI command.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn list_with_missing_snapshots(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             WHERE EXISTS ( \
                 SELECT 1 FROM jsonb_array_elements(items) AS item \
                 WHERE item->>'productTitle' IS NULL OR item->>'productImage' IS NULL \
             ) \
             ORDER BY created_at"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Replace an order's line items. Only used by the backfill command to
    /// fill snapshot fields that were never set; qty/price are untouched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update_items(
        &self,
        id: OrderId,
        items: &[OrderItem],
    ) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE orders SET items = $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(Json(items))
            .execute(self.pool)
            .await?;

        Ok(())
    }
}
