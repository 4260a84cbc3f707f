//! Order routes.
//!
//! `POST /api/orders/create` is the order placement pipeline: validate,
//! enrich line items from the catalog, persist, then fire best-effort
//! notifications. The remaining handlers are back-office order management.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures::future::join_all;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;
use uuid::Uuid;

use mangaiyar_core::{OrderId, OrderStatus};

use crate::db::orders::NewOrder;
use crate::db::{OrderRepository, ProductRepository};
use crate::error::{ApiError, internal};
use crate::models::{Order, OrderItem};
use crate::routes::MessageResponse;
use crate::services::dispatch_order_notifications;
use crate::state::AppState;

/// Request body for `POST /api/orders/create`.
///
/// Every field is optional at the serde level; the handler validates
/// presence itself so missing fields produce the documented 400 messages
/// instead of a generic deserialization error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub items: Option<Vec<OrderItem>>,
    #[serde(default)]
    pub shipping_address: Option<Value>,
    /// Accepted as an alias for `shippingAddress`.
    #[serde(default)]
    pub customer: Option<Value>,
    #[serde(default)]
    pub total: Option<Decimal>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub razorpay_order_id: Option<String>,
    #[serde(default)]
    pub razorpay_payment_id: Option<String>,
    #[serde(default)]
    pub razorpay_signature: Option<String>,
}

/// Success body for `POST /api/orders/create`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub success: bool,
    pub order_id: OrderId,
}

/// Validate a create request into the fields to persist.
///
/// The checks run in a fixed sequence and each failure names its field:
/// non-empty `items`, a shipping address (with `customer` fallback), a
/// non-zero `total`, a non-empty `paymentMethod`.
fn validate(request: CreateOrderRequest) -> Result<NewOrder, &'static str> {
    let items = match request.items {
        Some(items) if !items.is_empty() => items,
        _ => return Err("Items are required"),
    };

    let shipping_address = request
        .shipping_address
        .or(request.customer)
        .ok_or("Shipping address is required")?;

    let total = match request.total {
        Some(total) if !total.is_zero() => total,
        _ => return Err("Total is required"),
    };

    let payment_method = match request.payment_method {
        Some(method) if !method.is_empty() => method,
        _ => return Err("Payment method is required"),
    };

    Ok(NewOrder {
        items,
        shipping_address,
        total,
        payment_method,
        razorpay_order_id: request.razorpay_order_id,
        razorpay_payment_id: request.razorpay_payment_id,
        razorpay_signature: request.razorpay_signature,
    })
}

/// Fill in missing title/image snapshots from the catalog.
///
/// Caller-supplied snapshots pass through untouched. A failed lookup or a
/// dangling product reference leaves the fields empty; it never fails the
/// order.
async fn enrich_item(products: &ProductRepository<'_>, mut item: OrderItem) -> OrderItem {
    if item.product_title.is_some() && item.product_image.is_some() {
        return item;
    }

    let Some(product_id) = item.product_id() else {
        if let Some(raw) = &item.product {
            tracing::warn!(product = %raw, "Unparseable product reference, leaving snapshot fields empty");
        }
        return item;
    };

    match products.get(product_id).await {
        Ok(Some(product)) => {
            if item.product_image.is_none() {
                item.product_image = product.primary_image().map(String::from);
            }
            if item.product_title.is_none() {
                item.product_title = Some(product.title);
            }
        }
        Ok(None) => {
            tracing::warn!(%product_id, "Product no longer in catalog, leaving snapshot fields empty");
        }
        Err(e) => {
            tracing::warn!(%product_id, error = %e, "Could not fetch product details for order item");
        }
    }

    item
}

/// `POST /api/orders/create`
///
/// Pipeline: Received → Validated → Persisted → NotifiedBestEffort →
/// Responded. Validation failures return 400 before any persistence;
/// persistence failures return 500; notification failures cannot affect the
/// response.
#[instrument(skip(state, request))]
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Response {
    let new_order = match validate(request) {
        Ok(valid) => valid,
        Err(message) => return ApiError::BadRequest(message.to_string()).into_response(),
    };

    // Fan-out/fan-in: per-item catalog lookups run concurrently with no
    // cross-item state, and persistence waits for all of them.
    let NewOrder {
        items,
        shipping_address,
        total,
        payment_method,
        razorpay_order_id,
        razorpay_payment_id,
        razorpay_signature,
    } = new_order;

    let products = ProductRepository::new(state.pool());
    let items = join_all(items.into_iter().map(|item| enrich_item(&products, item))).await;

    let order = match OrderRepository::new(state.pool())
        .create(NewOrder {
            items,
            shipping_address,
            total,
            payment_method,
            razorpay_order_id,
            razorpay_payment_id,
            razorpay_signature,
        })
        .await
    {
        Ok(order) => order,
        Err(e) => return internal(e, "Error creating order").into_response(),
    };

    tracing::info!(order_id = %order.id, reference = %order.id.reference(), "Order created");

    // Best-effort side channels, sequential, after the persist. A slow
    // notification extends latency but cannot fail the response.
    dispatch_order_notifications(&state, &order).await;

    (
        StatusCode::CREATED,
        Json(CreateOrderResponse {
            success: true,
            order_id: order.id,
        }),
    )
        .into_response()
}

/// Pagination query parameters.
#[derive(Debug, Deserialize)]
pub struct ListOrdersParams {
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Pagination metadata returned alongside the order list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl Pagination {
    fn compute(page: i64, limit: i64, total: i64) -> Self {
        let total_pages = (total as u64).div_ceil(limit as u64) as i64;
        Self {
            page,
            limit,
            total,
            total_pages,
            has_next_page: page < total_pages,
            has_prev_page: page > 1,
        }
    }
}

/// Response body for `GET /api/orders`.
#[derive(Debug, Serialize)]
pub struct OrderListResponse {
    pub data: Vec<Order>,
    pub pagination: Pagination,
}

/// `GET /api/orders` - paginated order list, newest first.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListOrdersParams>,
) -> Result<Json<OrderListResponse>, ApiError> {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(10).max(1);
    let offset = (page - 1) * limit;

    let repo = OrderRepository::new(state.pool());
    let total = repo
        .count()
        .await
        .map_err(|e| internal(e, "Error fetching orders"))?;
    let data = repo
        .list(limit, offset)
        .await
        .map_err(|e| internal(e, "Error fetching orders"))?;

    Ok(Json(OrderListResponse {
        data,
        pagination: Pagination::compute(page, limit, total),
    }))
}

/// `GET /api/orders/{id}`
#[instrument(skip(state))]
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>, ApiError> {
    let order = OrderRepository::new(state.pool())
        .get(OrderId::new(id))
        .await
        .map_err(|e| internal(e, "Error fetching order"))?
        .ok_or_else(|| ApiError::NotFound("Order not found".to_string()))?;

    Ok(Json(order))
}

/// Request body for `PATCH /api/orders/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateOrderRequest {
    #[serde(default)]
    pub status: Option<String>,
}

/// `PATCH /api/orders/{id}` - admin status update, the only mutation an
/// order sees after creation.
#[instrument(skip(state))]
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateOrderRequest>,
) -> Result<Json<Order>, ApiError> {
    let status = request
        .status
        .ok_or_else(|| ApiError::BadRequest("Status is required".to_string()))?;
    let status: OrderStatus = status
        .parse()
        .map_err(|_| ApiError::BadRequest("Invalid status".to_string()))?;

    let order = OrderRepository::new(state.pool())
        .update_status(OrderId::new(id), status)
        .await
        .map_err(|e| internal(e, "Error updating order"))?
        .ok_or_else(|| ApiError::NotFound("Order not found".to_string()))?;

    Ok(Json(order))
}

/// `DELETE /api/orders/{id}` - hard delete.
#[instrument(skip(state))]
pub async fn delete_one(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let deleted = OrderRepository::new(state.pool())
        .delete(OrderId::new(id))
        .await
        .map_err(|e| internal(e, "Error deleting order"))?;

    if deleted {
        Ok(Json(MessageResponse::new("Order deleted successfully")))
    } else {
        Err(ApiError::NotFound("Order not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_request() -> CreateOrderRequest {
        serde_json::from_value(json!({
            "items": [{"product": "c9bf9e57-1685-4c89-bafb-ff5af830be8a", "qty": 2, "price": 50}],
            "shippingAddress": {
                "name": "A", "email": "a@x.com", "phone": "9999999999",
                "address": "1 St", "city": "C", "pin": "600001"
            },
            "total": 100,
            "paymentMethod": "cod"
        }))
        .expect("valid request")
    }

    #[test]
    fn test_validate_accepts_full_request() {
        let valid = validate(full_request()).expect("valid");
        assert_eq!(valid.items.len(), 1);
        assert_eq!(valid.payment_method, "cod");
        assert_eq!(valid.total, Decimal::from(100));
    }

    #[test]
    fn test_validate_missing_items() {
        let mut request = full_request();
        request.items = None;
        assert_eq!(validate(request).unwrap_err(), "Items are required");

        let mut request = full_request();
        request.items = Some(Vec::new());
        assert_eq!(validate(request).unwrap_err(), "Items are required");
    }

    #[test]
    fn test_validate_missing_shipping_address() {
        let mut request = full_request();
        request.shipping_address = None;
        assert_eq!(
            validate(request).unwrap_err(),
            "Shipping address is required"
        );
    }

    #[test]
    fn test_validate_customer_alias() {
        let mut request = full_request();
        request.customer = request.shipping_address.take();
        let valid = validate(request).expect("customer accepted as alias");
        assert_eq!(
            valid.shipping_address.get("name").and_then(|v| v.as_str()),
            Some("A")
        );
    }

    #[test]
    fn test_validate_prefers_shipping_address_over_customer() {
        let mut request = full_request();
        request.customer = Some(json!({"name": "other"}));
        let valid = validate(request).expect("valid");
        assert_eq!(
            valid.shipping_address.get("name").and_then(|v| v.as_str()),
            Some("A")
        );
    }

    #[test]
    fn test_validate_missing_total() {
        let mut request = full_request();
        request.total = None;
        assert_eq!(validate(request).unwrap_err(), "Total is required");
    }

    #[test]
    fn test_validate_zero_total_rejected() {
        let mut request = full_request();
        request.total = Some(Decimal::ZERO);
        assert_eq!(validate(request).unwrap_err(), "Total is required");
    }

    #[test]
    fn test_validate_missing_payment_method() {
        let mut request = full_request();
        request.payment_method = None;
        assert_eq!(validate(request).unwrap_err(), "Payment method is required");

        let mut request = full_request();
        request.payment_method = Some(String::new());
        assert_eq!(validate(request).unwrap_err(), "Payment method is required");
    }

    #[test]
    fn test_request_tolerates_null_fields() {
        let request: CreateOrderRequest = serde_json::from_value(json!({
            "items": null,
            "shippingAddress": null,
            "total": null,
            "paymentMethod": null
        }))
        .expect("nulls deserialize as absent");
        assert_eq!(validate(request).unwrap_err(), "Items are required");
    }

    #[test]
    fn test_pagination_math() {
        let p = Pagination::compute(1, 10, 35);
        assert_eq!(p.total_pages, 4);
        assert!(p.has_next_page);
        assert!(!p.has_prev_page);

        let p = Pagination::compute(4, 10, 35);
        assert!(!p.has_next_page);
        assert!(p.has_prev_page);

        let p = Pagination::compute(1, 10, 0);
        assert_eq!(p.total_pages, 0);
        assert!(!p.has_next_page);
        assert!(!p.has_prev_page);
    }
}
