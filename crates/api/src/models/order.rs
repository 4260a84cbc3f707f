//! Order and line-item models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use mangaiyar_core::{OrderId, OrderStatus, ProductId};

/// One purchased product line within an order.
///
/// `product` is a weak reference: the catalog entry may be edited or deleted
/// after purchase. `product_title` and `product_image` are snapshots taken
/// at creation time (either caller-supplied or filled in by enrichment) and
/// are never updated afterwards, so the order keeps displaying the product
/// as it looked when it was bought.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Weak reference to the catalog product. Kept as the caller-supplied
    /// string: an unparseable or unknown id is a valid dangling reference,
    /// not an input error.
    #[serde(default)]
    pub product: Option<String>,
    /// Quantity purchased. Caller-supplied, not checked against stock.
    pub qty: u32,
    /// Purchase-time unit price in rupees. Frozen; does not track catalog
    /// price changes.
    pub price: Decimal,
    /// Purchase-time product title snapshot.
    #[serde(default)]
    pub product_title: Option<String>,
    /// Purchase-time product image URL snapshot.
    #[serde(default)]
    pub product_image: Option<String>,
}

/// One checkout transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    /// Line items in cart order.
    pub items: Vec<OrderItem>,
    /// Unstructured recipient mapping (name, email, phone, address, city,
    /// state, pin, ...). No schema is enforced beyond presence.
    pub shipping_address: Value,
    /// Order total in rupees, trusted from the client.
    pub total: Decimal,
    /// Free-form payment method tag (e.g. "cod", "razorpay").
    pub payment_method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub razorpay_order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub razorpay_payment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub razorpay_signature: Option<String>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl OrderItem {
    /// Parse the weak product reference, if it is present and well-formed.
    /// A malformed reference is treated the same as a dangling one.
    #[must_use]
    pub fn product_id(&self) -> Option<ProductId> {
        self.product.as_deref().and_then(|raw| raw.parse().ok())
    }
}

impl Order {
    /// Customer email from the shipping address (`email`, falling back to
    /// `emailAddress`).
    #[must_use]
    pub fn customer_email(&self) -> Option<&str> {
        address_field(&self.shipping_address, &["email", "emailAddress"])
    }

    /// Customer phone from the shipping address.
    #[must_use]
    pub fn customer_phone(&self) -> Option<&str> {
        address_field(&self.shipping_address, &["phone"])
    }

    /// Customer display name (`name`, falling back to `firstName`).
    #[must_use]
    pub fn customer_name(&self) -> Option<&str> {
        address_field(&self.shipping_address, &["name", "firstName"])
    }

    /// Single-line rendering of the street/city/state/pin fields, skipping
    /// whatever is absent.
    #[must_use]
    pub fn address_line(&self) -> String {
        ["address", "city", "state", "pin"]
            .into_iter()
            .filter_map(|key| address_field(&self.shipping_address, &[key]))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// First non-empty string value among `keys` in an address mapping.
fn address_field<'a>(address: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| address.get(*key).and_then(Value::as_str))
        .find(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn order_with_address(address: Value) -> Order {
        Order {
            id: OrderId::generate(),
            items: Vec::new(),
            shipping_address: address,
            total: Decimal::from(100),
            payment_method: "cod".to_string(),
            razorpay_order_id: None,
            razorpay_payment_id: None,
            razorpay_signature: None,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_customer_email_fallback() {
        let order = order_with_address(json!({"emailAddress": "a@x.com"}));
        assert_eq!(order.customer_email(), Some("a@x.com"));

        let order = order_with_address(json!({"email": "b@x.com", "emailAddress": "a@x.com"}));
        assert_eq!(order.customer_email(), Some("b@x.com"));
    }

    #[test]
    fn test_customer_email_ignores_empty_string() {
        let order = order_with_address(json!({"email": "", "emailAddress": "a@x.com"}));
        assert_eq!(order.customer_email(), Some("a@x.com"));
    }

    #[test]
    fn test_customer_name_fallback() {
        let order = order_with_address(json!({"firstName": "Priya"}));
        assert_eq!(order.customer_name(), Some("Priya"));
    }

    #[test]
    fn test_address_line_skips_missing_fields() {
        let order = order_with_address(json!({
            "address": "1 Beach Rd",
            "city": "Chennai",
            "pin": "600001"
        }));
        assert_eq!(order.address_line(), "1 Beach Rd Chennai 600001");
    }

    #[test]
    fn test_missing_fields_are_none() {
        let order = order_with_address(json!({}));
        assert_eq!(order.customer_email(), None);
        assert_eq!(order.customer_phone(), None);
        assert_eq!(order.address_line(), "");
    }

    #[test]
    fn test_product_reference_parses_or_dangles() {
        let mut item: OrderItem = serde_json::from_value(json!({
            "product": "p1",
            "qty": 1,
            "price": 5
        }))
        .expect("non-UUID reference is still a valid item");
        assert!(item.product_id().is_none());

        item.product = Some("c9bf9e57-1685-4c89-bafb-ff5af830be8a".to_string());
        assert!(item.product_id().is_some());
    }

    #[test]
    fn test_item_wire_format_is_camel_case() {
        let item: OrderItem = serde_json::from_value(json!({
            "product": "c9bf9e57-1685-4c89-bafb-ff5af830be8a",
            "qty": 2,
            "price": 50,
            "productTitle": "Country Eggs (6 pcs)"
        }))
        .expect("deserialize");
        assert_eq!(item.qty, 2);
        assert_eq!(item.product_title.as_deref(), Some("Country Eggs (6 pcs)"));
        assert_eq!(item.product_image, None);

        let json = serde_json::to_value(&item).expect("serialize");
        assert!(json.get("productTitle").is_some());
        assert!(json.get("product_title").is_none());
    }
}
