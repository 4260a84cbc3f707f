//! Catalog product model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use mangaiyar_core::ProductId;

/// A pack-size variant of a product (e.g. "250 g", "1 kg", "6 pcs"), each
/// with its own price ladder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightVariant {
    pub weight: String,
    pub price: Decimal,
    #[serde(default)]
    pub mrp: Option<Decimal>,
    #[serde(default)]
    pub stock: i32,
}

/// A catalog product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Base price in rupees (the price of the default pack).
    pub price: Decimal,
    /// Strike-through price, when the product is discounted.
    #[serde(default)]
    pub mrp: Option<Decimal>,
    #[serde(default)]
    pub stock: i32,
    /// Default pack label, when the product has no variants.
    #[serde(default)]
    pub weight: Option<String>,
    #[serde(default)]
    pub weight_variants: Vec<WeightVariant>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    /// Manual ordering weight for storefront listings.
    #[serde(default = "default_sort_order")]
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

const fn default_sort_order() -> i32 {
    1
}

impl Product {
    /// Price shown for a selected variant, falling back to the base price
    /// when the product has no variants or the index is out of range.
    #[must_use]
    pub fn display_price(&self, variant: Option<usize>) -> Decimal {
        variant
            .and_then(|i| self.weight_variants.get(i))
            .map_or(self.price, |v| v.price)
    }

    /// Pack label shown for a selected variant, falling back to the base
    /// weight or a standard-pack label.
    #[must_use]
    pub fn display_weight(&self, variant: Option<usize>) -> &str {
        variant
            .and_then(|i| self.weight_variants.get(i))
            .map_or_else(
                || self.weight.as_deref().unwrap_or("Standard Pack"),
                |v| v.weight.as_str(),
            )
    }

    /// First catalog image, used as the line-item snapshot at order time.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apples() -> Product {
        Product {
            id: ProductId::generate(),
            title: "Shimla Apples".to_string(),
            slug: "shimla-apples".to_string(),
            description: None,
            price: Decimal::from(180),
            mrp: Some(Decimal::from(250)),
            stock: 25,
            weight: Some("1 kg".to_string()),
            weight_variants: vec![
                WeightVariant {
                    weight: "250 g".to_string(),
                    price: Decimal::from(50),
                    mrp: Some(Decimal::from(65)),
                    stock: 40,
                },
                WeightVariant {
                    weight: "500 g".to_string(),
                    price: Decimal::from(95),
                    mrp: Some(Decimal::from(130)),
                    stock: 35,
                },
            ],
            images: vec!["https://img.example/apples.jpg".to_string()],
            categories: vec!["Fruits".to_string()],
            sort_order: 1,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_display_price_selects_variant() {
        let product = apples();
        assert_eq!(product.display_price(Some(1)), Decimal::from(95));
    }

    #[test]
    fn test_display_price_falls_back_to_base() {
        let product = apples();
        assert_eq!(product.display_price(None), Decimal::from(180));
        assert_eq!(product.display_price(Some(9)), Decimal::from(180));
    }

    #[test]
    fn test_display_weight_fallbacks() {
        let mut product = apples();
        assert_eq!(product.display_weight(Some(0)), "250 g");
        assert_eq!(product.display_weight(None), "1 kg");

        product.weight = None;
        assert_eq!(product.display_weight(None), "Standard Pack");
    }

    #[test]
    fn test_primary_image() {
        let mut product = apples();
        assert_eq!(
            product.primary_image(),
            Some("https://img.example/apples.jpg")
        );
        product.images.clear();
        assert_eq!(product.primary_image(), None);
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let json = serde_json::to_value(apples()).expect("serialize");
        assert!(json.get("weightVariants").is_some());
        assert!(json.get("sortOrder").is_some());
        assert!(json.get("weight_variants").is_none());
    }
}
