//! Seed the catalog with the demo grocery products.
//!
//! Idempotent: products whose slug already exists are skipped, so the
//! command can be re-run after partial failures.

use rust_decimal::Decimal;
use tracing::info;

use mangaiyar_api::db::ProductRepository;
use mangaiyar_api::db::products::ProductData;
use mangaiyar_api::models::WeightVariant;

use super::connect;

/// Seed the demo catalog.
pub async fn catalog() -> Result<(), Box<dyn std::error::Error>> {
    let pool = connect().await?;
    let repo = ProductRepository::new(&pool);

    let mut created = 0u32;
    let mut skipped = 0u32;

    for product in demo_catalog() {
        if repo.get_by_slug(&product.slug).await?.is_some() {
            skipped += 1;
            continue;
        }
        let product = repo.create(product).await?;
        info!(title = %product.title, slug = %product.slug, "Seeded product");
        created += 1;
    }

    info!(created, skipped, "Catalog seed complete");
    Ok(())
}

fn variant(weight: &str, price: i64, mrp: i64, stock: i32) -> WeightVariant {
    WeightVariant {
        weight: weight.to_string(),
        price: Decimal::from(price),
        mrp: Some(Decimal::from(mrp)),
        stock,
    }
}

#[allow(clippy::too_many_arguments)]
fn product(
    title: &str,
    slug: &str,
    description: &str,
    category: &str,
    price: i64,
    mrp: i64,
    stock: i32,
    weight: &str,
    variants: Vec<WeightVariant>,
    sort_order: i32,
) -> ProductData {
    ProductData {
        title: title.to_string(),
        slug: slug.to_string(),
        description: Some(description.to_string()),
        price: Decimal::from(price),
        mrp: Some(Decimal::from(mrp)),
        stock,
        weight: Some(weight.to_string()),
        weight_variants: variants,
        images: Vec::new(),
        categories: vec![category.to_string()],
        sort_order,
    }
}

/// The demo products, each with its pack-size price ladder.
fn demo_catalog() -> Vec<ProductData> {
    vec![
        product(
            "Farm Cucumber",
            "farm-cucumber",
            "Crisp green cucumbers, picked daily.",
            "Vegetables",
            7,
            10,
            50,
            "100 g",
            vec![
                variant("100 g", 7, 10, 50),
                variant("250 g", 15, 21, 40),
                variant("500 g", 31, 42, 30),
                variant("1 kg", 134, 177, 20),
            ],
            1,
        ),
        product(
            "Fresh Coriander",
            "fresh-coriander",
            "Aromatic coriander bunches.",
            "Leafy Greens",
            7,
            10,
            50,
            "100 g",
            vec![
                variant("100 g", 7, 10, 50),
                variant("250 g", 15, 21, 40),
                variant("500 g", 31, 42, 30),
                variant("1 kg", 134, 177, 20),
            ],
            2,
        ),
        product(
            "Country Eggs",
            "country-eggs",
            "Free-range country eggs.",
            "Dairy & Eggs",
            45,
            60,
            50,
            "6 pcs",
            vec![
                variant("6 pcs", 45, 60, 50),
                variant("12 pcs", 85, 120, 40),
                variant("24 pcs", 160, 220, 30),
                variant("30 pcs", 200, 280, 20),
            ],
            3,
        ),
        product(
            "Shimla Apples",
            "shimla-apples",
            "Sweet, juicy apples from Shimla orchards.",
            "Fruits",
            180,
            250,
            25,
            "1 kg",
            vec![
                variant("250 g", 50, 65, 40),
                variant("500 g", 95, 130, 35),
                variant("1 kg", 180, 250, 25),
            ],
            4,
        ),
        product(
            "Yelakki Bananas",
            "yelakki-bananas",
            "Small, sweet Yelakki bananas.",
            "Fruits",
            38,
            55,
            40,
            "1 kg",
            vec![
                variant("250 g", 12, 15, 60),
                variant("500 g", 20, 30, 50),
                variant("1 kg", 38, 55, 40),
            ],
            5,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_catalog_slugs_are_unique() {
        let catalog = demo_catalog();
        let mut slugs: Vec<&str> = catalog.iter().map(|p| p.slug.as_str()).collect();
        slugs.sort_unstable();
        slugs.dedup();
        assert_eq!(slugs.len(), catalog.len());
    }

    #[test]
    fn test_demo_catalog_variants_priced_below_mrp() {
        for product in demo_catalog() {
            for variant in &product.weight_variants {
                let mrp = variant.mrp.expect("seed variants carry an MRP");
                assert!(variant.price < mrp, "{}: {}", product.title, variant.weight);
            }
        }
    }
}
