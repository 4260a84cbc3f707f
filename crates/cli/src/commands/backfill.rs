//! Backfill missing line-item snapshots on historical orders.
//!
//! Early orders were stored before title/image snapshots existed; this
//! command fills them from the current catalog where the referenced product
//! still exists. Items whose product has since been deleted are left as
//! they are.

use tracing::{info, warn};

use mangaiyar_api::db::{OrderRepository, ProductRepository};

use super::connect;

/// Fill missing `productTitle`/`productImage` snapshots.
pub async fn order_images() -> Result<(), Box<dyn std::error::Error>> {
    let pool = connect().await?;
    let orders = OrderRepository::new(&pool);
    let products = ProductRepository::new(&pool);

    let to_fix = orders.list_with_missing_snapshots().await?;
    info!(count = to_fix.len(), "Found orders to backfill");

    let mut updated = 0u32;

    for order in to_fix {
        let mut items = order.items;
        let mut changed = false;

        for item in &mut items {
            if item.product_title.is_some() && item.product_image.is_some() {
                continue;
            }
            let Some(product_id) = item.product_id() else {
                continue;
            };

            match products.get(product_id).await? {
                Some(product) => {
                    if item.product_image.is_none() {
                        if let Some(image) = product.primary_image() {
                            item.product_image = Some(image.to_string());
                            changed = true;
                        }
                    }
                    if item.product_title.is_none() {
                        item.product_title = Some(product.title);
                        changed = true;
                    }
                }
                None => {
                    warn!(%product_id, order = %order.id, "Product no longer exists, skipping item");
                }
            }
        }

        if changed {
            orders.update_items(order.id, &items).await?;
            updated += 1;
        }
    }

    info!(updated, "Backfill complete");
    Ok(())
}
