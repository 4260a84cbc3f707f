//! Homepage banner model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mangaiyar_core::BannerId;

/// A hero/promo banner. The storefront shows active banners in `sort_order`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    pub id: BannerId,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    /// Image URL (hosted externally).
    pub image: String,
    #[serde(default)]
    pub link: Option<String>,
    /// Call-to-action label.
    pub cta: String,
    pub active: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}
