//! Contact form message model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mangaiyar_core::{ContactId, ContactStatus};

/// A message submitted through the storefront contact form, triaged by the
/// back-office (`new` → `read` → `replied`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub status: ContactStatus,
    pub created_at: DateTime<Utc>,
}
