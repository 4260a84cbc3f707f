//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                   - Liveness check
//! GET  /health/ready             - Readiness check (DB ping)
//!
//! # Orders
//! POST   /api/orders/create      - Order placement pipeline
//! GET    /api/orders             - Paginated list, newest first
//! GET    /api/orders/{id}        - Single order
//! PATCH  /api/orders/{id}        - Status update
//! DELETE /api/orders/{id}        - Hard delete
//!
//! # Catalog
//! GET    /api/products           - List (category/search/limit filters)
//! GET    /api/products/{slug}    - Single product
//! POST   /api/products           - Create (admin)
//! PUT    /api/products/{id}      - Replace (admin)
//! DELETE /api/products/{id}      - Delete (admin)
//! GET    /api/categories         - Static category list
//!
//! # Blog
//! GET    /api/blog               - Published posts (page/limit/tag)
//! GET    /api/blog/{slug}        - Single post
//! POST   /api/blog               - Create (admin)
//! PUT    /api/blog/{slug}        - Replace content (admin)
//! PATCH  /api/blog/{slug}        - Publish/unpublish (admin)
//! DELETE /api/blog/{slug}        - Delete (admin)
//!
//! # Contact
//! POST   /api/contact            - Submit a message
//! GET    /api/admin/contacts     - Inbox (admin)
//! PATCH  /api/admin/contacts     - Triage status (admin)
//! DELETE /api/admin/contacts     - Delete (admin)
//!
//! # Banners
//! GET    /api/banners            - Active banners (?all=true for admin)
//! POST   /api/banners            - Create (admin)
//! PUT    /api/banners/{id}       - Replace (admin)
//! DELETE /api/banners/{id}       - Delete (admin)
//! ```
//!
//! Admin mutations require `Authorization: Bearer <ADMIN_API_TOKEN>`.

pub mod banners;
pub mod blog;
pub mod contact;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post, put},
};
use serde::Serialize;

use crate::state::AppState;

/// Simple `{"message": ...}` success body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    /// Build a message body.
    #[must_use]
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(orders::create))
        .route("/", get(orders::list))
        .route(
            "/{id}",
            get(orders::get_one)
                .patch(orders::update_status)
                .delete(orders::delete_one),
        )
}

/// Create the catalog routes router.
///
/// Public reads address products by slug; admin mutations address them by
/// id. Both share the one path segment, so the verb decides how it parses.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list).post(products::create))
        .route(
            "/{slug}",
            get(products::get_by_slug)
                .put(products::update)
                .delete(products::delete),
        )
}

/// Create the blog routes router.
pub fn blog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(blog::list).post(blog::create))
        .route(
            "/{slug}",
            get(blog::get_by_slug)
                .put(blog::update)
                .patch(blog::set_published)
                .delete(blog::delete),
        )
}

/// Create the admin contact inbox router.
pub fn admin_contact_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(contact::list)
            .patch(contact::update_status)
            .delete(contact::delete),
    )
}

/// Create the banner routes router.
pub fn banner_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(banners::list).post(banners::create))
        .route("/{id}", put(banners::update).delete(banners::delete))
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/orders", order_routes())
        .nest("/api/products", product_routes())
        .route("/api/categories", get(products::list_categories))
        .nest("/api/blog", blog_routes())
        .route("/api/contact", post(contact::submit))
        .nest("/api/admin/contacts", admin_contact_routes())
        .nest("/api/banners", banner_routes())
}
