//! Database operations for `PostgreSQL`.
//!
//! # Tables
//!
//! - `products` - Catalog (weight variants and images in JSONB)
//! - `orders` - Checkout transactions (line items denormalized in JSONB)
//! - `blog_posts` - Blog content
//! - `contacts` - Contact form messages
//! - `banners` - Homepage banners
//!
//! Queries use the runtime-bound sqlx API so the crate builds without a live
//! database. Each aggregate gets a repository struct; rows convert into the
//! `models` shapes via `TryFrom`, surfacing bad stored data as
//! [`RepositoryError::DataCorruption`].
//!
//! # Migrations
//!
//! Migrations live in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p mangaiyar-cli -- migrate
//! ```

pub mod banners;
pub mod contacts;
pub mod orders;
pub mod posts;
pub mod products;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use banners::BannerRepository;
pub use contacts::ContactRepository;
pub use orders::OrderRepository;
pub use posts::PostRepository;
pub use products::ProductRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., duplicate slug).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map a sqlx error, turning unique-constraint violations into
    /// [`RepositoryError::Conflict`] with the given description.
    pub(crate) fn from_sqlx(err: sqlx::Error, conflict_message: &str) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::Conflict(conflict_message.to_string())
            }
            _ => Self::Database(err),
        }
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Create a pool without establishing a connection up front.
///
/// Used by tests that exercise request paths which never reach the database.
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL cannot be parsed.
pub fn create_lazy_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(2)
        .acquire_timeout(Duration::from_secs(2))
        .connect_lazy(database_url.expose_secret())
}
