//! Database migration command.
//!
//! Migrations are embedded from `crates/api/migrations/` at build time and
//! never run automatically at API startup; this command is the only place
//! that applies them.

use super::{ConnectError, connect};

/// Errors produced by the migrate command.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run all pending migrations.
pub async fn run() -> Result<(), MigrationError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
