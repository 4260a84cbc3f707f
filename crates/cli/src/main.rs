//! Mangaiyar CLI - Database migrations and data management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! mf-cli migrate
//!
//! # Seed the catalog with the demo grocery products
//! mf-cli seed
//!
//! # Fill missing line-item snapshots on historical orders
//! mf-cli backfill-order-images
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "mf-cli")]
#[command(author, version, about = "Mangaiyar Fresh Foods CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the catalog with demo products (incl. weight variants)
    Seed,
    /// Fill missing productTitle/productImage snapshots on stored orders
    BackfillOrderImages,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed => commands::seed::catalog().await?,
        Commands::BackfillOrderImages => commands::backfill::order_images().await?,
    }
    Ok(())
}
