//! Mangaiyar Core - Shared types library.
//!
//! This crate provides common types used across the Mangaiyar Fresh Foods
//! components:
//! - `api` - Storefront and back-office JSON API
//! - `cli` - Command-line tools for migrations and data management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, statuses, and
//!   money formatting

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
