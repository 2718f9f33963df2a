//! Database operations for the store admin `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `stores` - Tenants, one owner each
//! - `billboards`, `categories`, `sizes`, `colors` - Catalog metadata
//! - `products`, `images` - Products and their image URLs
//! - `orders`, `order_items` - Checkout orders
//!
//! Every catalog table carries `store_id`. References between catalog rows are
//! composite `(id, store_id)` foreign keys, so a row can only point at rows of
//! its own store. Deleting a referenced row is refused by the database and
//! surfaces as [`RepositoryError::Conflict`].
//!
//! # Migrations
//!
//! Migrations are stored in `crates/admin/migrations/` and run via:
//! ```bash
//! cargo run -p storehub-cli -- migrate
//! ```

pub mod billboards;
pub mod categories;
pub mod colors;
pub mod orders;
pub mod products;
pub mod sizes;
pub mod stores;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use billboards::{BillboardInput, BillboardRepository};
pub use categories::{CategoryInput, CategoryRepository};
pub use colors::{ColorInput, ColorRepository};
pub use orders::{OrderRepository, PaidOrderUpdate};
pub use products::{ProductFilter, ProductInput, ProductRepository};
pub use sizes::{SizeInput, SizeRepository};
pub use stores::StoreRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// The row is still referenced and cannot be removed.
    #[error("{0}")]
    Conflict(String),

    /// A referenced row does not exist in this store.
    #[error("{0}")]
    InvalidReference(String),
}

impl RepositoryError {
    /// Classify an error from an insert or update.
    ///
    /// Foreign key violations mean the payload pointed at a row that does not
    /// exist in this store.
    pub(crate) fn from_write(err: sqlx::Error, message: &str) -> Self {
        if is_foreign_key_violation(&err) {
            Self::InvalidReference(message.to_string())
        } else {
            Self::Database(err)
        }
    }

    /// Classify an error from a delete.
    ///
    /// Foreign key violations mean other rows still reference the target.
    pub(crate) fn from_delete(err: sqlx::Error, message: &str) -> Self {
        if is_foreign_key_violation(&err) {
            Self::Conflict(message.to_string())
        } else {
            Self::Database(err)
        }
    }
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_foreign_key_violation)
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_pass_through() {
        let err = RepositoryError::from_delete(sqlx::Error::RowNotFound, "in use");
        assert!(matches!(err, RepositoryError::Database(sqlx::Error::RowNotFound)));

        let err = RepositoryError::from_write(sqlx::Error::PoolTimedOut, "bad ref");
        assert!(matches!(err, RepositoryError::Database(sqlx::Error::PoolTimedOut)));
    }

    #[test]
    fn test_conflict_displays_message_only() {
        let err = RepositoryError::Conflict(
            "Make sure you removed all categories using this billboard first.".to_string(),
        );
        assert_eq!(
            err.to_string(),
            "Make sure you removed all categories using this billboard first."
        );
    }
}
