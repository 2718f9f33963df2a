//! Store management commands.
//!
//! Stores are normally created from the dashboard; these commands cover
//! bootstrapping and support work.
//!
//! # Usage
//!
//! ```bash
//! # Create a store for a user (the identity provider's subject id)
//! sh-cli stores create -u user_2abc -n "Summer Shop"
//!
//! # List a user's stores
//! sh-cli stores list -u user_2abc
//!
//! # Show the store the dashboard opens first for a user
//! sh-cli stores default -u user_2abc
//! ```

use sqlx::PgPool;
use thiserror::Error;

use storehub_admin::db::{RepositoryError, StoreRepository, create_pool};
use storehub_admin::models::Store;
use storehub_core::UserId;

use super::{DATABASE_URL_VAR, database_url};

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreCommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Connect(#[from] sqlx::Error),

    /// Repository operation failed.
    #[error("{0}")]
    Repository(#[from] RepositoryError),

    /// Invalid argument.
    #[error("Invalid {0}: must not be blank")]
    Blank(&'static str),
}

async fn connect() -> Result<PgPool, StoreCommandError> {
    let database_url =
        database_url().ok_or(StoreCommandError::MissingEnvVar(DATABASE_URL_VAR))?;

    tracing::info!("Connecting to database...");
    Ok(create_pool(&database_url).await?)
}

fn user_id(user: &str) -> Result<UserId, StoreCommandError> {
    let user = user.trim();
    if user.is_empty() {
        return Err(StoreCommandError::Blank("user"));
    }
    Ok(UserId::new(user.to_owned()))
}

#[allow(clippy::print_stdout)]
fn print_store(store: &Store) {
    println!("{}\t{}\t{}", store.id, store.name, store.created_at.to_rfc3339());
}

/// Create a store owned by `user`.
///
/// # Errors
///
/// Returns an error if an argument is blank or the insert fails.
pub async fn create(user: &str, name: &str) -> Result<Store, StoreCommandError> {
    let user = user_id(user)?;
    let name = name.trim();
    if name.is_empty() {
        return Err(StoreCommandError::Blank("name"));
    }

    let pool = connect().await?;
    let store = StoreRepository::new(&pool).create(&user, name).await?;

    tracing::info!(store_id = %store.id, user = %user, "Store created");
    print_store(&store);
    Ok(store)
}

/// List the stores owned by `user`.
///
/// # Errors
///
/// Returns an error if the user is blank or the query fails.
pub async fn list(user: &str) -> Result<(), StoreCommandError> {
    let user = user_id(user)?;
    let pool = connect().await?;

    let stores = StoreRepository::new(&pool).list_for_user(&user).await?;
    if stores.is_empty() {
        tracing::warn!(user = %user, "User has no stores");
    }
    for store in &stores {
        print_store(store);
    }
    Ok(())
}

/// Show the store the dashboard opens first for `user` (their oldest).
///
/// # Errors
///
/// Returns an error if the user is blank or the query fails.
pub async fn default_store(user: &str) -> Result<(), StoreCommandError> {
    let user = user_id(user)?;
    let pool = connect().await?;

    match StoreRepository::new(&pool).first_for_user(&user).await? {
        Some(store) => print_store(&store),
        None => tracing::warn!(user = %user, "User has no stores"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_trims() {
        assert!(matches!(user_id("  user_1 "), Ok(u) if u.as_str() == "user_1"));
    }

    #[test]
    fn test_user_id_rejects_blank() {
        assert!(matches!(user_id("   "), Err(StoreCommandError::Blank("user"))));
    }
}
