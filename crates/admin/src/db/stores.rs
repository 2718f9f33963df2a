//! Store repository.
//!
//! Every lookup here is scoped by the owning user, so a store belonging to
//! someone else is indistinguishable from a store that does not exist.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use storehub_core::{StoreId, UserId};

use super::RepositoryError;
use crate::models::Store;

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct StoreRow {
    id: Uuid,
    name: String,
    user_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<StoreRow> for Store {
    fn from(row: StoreRow) -> Self {
        Self {
            id: StoreId::new(row.id),
            name: row.name,
            user_id: UserId::new(row.user_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const STORE_COLUMNS: &str = "id, name, user_id, created_at, updated_at";

// =============================================================================
// Repository
// =============================================================================

/// Repository for store database operations.
pub struct StoreRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StoreRepository<'a> {
    /// Create a new store repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a store owned by `user`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    #[instrument(skip(self), fields(user = %user))]
    pub async fn create(&self, user: &UserId, name: &str) -> Result<Store, RepositoryError> {
        let row: StoreRow = sqlx::query_as(&format!(
            "INSERT INTO stores (name, user_id) VALUES ($1, $2) RETURNING {STORE_COLUMNS}"
        ))
        .bind(name)
        .bind(user)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// List the stores owned by `user`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user: &UserId) -> Result<Vec<Store>, RepositoryError> {
        let rows: Vec<StoreRow> = sqlx::query_as(&format!(
            "SELECT {STORE_COLUMNS} FROM stores WHERE user_id = $1 ORDER BY created_at, id"
        ))
        .bind(user)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a store if it exists and is owned by `user`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_for_user(
        &self,
        id: StoreId,
        user: &UserId,
    ) -> Result<Option<Store>, RepositoryError> {
        let row: Option<StoreRow> = sqlx::query_as(&format!(
            "SELECT {STORE_COLUMNS} FROM stores WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Get the user's oldest store, used to pick a landing store after sign-in.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn first_for_user(&self, user: &UserId) -> Result<Option<Store>, RepositoryError> {
        let row: Option<StoreRow> = sqlx::query_as(&format!(
            "SELECT {STORE_COLUMNS} FROM stores WHERE user_id = $1 ORDER BY created_at, id LIMIT 1"
        ))
        .bind(user)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Check whether `user` owns the store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn is_owned_by(&self, id: StoreId, user: &UserId) -> Result<bool, RepositoryError> {
        let row: (bool,) = sqlx::query_as(
            r"
            SELECT EXISTS(
                SELECT 1 FROM stores WHERE id = $1 AND user_id = $2
            )
            ",
        )
        .bind(id)
        .bind(user)
        .fetch_one(self.pool)
        .await?;

        Ok(row.0)
    }

    /// Rename a store owned by `user`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such store is owned by `user`.
    #[instrument(skip(self), fields(store_id = %id, user = %user))]
    pub async fn rename(
        &self,
        id: StoreId,
        user: &UserId,
        name: &str,
    ) -> Result<Store, RepositoryError> {
        let row: Option<StoreRow> = sqlx::query_as(&format!(
            r"
            UPDATE stores SET name = $3, updated_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING {STORE_COLUMNS}
            "
        ))
        .bind(id)
        .bind(user)
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// Delete a store owned by `user`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such store is owned by `user`,
    /// or `RepositoryError::Conflict` while catalog rows or orders remain.
    #[instrument(skip(self), fields(store_id = %id, user = %user))]
    pub async fn delete(&self, id: StoreId, user: &UserId) -> Result<Store, RepositoryError> {
        let row: Option<StoreRow> = sqlx::query_as(&format!(
            "DELETE FROM stores WHERE id = $1 AND user_id = $2 RETURNING {STORE_COLUMNS}"
        ))
        .bind(id)
        .bind(user)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| {
            RepositoryError::from_delete(
                e,
                "Make sure you removed all products and categories first.",
            )
        })?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }
}
