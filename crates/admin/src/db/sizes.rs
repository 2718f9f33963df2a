//! Size repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use storehub_core::{SizeId, StoreId};

use super::RepositoryError;
use crate::models::Size;

#[derive(Debug, sqlx::FromRow)]
struct SizeRow {
    id: Uuid,
    store_id: Uuid,
    name: String,
    value: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SizeRow> for Size {
    fn from(row: SizeRow) -> Self {
        Self {
            id: SizeId::new(row.id),
            store_id: StoreId::new(row.store_id),
            name: row.name,
            value: row.value,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SIZE_COLUMNS: &str = "id, store_id, name, value, created_at, updated_at";

/// Fields accepted when creating or updating a size.
#[derive(Debug, Clone)]
pub struct SizeInput {
    pub name: String,
    pub value: String,
}

/// Repository for size database operations.
pub struct SizeRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SizeRepository<'a> {
    /// Create a new size repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a store's sizes, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, store_id: StoreId) -> Result<Vec<Size>, RepositoryError> {
        let rows: Vec<SizeRow> = sqlx::query_as(&format!(
            "SELECT {SIZE_COLUMNS} FROM sizes WHERE store_id = $1 ORDER BY created_at DESC"
        ))
        .bind(store_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a size of this store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, store_id: StoreId, id: SizeId) -> Result<Option<Size>, RepositoryError> {
        let row: Option<SizeRow> = sqlx::query_as(&format!(
            "SELECT {SIZE_COLUMNS} FROM sizes WHERE id = $1 AND store_id = $2"
        ))
        .bind(id)
        .bind(store_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create a size.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    #[instrument(skip(self, input), fields(store_id = %store_id))]
    pub async fn create(&self, store_id: StoreId, input: &SizeInput) -> Result<Size, RepositoryError> {
        let row: SizeRow = sqlx::query_as(&format!(
            "INSERT INTO sizes (store_id, name, value) VALUES ($1, $2, $3) RETURNING {SIZE_COLUMNS}"
        ))
        .bind(store_id)
        .bind(&input.name)
        .bind(&input.value)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Update a size of this store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store has no such size.
    #[instrument(skip(self, input), fields(store_id = %store_id, size_id = %id))]
    pub async fn update(
        &self,
        store_id: StoreId,
        id: SizeId,
        input: &SizeInput,
    ) -> Result<Size, RepositoryError> {
        let row: Option<SizeRow> = sqlx::query_as(&format!(
            r"
            UPDATE sizes SET name = $3, value = $4, updated_at = now()
            WHERE id = $1 AND store_id = $2
            RETURNING {SIZE_COLUMNS}
            "
        ))
        .bind(id)
        .bind(store_id)
        .bind(&input.name)
        .bind(&input.value)
        .fetch_optional(self.pool)
        .await?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// Delete a size of this store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store has no such size, or
    /// `RepositoryError::Conflict` while products still use it.
    #[instrument(skip(self), fields(store_id = %store_id, size_id = %id))]
    pub async fn delete(&self, store_id: StoreId, id: SizeId) -> Result<Size, RepositoryError> {
        let row: Option<SizeRow> = sqlx::query_as(&format!(
            "DELETE FROM sizes WHERE id = $1 AND store_id = $2 RETURNING {SIZE_COLUMNS}"
        ))
        .bind(id)
        .bind(store_id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| {
            RepositoryError::from_delete(e, "Make sure you removed all products using this size first.")
        })?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }
}
