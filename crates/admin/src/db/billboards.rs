//! Billboard repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use storehub_core::{BillboardId, StoreId};

use super::RepositoryError;
use crate::models::Billboard;

#[derive(Debug, sqlx::FromRow)]
struct BillboardRow {
    id: Uuid,
    store_id: Uuid,
    label: String,
    image_url: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<BillboardRow> for Billboard {
    fn from(row: BillboardRow) -> Self {
        Self {
            id: BillboardId::new(row.id),
            store_id: StoreId::new(row.store_id),
            label: row.label,
            image_url: row.image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const BILLBOARD_COLUMNS: &str = "id, store_id, label, image_url, created_at, updated_at";

/// Fields accepted when creating or updating a billboard.
#[derive(Debug, Clone)]
pub struct BillboardInput {
    pub label: String,
    pub image_url: String,
}

/// Repository for billboard database operations.
pub struct BillboardRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BillboardRepository<'a> {
    /// Create a new billboard repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a store's billboards, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, store_id: StoreId) -> Result<Vec<Billboard>, RepositoryError> {
        let rows: Vec<BillboardRow> = sqlx::query_as(&format!(
            "SELECT {BILLBOARD_COLUMNS} FROM billboards WHERE store_id = $1 ORDER BY created_at DESC"
        ))
        .bind(store_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a billboard of this store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        store_id: StoreId,
        id: BillboardId,
    ) -> Result<Option<Billboard>, RepositoryError> {
        let row: Option<BillboardRow> = sqlx::query_as(&format!(
            "SELECT {BILLBOARD_COLUMNS} FROM billboards WHERE id = $1 AND store_id = $2"
        ))
        .bind(id)
        .bind(store_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create a billboard.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    #[instrument(skip(self, input), fields(store_id = %store_id))]
    pub async fn create(
        &self,
        store_id: StoreId,
        input: &BillboardInput,
    ) -> Result<Billboard, RepositoryError> {
        let row: BillboardRow = sqlx::query_as(&format!(
            r"
            INSERT INTO billboards (store_id, label, image_url)
            VALUES ($1, $2, $3)
            RETURNING {BILLBOARD_COLUMNS}
            "
        ))
        .bind(store_id)
        .bind(&input.label)
        .bind(&input.image_url)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Update a billboard of this store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store has no such billboard.
    #[instrument(skip(self, input), fields(store_id = %store_id, billboard_id = %id))]
    pub async fn update(
        &self,
        store_id: StoreId,
        id: BillboardId,
        input: &BillboardInput,
    ) -> Result<Billboard, RepositoryError> {
        let row: Option<BillboardRow> = sqlx::query_as(&format!(
            r"
            UPDATE billboards SET label = $3, image_url = $4, updated_at = now()
            WHERE id = $1 AND store_id = $2
            RETURNING {BILLBOARD_COLUMNS}
            "
        ))
        .bind(id)
        .bind(store_id)
        .bind(&input.label)
        .bind(&input.image_url)
        .fetch_optional(self.pool)
        .await?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// Delete a billboard of this store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store has no such billboard,
    /// or `RepositoryError::Conflict` while categories still use it.
    #[instrument(skip(self), fields(store_id = %store_id, billboard_id = %id))]
    pub async fn delete(
        &self,
        store_id: StoreId,
        id: BillboardId,
    ) -> Result<Billboard, RepositoryError> {
        let row: Option<BillboardRow> = sqlx::query_as(&format!(
            "DELETE FROM billboards WHERE id = $1 AND store_id = $2 RETURNING {BILLBOARD_COLUMNS}"
        ))
        .bind(id)
        .bind(store_id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| {
            RepositoryError::from_delete(
                e,
                "Make sure you removed all categories using this billboard first.",
            )
        })?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }
}
