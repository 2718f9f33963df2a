//! Color repository.
//!
//! Values are validated as hex colors on the way in; a stored value that no
//! longer parses is reported as data corruption rather than served.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use storehub_core::{ColorId, HexColor, StoreId};

use super::RepositoryError;
use crate::models::Color;

#[derive(Debug, sqlx::FromRow)]
struct ColorRow {
    id: Uuid,
    store_id: Uuid,
    name: String,
    value: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ColorRow> for Color {
    type Error = RepositoryError;

    fn try_from(row: ColorRow) -> Result<Self, Self::Error> {
        let value = HexColor::parse(&row.value).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid color value in database: {e}"))
        })?;

        Ok(Self {
            id: ColorId::new(row.id),
            store_id: StoreId::new(row.store_id),
            name: row.name,
            value,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const COLOR_COLUMNS: &str = "id, store_id, name, value, created_at, updated_at";

/// Fields accepted when creating or updating a color.
#[derive(Debug, Clone)]
pub struct ColorInput {
    pub name: String,
    pub value: HexColor,
}

/// Repository for color database operations.
pub struct ColorRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ColorRepository<'a> {
    /// Create a new color repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a store's colors, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored value is invalid.
    pub async fn list(&self, store_id: StoreId) -> Result<Vec<Color>, RepositoryError> {
        let rows: Vec<ColorRow> = sqlx::query_as(&format!(
            "SELECT {COLOR_COLUMNS} FROM colors WHERE store_id = $1 ORDER BY created_at DESC"
        ))
        .bind(store_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get a color of this store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored value is invalid.
    pub async fn get(
        &self,
        store_id: StoreId,
        id: ColorId,
    ) -> Result<Option<Color>, RepositoryError> {
        let row: Option<ColorRow> = sqlx::query_as(&format!(
            "SELECT {COLOR_COLUMNS} FROM colors WHERE id = $1 AND store_id = $2"
        ))
        .bind(id)
        .bind(store_id)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Create a color.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    #[instrument(skip(self, input), fields(store_id = %store_id, value = %input.value))]
    pub async fn create(
        &self,
        store_id: StoreId,
        input: &ColorInput,
    ) -> Result<Color, RepositoryError> {
        let row: ColorRow = sqlx::query_as(&format!(
            "INSERT INTO colors (store_id, name, value) VALUES ($1, $2, $3) RETURNING {COLOR_COLUMNS}"
        ))
        .bind(store_id)
        .bind(&input.name)
        .bind(input.value.as_str())
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Update a color of this store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store has no such color.
    #[instrument(skip(self, input), fields(store_id = %store_id, color_id = %id))]
    pub async fn update(
        &self,
        store_id: StoreId,
        id: ColorId,
        input: &ColorInput,
    ) -> Result<Color, RepositoryError> {
        let row: Option<ColorRow> = sqlx::query_as(&format!(
            r"
            UPDATE colors SET name = $3, value = $4, updated_at = now()
            WHERE id = $1 AND store_id = $2
            RETURNING {COLOR_COLUMNS}
            "
        ))
        .bind(id)
        .bind(store_id)
        .bind(&input.name)
        .bind(input.value.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }

    /// Delete a color of this store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store has no such color, or
    /// `RepositoryError::Conflict` while products still use it.
    #[instrument(skip(self), fields(store_id = %store_id, color_id = %id))]
    pub async fn delete(&self, store_id: StoreId, id: ColorId) -> Result<Color, RepositoryError> {
        let row: Option<ColorRow> = sqlx::query_as(&format!(
            "DELETE FROM colors WHERE id = $1 AND store_id = $2 RETURNING {COLOR_COLUMNS}"
        ))
        .bind(id)
        .bind(store_id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| {
            RepositoryError::from_delete(
                e,
                "Make sure you removed all products using this color first.",
            )
        })?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }
}
