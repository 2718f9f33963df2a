//! Category repository.
//!
//! Categories are always read together with their billboard, which the
//! storefront renders as the category page header.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use storehub_core::{BillboardId, CategoryId, StoreId};

use super::RepositoryError;
use crate::models::{Billboard, Category, CategoryWithBillboard};

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: Uuid,
    store_id: Uuid,
    billboard_id: Uuid,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: CategoryId::new(row.id),
            store_id: StoreId::new(row.store_id),
            billboard_id: BillboardId::new(row.billboard_id),
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CategoryWithBillboardRow {
    id: Uuid,
    store_id: Uuid,
    billboard_id: Uuid,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    billboard_label: String,
    billboard_image_url: String,
    billboard_created_at: DateTime<Utc>,
    billboard_updated_at: DateTime<Utc>,
}

impl From<CategoryWithBillboardRow> for CategoryWithBillboard {
    fn from(row: CategoryWithBillboardRow) -> Self {
        let billboard = Billboard {
            id: BillboardId::new(row.billboard_id),
            store_id: StoreId::new(row.store_id),
            label: row.billboard_label,
            image_url: row.billboard_image_url,
            created_at: row.billboard_created_at,
            updated_at: row.billboard_updated_at,
        };

        Self {
            category: Category {
                id: CategoryId::new(row.id),
                store_id: StoreId::new(row.store_id),
                billboard_id: BillboardId::new(row.billboard_id),
                name: row.name,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            billboard,
        }
    }
}

const CATEGORY_COLUMNS: &str = "id, store_id, billboard_id, name, created_at, updated_at";

const SELECT_WITH_BILLBOARD: &str = r"
    SELECT c.id, c.store_id, c.billboard_id, c.name, c.created_at, c.updated_at,
           b.label AS billboard_label,
           b.image_url AS billboard_image_url,
           b.created_at AS billboard_created_at,
           b.updated_at AS billboard_updated_at
    FROM categories c
    JOIN billboards b ON b.id = c.billboard_id AND b.store_id = c.store_id
";

const UNKNOWN_BILLBOARD: &str = "Billboard does not exist in this store";

/// Fields accepted when creating or updating a category.
#[derive(Debug, Clone)]
pub struct CategoryInput {
    pub name: String,
    pub billboard_id: BillboardId,
}

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a store's categories with their billboards, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        store_id: StoreId,
    ) -> Result<Vec<CategoryWithBillboard>, RepositoryError> {
        let rows: Vec<CategoryWithBillboardRow> = sqlx::query_as(&format!(
            "{SELECT_WITH_BILLBOARD} WHERE c.store_id = $1 ORDER BY c.created_at DESC"
        ))
        .bind(store_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a category of this store with its billboard.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        store_id: StoreId,
        id: CategoryId,
    ) -> Result<Option<CategoryWithBillboard>, RepositoryError> {
        let row: Option<CategoryWithBillboardRow> = sqlx::query_as(&format!(
            "{SELECT_WITH_BILLBOARD} WHERE c.id = $1 AND c.store_id = $2"
        ))
        .bind(id)
        .bind(store_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidReference` if the billboard is not
    /// part of this store.
    #[instrument(skip(self, input), fields(store_id = %store_id))]
    pub async fn create(
        &self,
        store_id: StoreId,
        input: &CategoryInput,
    ) -> Result<Category, RepositoryError> {
        let row: CategoryRow = sqlx::query_as(&format!(
            r"
            INSERT INTO categories (store_id, billboard_id, name)
            VALUES ($1, $2, $3)
            RETURNING {CATEGORY_COLUMNS}
            "
        ))
        .bind(store_id)
        .bind(input.billboard_id)
        .bind(&input.name)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, UNKNOWN_BILLBOARD))?;

        Ok(row.into())
    }

    /// Update a category of this store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store has no such category,
    /// or `RepositoryError::InvalidReference` if the billboard is not part of
    /// this store.
    #[instrument(skip(self, input), fields(store_id = %store_id, category_id = %id))]
    pub async fn update(
        &self,
        store_id: StoreId,
        id: CategoryId,
        input: &CategoryInput,
    ) -> Result<Category, RepositoryError> {
        let row: Option<CategoryRow> = sqlx::query_as(&format!(
            r"
            UPDATE categories SET name = $3, billboard_id = $4, updated_at = now()
            WHERE id = $1 AND store_id = $2
            RETURNING {CATEGORY_COLUMNS}
            "
        ))
        .bind(id)
        .bind(store_id)
        .bind(&input.name)
        .bind(input.billboard_id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, UNKNOWN_BILLBOARD))?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// Delete a category of this store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store has no such category,
    /// or `RepositoryError::Conflict` while products still use it.
    #[instrument(skip(self), fields(store_id = %store_id, category_id = %id))]
    pub async fn delete(
        &self,
        store_id: StoreId,
        id: CategoryId,
    ) -> Result<Category, RepositoryError> {
        let row: Option<CategoryRow> = sqlx::query_as(&format!(
            "DELETE FROM categories WHERE id = $1 AND store_id = $2 RETURNING {CATEGORY_COLUMNS}"
        ))
        .bind(id)
        .bind(store_id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| {
            RepositoryError::from_delete(
                e,
                "Make sure you removed all products using this category first.",
            )
        })?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }
}
