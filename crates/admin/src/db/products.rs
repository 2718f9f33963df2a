//! Product repository.
//!
//! Products are written together with their image set in one transaction.
//! Reads for the API resolve category, size, color, and images in two
//! queries regardless of how many products are returned.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use tracing::{debug, instrument};
use uuid::Uuid;

use storehub_core::{
    BillboardId, CategoryId, ColorId, HexColor, ImageId, Price, ProductId, SizeId, StoreId,
};

use super::RepositoryError;
use crate::models::{Category, Color, Image, Product, ProductDetail, Size};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    store_id: Uuid,
    category_id: Uuid,
    size_id: Uuid,
    color_id: Uuid,
    name: String,
    price: Decimal,
    is_featured: bool,
    is_archived: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ProductId::new(row.id),
            store_id: StoreId::new(row.store_id),
            category_id: CategoryId::new(row.category_id),
            size_id: SizeId::new(row.size_id),
            color_id: ColorId::new(row.color_id),
            name: row.name,
            price: parse_price(row.price)?,
            is_featured: row.is_featured,
            is_archived: row.is_archived,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProductDetailRow {
    #[sqlx(flatten)]
    product: ProductRow,
    category_billboard_id: Uuid,
    category_name: String,
    category_created_at: DateTime<Utc>,
    category_updated_at: DateTime<Utc>,
    size_name: String,
    size_value: String,
    size_created_at: DateTime<Utc>,
    size_updated_at: DateTime<Utc>,
    color_name: String,
    color_value: String,
    color_created_at: DateTime<Utc>,
    color_updated_at: DateTime<Utc>,
}

impl ProductDetailRow {
    fn into_detail(self, images: Vec<Image>) -> Result<ProductDetail, RepositoryError> {
        let product = Product::try_from(self.product)?;

        let category = Category {
            id: product.category_id,
            store_id: product.store_id,
            billboard_id: BillboardId::new(self.category_billboard_id),
            name: self.category_name,
            created_at: self.category_created_at,
            updated_at: self.category_updated_at,
        };
        let size = Size {
            id: product.size_id,
            store_id: product.store_id,
            name: self.size_name,
            value: self.size_value,
            created_at: self.size_created_at,
            updated_at: self.size_updated_at,
        };
        let color = Color {
            id: product.color_id,
            store_id: product.store_id,
            name: self.color_name,
            value: HexColor::parse(&self.color_value).map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid color value in database: {e}"))
            })?,
            created_at: self.color_created_at,
            updated_at: self.color_updated_at,
        };

        Ok(ProductDetail {
            product,
            images,
            category,
            size,
            color,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ImageRow {
    id: Uuid,
    product_id: Uuid,
    url: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ImageRow> for Image {
    fn from(row: ImageRow) -> Self {
        Self {
            id: ImageId::new(row.id),
            product_id: ProductId::new(row.product_id),
            url: row.url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn parse_price(amount: Decimal) -> Result<Price, RepositoryError> {
    Price::new(amount)
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid price in database: {e}")))
}

const PRODUCT_COLUMNS: &str = "id, store_id, category_id, size_id, color_id, name, price, \
                               is_featured, is_archived, created_at, updated_at";

const SELECT_DETAIL: &str = r"
    SELECT p.id, p.store_id, p.category_id, p.size_id, p.color_id, p.name, p.price,
           p.is_featured, p.is_archived, p.created_at, p.updated_at,
           c.billboard_id AS category_billboard_id,
           c.name AS category_name,
           c.created_at AS category_created_at,
           c.updated_at AS category_updated_at,
           s.name AS size_name,
           s.value AS size_value,
           s.created_at AS size_created_at,
           s.updated_at AS size_updated_at,
           co.name AS color_name,
           co.value AS color_value,
           co.created_at AS color_created_at,
           co.updated_at AS color_updated_at
    FROM products p
    JOIN categories c ON c.id = p.category_id
    JOIN sizes s ON s.id = p.size_id
    JOIN colors co ON co.id = p.color_id
";

const UNKNOWN_REFERENCE: &str = "Category, size, or color does not exist in this store";

// =============================================================================
// Parameters
// =============================================================================

/// Filters for listing products.
///
/// The default lists every product that is still for sale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub category_id: Option<CategoryId>,
    pub color_id: Option<ColorId>,
    pub size_id: Option<SizeId>,
    /// Only products flagged for the storefront home page.
    pub featured_only: bool,
    /// Include archived (sold or hidden) products.
    pub include_archived: bool,
}

/// Fields accepted when creating or updating a product.
#[derive(Debug, Clone)]
pub struct ProductInput {
    pub name: String,
    pub price: Price,
    pub category_id: CategoryId,
    pub size_id: SizeId,
    pub color_id: ColorId,
    /// Replaces the product's whole image set.
    pub image_urls: Vec<String>,
    pub is_featured: bool,
    pub is_archived: bool,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a store's products matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    #[instrument(skip(self), fields(store_id = %store_id))]
    pub async fn list(
        &self,
        store_id: StoreId,
        filter: ProductFilter,
    ) -> Result<Vec<ProductDetail>, RepositoryError> {
        let rows: Vec<ProductDetailRow> = sqlx::query_as(&format!(
            r"
            {SELECT_DETAIL}
            WHERE p.store_id = $1
              AND ($2::uuid IS NULL OR p.category_id = $2)
              AND ($3::uuid IS NULL OR p.color_id = $3)
              AND ($4::uuid IS NULL OR p.size_id = $4)
              AND (NOT $5 OR p.is_featured)
              AND ($6 OR NOT p.is_archived)
            ORDER BY p.created_at DESC
            "
        ))
        .bind(store_id)
        .bind(filter.category_id)
        .bind(filter.color_id)
        .bind(filter.size_id)
        .bind(filter.featured_only)
        .bind(filter.include_archived)
        .fetch_all(self.pool)
        .await?;

        let ids: Vec<Uuid> = rows.iter().map(|row| row.product.id).collect();
        let mut images = self.images_for(&ids).await?;

        let products = rows
            .into_iter()
            .map(|row| {
                let product_images = images.remove(&row.product.id).unwrap_or_default();
                row.into_detail(product_images)
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Get a product of this store with its relations.
    ///
    /// Archived products are returned; the storefront decides what to show.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn get(
        &self,
        store_id: StoreId,
        id: ProductId,
    ) -> Result<Option<ProductDetail>, RepositoryError> {
        let row: Option<ProductDetailRow> = sqlx::query_as(&format!(
            "{SELECT_DETAIL} WHERE p.id = $1 AND p.store_id = $2"
        ))
        .bind(id)
        .bind(store_id)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut images = self.images_for(&[row.product.id]).await?;
        let product_images = images.remove(&row.product.id).unwrap_or_default();
        row.into_detail(product_images).map(Some)
    }

    /// Create a product and its images in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidReference` if the category, size, or
    /// color is not part of this store.
    #[instrument(skip(self, input), fields(store_id = %store_id, images = input.image_urls.len()))]
    pub async fn create(
        &self,
        store_id: StoreId,
        input: &ProductInput,
    ) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row: ProductRow = sqlx::query_as(&format!(
            r"
            INSERT INTO products
                (store_id, category_id, size_id, color_id, name, price, is_featured, is_archived)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(store_id)
        .bind(input.category_id)
        .bind(input.size_id)
        .bind(input.color_id)
        .bind(&input.name)
        .bind(input.price.amount())
        .bind(input.is_featured)
        .bind(input.is_archived)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RepositoryError::from_write(e, UNKNOWN_REFERENCE))?;

        insert_images(&mut *tx, row.id, &input.image_urls).await?;
        tx.commit().await?;

        row.try_into()
    }

    /// Update a product of this store and replace its image set, in one
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store has no such product,
    /// or `RepositoryError::InvalidReference` if the category, size, or color
    /// is not part of this store.
    #[instrument(skip(self, input), fields(store_id = %store_id, product_id = %id))]
    pub async fn update(
        &self,
        store_id: StoreId,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row: Option<ProductRow> = sqlx::query_as(&format!(
            r"
            UPDATE products
            SET name = $3, price = $4, category_id = $5, size_id = $6, color_id = $7,
                is_featured = $8, is_archived = $9, updated_at = now()
            WHERE id = $1 AND store_id = $2
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(id)
        .bind(store_id)
        .bind(&input.name)
        .bind(input.price.amount())
        .bind(input.category_id)
        .bind(input.size_id)
        .bind(input.color_id)
        .bind(input.is_featured)
        .bind(input.is_archived)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| RepositoryError::from_write(e, UNKNOWN_REFERENCE))?;

        let row = row.ok_or(RepositoryError::NotFound)?;

        sqlx::query("DELETE FROM images WHERE product_id = $1")
            .bind(row.id)
            .execute(&mut *tx)
            .await?;
        insert_images(&mut *tx, row.id, &input.image_urls).await?;

        tx.commit().await?;

        row.try_into()
    }

    /// Delete a product of this store. Its images go with it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store has no such product,
    /// or `RepositoryError::Conflict` if the product appears on any order.
    #[instrument(skip(self), fields(store_id = %store_id, product_id = %id))]
    pub async fn delete(&self, store_id: StoreId, id: ProductId) -> Result<Product, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "DELETE FROM products WHERE id = $1 AND store_id = $2 RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .bind(store_id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| {
            RepositoryError::from_delete(
                e,
                "This product is part of existing orders. Archive it instead.",
            )
        })?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }

    /// Count the store's products that are still for sale.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_in_stock(&self, store_id: StoreId) -> Result<i64, RepositoryError> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM products WHERE store_id = $1 AND NOT is_archived",
        )
        .bind(store_id)
        .fetch_one(self.pool)
        .await?;

        Ok(row.0)
    }

    /// Load the purchasable products of this store among `ids`.
    ///
    /// Ids that belong to another store, are archived, or do not exist are
    /// silently absent from the result.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_for_checkout(
        &self,
        store_id: StoreId,
        ids: &[ProductId],
    ) -> Result<Vec<Product>, RepositoryError> {
        let ids: Vec<Uuid> = ids.iter().map(ProductId::as_uuid).collect();

        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            r"
            SELECT {PRODUCT_COLUMNS} FROM products
            WHERE store_id = $1 AND id = ANY($2) AND NOT is_archived
            "
        ))
        .bind(store_id)
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Images of the given products, grouped by product, in submitted order.
    async fn images_for(
        &self,
        product_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<Image>>, RepositoryError> {
        if product_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<ImageRow> = sqlx::query_as(
            r"
            SELECT id, product_id, url, created_at, updated_at
            FROM images
            WHERE product_id = ANY($1)
            ORDER BY product_id, position, id
            ",
        )
        .bind(product_ids)
        .fetch_all(self.pool)
        .await?;

        let mut grouped: HashMap<Uuid, Vec<Image>> = HashMap::new();
        for row in rows {
            grouped.entry(row.product_id).or_default().push(row.into());
        }
        Ok(grouped)
    }
}

async fn insert_images(
    conn: &mut PgConnection,
    product_id: Uuid,
    urls: &[String],
) -> Result<(), RepositoryError> {
    if urls.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r"
        INSERT INTO images (product_id, url, position)
        SELECT $1, url, position FROM unnest($2::text[]) WITH ORDINALITY AS t(url, position)
        ",
    )
    .bind(product_id)
    .bind(urls)
    .execute(conn)
    .await?;

    Ok(())
}
