//! Order repository.
//!
//! Orders are created unpaid at checkout and flipped to paid exactly once by
//! the payment webhook. Paying an order archives every product on it, since
//! each product is a single item of stock.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use storehub_core::analytics::PaidOrder;
use storehub_core::{OrderId, OrderItemId, Price, ProductId, StoreId};

use super::RepositoryError;
use crate::models::{Order, OrderItem, OrderWithItems};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    store_id: Uuid,
    is_paid: bool,
    phone: String,
    address: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: OrderId::new(row.id),
            store_id: StoreId::new(row.store_id),
            is_paid: row.is_paid,
            phone: row.phone,
            address: row.address,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: Uuid,
    order_id: Uuid,
    product_id: Uuid,
    product_name: String,
    product_price: Decimal,
}

impl TryFrom<OrderItemRow> for OrderItem {
    type Error = RepositoryError;

    fn try_from(row: OrderItemRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: OrderItemId::new(row.id),
            product_id: ProductId::new(row.product_id),
            product_name: row.product_name,
            product_price: parse_price(row.product_price)?,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PaidItemRow {
    order_id: Uuid,
    created_at: DateTime<Utc>,
    price: Decimal,
}

fn parse_price(amount: Decimal) -> Result<Price, RepositoryError> {
    Price::new(amount)
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid price in database: {e}")))
}

const ORDER_COLUMNS: &str = "id, store_id, is_paid, phone, address, created_at, updated_at";

/// Result of marking an order paid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaidOrderUpdate {
    /// The order after the update.
    pub order: Order,
    /// Number of products archived because they sold on this order.
    pub archived_products: u64,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a store's orders with their items, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    #[instrument(skip(self), fields(store_id = %store_id))]
    pub async fn list(&self, store_id: StoreId) -> Result<Vec<OrderWithItems>, RepositoryError> {
        let orders: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE store_id = $1 ORDER BY created_at DESC"
        ))
        .bind(store_id)
        .fetch_all(self.pool)
        .await?;

        if orders.is_empty() {
            return Ok(Vec::new());
        }

        let order_ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
        let items: Vec<OrderItemRow> = sqlx::query_as(
            r"
            SELECT oi.id, oi.order_id, oi.product_id,
                   p.name AS product_name, p.price AS product_price
            FROM order_items oi
            JOIN products p ON p.id = oi.product_id
            WHERE oi.order_id = ANY($1)
            ORDER BY oi.order_id, oi.position, oi.id
            ",
        )
        .bind(&order_ids)
        .fetch_all(self.pool)
        .await?;

        let mut grouped: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
        for item in items {
            let order_id = item.order_id;
            grouped.entry(order_id).or_default().push(item.try_into()?);
        }

        Ok(orders
            .into_iter()
            .map(|row| {
                let items = grouped.remove(&row.id).unwrap_or_default();
                OrderWithItems {
                    order: row.into(),
                    items,
                }
            })
            .collect())
    }

    /// Create an unpaid order with one item per product id, in one transaction.
    ///
    /// Duplicate ids produce duplicate items. Callers are expected to have
    /// checked that every product belongs to the store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidReference` if a product does not exist.
    #[instrument(skip(self, product_ids), fields(store_id = %store_id, items = product_ids.len()))]
    pub async fn create_unpaid(
        &self,
        store_id: StoreId,
        product_ids: &[ProductId],
    ) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let order: OrderRow = sqlx::query_as(&format!(
            "INSERT INTO orders (store_id, is_paid) VALUES ($1, false) RETURNING {ORDER_COLUMNS}"
        ))
        .bind(store_id)
        .fetch_one(&mut *tx)
        .await?;

        let ids: Vec<Uuid> = product_ids.iter().map(ProductId::as_uuid).collect();
        sqlx::query(
            r"
            INSERT INTO order_items (order_id, product_id, position)
            SELECT $1, product_id, position
            FROM unnest($2::uuid[]) WITH ORDINALITY AS t(product_id, position)
            ",
        )
        .bind(order.id)
        .bind(&ids)
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::from_write(e, "Product does not exist"))?;

        tx.commit().await?;

        debug!(order_id = %order.id, "Created unpaid order");
        Ok(order.into())
    }

    /// Mark an order paid and archive the products on it, in one transaction.
    ///
    /// Only an unpaid order is updated. Returns `None` if the order does not
    /// exist or has already been paid, in which case nothing is changed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    #[instrument(skip(self, address, phone), fields(order_id = %order_id))]
    pub async fn mark_paid(
        &self,
        order_id: OrderId,
        address: &str,
        phone: &str,
    ) -> Result<Option<PaidOrderUpdate>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row: Option<OrderRow> = sqlx::query_as(&format!(
            r"
            UPDATE orders SET is_paid = true, address = $2, phone = $3, updated_at = now()
            WHERE id = $1 AND is_paid = false
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(order_id)
        .bind(address)
        .bind(phone)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let archived = sqlx::query(
            r"
            UPDATE products SET is_archived = true, updated_at = now()
            WHERE id IN (SELECT product_id FROM order_items WHERE order_id = $1)
            ",
        )
        .bind(order_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;

        info!(archived_products = archived, "Order marked paid");
        Ok(Some(PaidOrderUpdate {
            order: row.into(),
            archived_products: archived,
        }))
    }

    /// Paid orders of a store, reduced to what revenue figures need.
    ///
    /// Item prices are the products' current prices.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored price is invalid.
    pub async fn paid_orders(&self, store_id: StoreId) -> Result<Vec<PaidOrder>, RepositoryError> {
        let rows: Vec<PaidItemRow> = sqlx::query_as(
            r"
            SELECT o.id AS order_id, o.created_at, p.price
            FROM orders o
            JOIN order_items oi ON oi.order_id = o.id
            JOIN products p ON p.id = oi.product_id
            WHERE o.store_id = $1 AND o.is_paid
            ORDER BY o.created_at, o.id
            ",
        )
        .bind(store_id)
        .fetch_all(self.pool)
        .await?;

        let mut orders: Vec<PaidOrder> = Vec::new();
        let mut current: Option<Uuid> = None;
        for row in rows {
            let price = parse_price(row.price)?;
            match orders.last_mut() {
                Some(order) if current == Some(row.order_id) => order.item_prices.push(price),
                _ => {
                    current = Some(row.order_id);
                    orders.push(PaidOrder {
                        created_at: row.created_at,
                        item_prices: vec![price],
                    });
                }
            }
        }

        Ok(orders)
    }

    /// Number of paid orders in a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_paid(&self, store_id: StoreId) -> Result<i64, RepositoryError> {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM orders WHERE store_id = $1 AND is_paid")
                .bind(store_id)
                .fetch_one(self.pool)
                .await?;

        Ok(row.0)
    }

    /// Get an order by id, regardless of store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, order_id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row: Option<OrderRow> =
            sqlx::query_as(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
                .bind(order_id)
                .fetch_optional(self.pool)
                .await?;

        Ok(row.map(Into::into))
    }
}
