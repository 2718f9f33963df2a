//! Order domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use storehub_core::{OrderId, OrderItemId, Price, ProductId, StoreId};

use crate::format::long_date;

/// An order placed through checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub store_id: StoreId,
    /// Flipped exactly once by the payment webhook.
    pub is_paid: bool,
    /// Empty until the order is paid.
    pub phone: String,
    /// Empty until the order is paid.
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One line on an order, with the product's current name and price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: OrderItemId,
    pub product_id: ProductId,
    pub product_name: String,
    pub product_price: Price,
}

/// An order with its items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

impl OrderWithItems {
    /// Sum of the current prices of every item on the order.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(|item| item.product_price).sum()
    }
}

/// A row of the orders table as shown in the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: OrderId,
    pub phone: String,
    pub address: String,
    pub is_paid: bool,
    /// Product names joined with `", "`.
    pub products: String,
    /// Formatted total, e.g. `$1,234.00`.
    pub total_price: String,
    /// Formatted creation date, e.g. `January 1st, 2024`.
    pub created_at: String,
}

impl From<&OrderWithItems> for OrderSummary {
    fn from(value: &OrderWithItems) -> Self {
        let products = value
            .items
            .iter()
            .map(|item| item.product_name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            id: value.order.id,
            phone: value.order.phone.clone(),
            address: value.order.address.clone(),
            is_paid: value.order.is_paid,
            products,
            total_price: value.total().display(),
            created_at: long_date(value.order.created_at),
        }
    }
}
