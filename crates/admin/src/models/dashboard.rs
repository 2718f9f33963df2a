//! Dashboard overview figures.

use serde::Serialize;

use storehub_core::Price;
use storehub_core::analytics::MonthRevenue;

/// Headline numbers for a store's overview page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Revenue across all paid orders.
    pub total_revenue: Price,
    /// Number of paid orders.
    pub sales_count: i64,
    /// Number of products still for sale.
    pub stock_count: i64,
    /// Revenue per calendar month, January first.
    pub graph_revenue: [MonthRevenue; 12],
}
