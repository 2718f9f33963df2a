//! Revenue aggregation over paid orders.
//!
//! Orders are loaded by the admin crate; everything here is a pure fold so the
//! dashboard numbers can be tested without a database.

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

use crate::types::Price;

/// Short month labels in calendar order.
pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A paid order reduced to the fields revenue depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaidOrder {
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
    /// Current price of each product on the order, one entry per item.
    pub item_prices: Vec<Price>,
}

impl PaidOrder {
    /// Sum of this order's item prices.
    #[must_use]
    pub fn total(&self) -> Price {
        self.item_prices.iter().sum()
    }
}

/// Revenue for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthRevenue {
    /// Short month label (`Jan`..`Dec`).
    pub name: &'static str,
    /// Revenue booked in that month.
    pub total: Price,
}

/// Total revenue across all orders.
#[must_use]
pub fn total_revenue(orders: &[PaidOrder]) -> Price {
    orders.iter().map(PaidOrder::total).sum()
}

/// Revenue bucketed by calendar month (UTC), January first.
///
/// Months with no orders are present with a zero total. Orders from
/// different years land in the same bucket.
#[must_use]
pub fn monthly_revenue(orders: &[PaidOrder]) -> [MonthRevenue; 12] {
    let mut totals = [Price::ZERO; 12];
    for order in orders {
        if let Some(bucket) = totals.get_mut(order.created_at.month0() as usize) {
            *bucket = *bucket + order.total();
        }
    }

    std::array::from_fn(|month| MonthRevenue {
        name: MONTH_NAMES[month],
        total: totals[month],
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    fn price(s: &str) -> Price {
        Price::new(s.parse::<Decimal>().unwrap()).unwrap()
    }

    fn order(year: i32, month: u32, day: u32, prices: &[&str]) -> PaidOrder {
        PaidOrder {
            created_at: Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap(),
            item_prices: prices.iter().map(|p| price(p)).collect(),
        }
    }

    fn fixture() -> Vec<PaidOrder> {
        vec![
            order(2024, 1, 3, &["10.00", "5.50"]),
            order(2024, 1, 28, &["4.50"]),
            order(2024, 3, 15, &["100.00"]),
            order(2023, 12, 31, &["19.99", "0.01"]),
            order(2024, 7, 4, &[]),
        ]
    }

    #[test]
    fn test_total_revenue_matches_known_total() {
        assert_eq!(total_revenue(&fixture()), price("140.00"));
    }

    #[test]
    fn test_monthly_buckets() {
        let months = monthly_revenue(&fixture());

        assert_eq!(months[0].name, "Jan");
        assert_eq!(months[0].total, price("20.00"));
        assert_eq!(months[2].name, "Mar");
        assert_eq!(months[2].total, price("100.00"));
        assert_eq!(months[11].name, "Dec");
        assert_eq!(months[11].total, price("20.00"));
        assert_eq!(months[6].total, Price::ZERO);
    }

    #[test]
    fn test_empty_months_default_to_zero() {
        let months = monthly_revenue(&[]);
        assert_eq!(months.len(), 12);
        assert!(months.iter().all(|m| m.total == Price::ZERO));
        let names: Vec<_> = months.iter().map(|m| m.name).collect();
        assert_eq!(names, MONTH_NAMES);
    }

    #[test]
    fn test_buckets_sum_to_total() {
        let orders = fixture();
        let bucketed: Price = monthly_revenue(&orders).iter().map(|m| m.total).sum();
        assert_eq!(bucketed, total_revenue(&orders));
    }

    #[test]
    fn test_month_boundary_uses_utc() {
        let late_night = PaidOrder {
            created_at: Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap(),
            item_prices: vec![price("1.00")],
        };
        let months = monthly_revenue(&[late_night]);
        assert_eq!(months[1].total, price("1.00"));
        assert_eq!(months[2].total, Price::ZERO);
    }
}
