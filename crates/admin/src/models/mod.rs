//! Domain models for the store admin API.
//!
//! Models are the validated shapes handed to route handlers. They serialize
//! to the camelCase JSON the dashboard and storefront consume; the database
//! row types that produce them live next to their repositories in `db`.

pub mod billboard;
pub mod category;
pub mod color;
pub mod dashboard;
pub mod order;
pub mod product;
pub mod size;
pub mod store;

pub use billboard::Billboard;
pub use category::{Category, CategoryWithBillboard};
pub use color::Color;
pub use dashboard::DashboardSummary;
pub use order::{Order, OrderItem, OrderSummary, OrderWithItems};
pub use product::{Image, Product, ProductDetail};
pub use size::Size;
pub use store::Store;
