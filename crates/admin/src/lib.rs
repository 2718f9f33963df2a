//! Storehub Admin library.
//!
//! The multi-tenant store administration API: stores and their catalogs
//! (billboards, categories, sizes, colors, products), orders, revenue
//! figures, and Stripe checkout. Exposed as a library so the binary, the CLI,
//! and the integration tests share one implementation.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod stripe;

pub use app::build_app;
