//! Storehub Core - Shared types library.
//!
//! This crate provides common types used across all Storehub components:
//! - `admin` - Multi-tenant store administration API
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, and colors
//! - [`analytics`] - Revenue aggregation for the store dashboard

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod analytics;
pub mod types;

pub use types::*;
