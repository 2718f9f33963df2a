//! Core types for Storehub.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod color;
pub mod id;
pub mod price;

pub use color::{ColorError, HexColor};
pub use id::*;
pub use price::{Price, PriceError};
