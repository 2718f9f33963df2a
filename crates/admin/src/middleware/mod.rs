//! HTTP middleware and extractors for admin.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. Request ID (propagate or generate `x-request-id`)
//!
//! Authentication is an extractor ([`auth::RequireUser`]) rather than a
//! layer, because most catalog reads are public.

pub mod auth;
pub mod request_id;

pub use auth::{CurrentUser, RequireUser, TokenError, TokenVerifier, ensure_store_owner};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
