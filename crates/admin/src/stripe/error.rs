//! Stripe-related errors.

use thiserror::Error;

/// Errors that can occur when interacting with Stripe.
#[derive(Debug, Error)]
pub enum StripeError {
    /// HTTP request failed.
    #[error("Stripe request failed: {0}")]
    Request(String),

    /// Failed to parse response.
    #[error("Stripe response error: {0}")]
    Response(String),

    /// Stripe API returned an error.
    #[error("Stripe API error: {0}")]
    Api(String),

    /// Invalid webhook signature.
    #[error("Invalid Stripe signature: {0}")]
    InvalidSignature(String),

    /// Failed to parse webhook payload.
    #[error("Invalid webhook payload: {0}")]
    InvalidPayload(String),
}
