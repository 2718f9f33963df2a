//! Stripe integration for hosted checkout.
//!
//! This module provides:
//! - [`StripeClient`] for creating hosted checkout sessions
//! - Webhook signature verification for the `Stripe-Signature` header
//! - The subset of Stripe's event and session types the webhook reads
//!
//! # Flow
//!
//! 1. The storefront posts product ids to the checkout route
//! 2. An unpaid order is created and a checkout session is opened for it,
//!    carrying the order id in its metadata
//! 3. The customer pays on Stripe's hosted page
//! 4. Stripe calls the webhook with `checkout.session.completed`
//! 5. The webhook verifies the signature and marks the order paid

mod client;
mod error;
mod types;

pub use client::{StripeClient, WEBHOOK_TOLERANCE_SECS};
pub use error::StripeError;
pub use types::{
    Address, CHECKOUT_SESSION_COMPLETED, CheckoutLineItem, CheckoutSession,
    CheckoutSessionCompleted, CreateCheckoutSession, CustomerDetails, Event, EventData,
};
