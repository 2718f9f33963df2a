//! Stripe API types used by checkout and the webhook.
//!
//! Only the fields this service reads are modelled; everything else in
//! Stripe's payloads is ignored on deserialization.

use std::collections::HashMap;

use serde::Deserialize;

use storehub_core::OrderId;

/// Event type sent when a hosted checkout has been paid.
pub const CHECKOUT_SESSION_COMPLETED: &str = "checkout.session.completed";

/// A single line on a checkout session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutLineItem {
    /// Product name shown on the payment page.
    pub name: String,
    /// Unit price in cents.
    pub unit_amount: i64,
    pub quantity: u32,
}

/// Parameters for creating a hosted checkout session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCheckoutSession {
    pub line_items: Vec<CheckoutLineItem>,
    /// Stored in the session metadata and echoed back by the webhook.
    pub order_id: OrderId,
    pub success_url: String,
    pub cancel_url: String,
}

impl CreateCheckoutSession {
    /// Encode as Stripe's bracketed form parameters.
    #[must_use]
    pub fn to_form(&self) -> Vec<(String, String)> {
        let mut form = vec![
            ("mode".to_string(), "payment".to_string()),
            (
                "billing_address_collection".to_string(),
                "required".to_string(),
            ),
            (
                "phone_number_collection[enabled]".to_string(),
                "true".to_string(),
            ),
            ("success_url".to_string(), self.success_url.clone()),
            ("cancel_url".to_string(), self.cancel_url.clone()),
            ("metadata[orderId]".to_string(), self.order_id.to_string()),
        ];

        for (i, item) in self.line_items.iter().enumerate() {
            let prefix = format!("line_items[{i}]");
            form.push((format!("{prefix}[quantity]"), item.quantity.to_string()));
            form.push((
                format!("{prefix}[price_data][currency]"),
                "usd".to_string(),
            ));
            form.push((
                format!("{prefix}[price_data][unit_amount]"),
                item.unit_amount.to_string(),
            ));
            form.push((
                format!("{prefix}[price_data][product_data][name]"),
                item.name.clone(),
            ));
        }

        form
    }
}

/// A created checkout session.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    /// Hosted payment page. Absent once the session has expired.
    pub url: Option<String>,
}

/// Error envelope returned by the Stripe API.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub message: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// A webhook event.
#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: EventData,
}

/// Event payload; `object` depends on the event type.
#[derive(Debug, Clone, Deserialize)]
pub struct EventData {
    pub object: serde_json::Value,
}

/// The fields of a completed checkout session the webhook needs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutSessionCompleted {
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    pub customer_details: Option<CustomerDetails>,
}

impl CheckoutSessionCompleted {
    /// The order id placed in the metadata at checkout, if present.
    #[must_use]
    pub fn order_id(&self) -> Option<&str> {
        self.metadata.get("orderId").map(String::as_str)
    }

    /// Customer phone number, or an empty string when not collected.
    #[must_use]
    pub fn phone(&self) -> String {
        self.customer_details
            .as_ref()
            .and_then(|details| details.phone.clone())
            .unwrap_or_default()
    }

    /// Single-line billing address, or an empty string when not collected.
    #[must_use]
    pub fn address(&self) -> String {
        self.customer_details
            .as_ref()
            .and_then(|details| details.address.as_ref())
            .map(Address::single_line)
            .unwrap_or_default()
    }
}

/// Customer details collected on the payment page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerDetails {
    pub phone: Option<String>,
    pub address: Option<Address>,
}

/// A postal address as Stripe reports it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Address {
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

impl Address {
    /// Join the present, non-empty parts with `", "`.
    ///
    /// Order: line 1, line 2, postal code, city, state, country.
    #[must_use]
    pub fn single_line(&self) -> String {
        [
            &self.line1,
            &self.line2,
            &self.postal_code,
            &self.city,
            &self.state,
            &self.country,
        ]
        .into_iter()
        .filter_map(|part| part.as_deref())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_address_skips_missing_and_empty_parts() {
        let address = Address {
            line1: Some("1 Main St".to_string()),
            line2: Some(String::new()),
            postal_code: Some("94105".to_string()),
            city: Some("San Francisco".to_string()),
            state: None,
            country: Some("US".to_string()),
        };
        assert_eq!(address.single_line(), "1 Main St, 94105, San Francisco, US");
    }

    #[test]
    fn test_completed_session_defaults() {
        let session: CheckoutSessionCompleted =
            serde_json::from_value(serde_json::json!({ "id": "cs_test" })).unwrap();
        assert_eq!(session.order_id(), None);
        assert_eq!(session.phone(), "");
        assert_eq!(session.address(), "");
    }

    #[test]
    fn test_completed_session_reads_customer_details() {
        let session: CheckoutSessionCompleted = serde_json::from_value(serde_json::json!({
            "id": "cs_test",
            "metadata": { "orderId": "abc" },
            "customer_details": {
                "phone": "+15555550100",
                "address": {
                    "line1": "1 Main St",
                    "line2": null,
                    "postal_code": "10001",
                    "city": "New York",
                    "state": "NY",
                    "country": "US"
                }
            }
        }))
        .unwrap();

        assert_eq!(session.order_id(), Some("abc"));
        assert_eq!(session.phone(), "+15555550100");
        assert_eq!(session.address(), "1 Main St, 10001, New York, NY, US");
    }

    #[test]
    fn test_checkout_form_encoding() {
        let order_id = OrderId::new(Uuid::nil());
        let request = CreateCheckoutSession {
            line_items: vec![
                CheckoutLineItem {
                    name: "Shirt".to_string(),
                    unit_amount: 1999,
                    quantity: 1,
                },
                CheckoutLineItem {
                    name: "Hat".to_string(),
                    unit_amount: 500,
                    quantity: 1,
                },
            ],
            order_id,
            success_url: "https://shop.test/cart?success=1".to_string(),
            cancel_url: "https://shop.test/cart?canceled=1".to_string(),
        };

        let form: HashMap<String, String> = request.to_form().into_iter().collect();

        assert_eq!(form["mode"], "payment");
        assert_eq!(form["billing_address_collection"], "required");
        assert_eq!(form["phone_number_collection[enabled]"], "true");
        assert_eq!(form["metadata[orderId]"], order_id.to_string());
        assert_eq!(form["line_items[0][price_data][unit_amount]"], "1999");
        assert_eq!(form["line_items[0][price_data][currency]"], "usd");
        assert_eq!(form["line_items[1][price_data][product_data][name]"], "Hat");
        assert_eq!(form["line_items[1][quantity]"], "1");
        assert_eq!(form["success_url"], "https://shop.test/cart?success=1");
    }
}
