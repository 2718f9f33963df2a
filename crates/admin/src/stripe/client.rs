//! Stripe API client.
//!
//! Creates hosted checkout sessions and verifies webhook signatures.

use hmac::{Hmac, Mac};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use tracing::{debug, error, instrument};

use super::error::StripeError;
use super::types::{ApiErrorResponse, CheckoutSession, CreateCheckoutSession, Event};

/// Stripe API base URL.
const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

/// Maximum age of a signed webhook, in seconds.
pub const WEBHOOK_TOLERANCE_SECS: i64 = 300;

/// Stripe API client for checkout and webhooks.
#[derive(Clone)]
pub struct StripeClient {
    /// HTTP client.
    client: Client,
    /// Base URL for API calls.
    api_base: String,
    /// Secret API key.
    secret_key: SecretString,
    /// Endpoint secret for verifying webhooks.
    webhook_secret: SecretString,
}

impl std::fmt::Debug for StripeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeClient")
            .field("api_base", &self.api_base)
            .field("secret_key", &"[REDACTED]")
            .field("webhook_secret", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl StripeClient {
    /// Create a new Stripe client.
    #[must_use]
    pub fn new(secret_key: SecretString, webhook_secret: SecretString) -> Self {
        Self {
            client: Client::new(),
            api_base: STRIPE_API_BASE.to_string(),
            secret_key,
            webhook_secret,
        }
    }

    /// Point API calls at another base URL, such as a local mock.
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Create a hosted checkout session.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or Stripe returns an error.
    #[instrument(skip(self, request), fields(order_id = %request.order_id, items = request.line_items.len()))]
    pub async fn create_checkout_session(
        &self,
        request: &CreateCheckoutSession,
    ) -> Result<CheckoutSession, StripeError> {
        let response = self
            .client
            .post(format!("{}/checkout/sessions", self.api_base))
            .bearer_auth(self.secret_key.expose_secret())
            .form(&request.to_form())
            .send()
            .await
            .map_err(|e| StripeError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ApiErrorResponse>()
                .await
                .ok()
                .and_then(|body| body.error.message.or(body.error.kind))
                .unwrap_or_else(|| format!("HTTP {status}"));
            error!(status = %status, error = %message, "Stripe API error creating checkout session");
            return Err(StripeError::Api(message));
        }

        let session: CheckoutSession = response
            .json()
            .await
            .map_err(|e| StripeError::Response(e.to_string()))?;

        debug!(session_id = %session.id, "Checkout session created");

        Ok(session)
    }

    /// Verify a webhook against its `Stripe-Signature` header and parse it.
    ///
    /// # Errors
    ///
    /// Returns `StripeError::InvalidSignature` if the header is malformed,
    /// too old, or does not match, and `StripeError::InvalidPayload` if the
    /// body is not an event.
    pub fn verify_webhook(&self, payload: &str, signature: &str) -> Result<Event, StripeError> {
        self.verify_webhook_at(payload, signature, chrono::Utc::now().timestamp())
    }

    /// Verify a webhook as of `now` (unix seconds).
    ///
    /// # Errors
    ///
    /// Same as [`StripeClient::verify_webhook`].
    pub fn verify_webhook_at(
        &self,
        payload: &str,
        signature: &str,
        now: i64,
    ) -> Result<Event, StripeError> {
        let header = SignatureHeader::parse(signature)?;

        // Only age is bounded; a timestamp ahead of `now` is clock skew.
        let too_old = now
            .checked_sub(header.timestamp)
            .is_none_or(|age| age > WEBHOOK_TOLERANCE_SECS);
        if too_old {
            return Err(StripeError::InvalidSignature(
                "Timestamp outside the tolerance zone".to_string(),
            ));
        }

        let expected = self.sign(header.timestamp, payload)?;
        if !header
            .signatures
            .iter()
            .any(|candidate| constant_time_compare(&expected, candidate))
        {
            return Err(StripeError::InvalidSignature(
                "No signatures found matching the expected signature for payload".to_string(),
            ));
        }

        let event: Event =
            serde_json::from_str(payload).map_err(|e| StripeError::InvalidPayload(e.to_string()))?;

        debug!(event_id = %event.id, event_type = %event.event_type, "Stripe signature verified");

        Ok(event)
    }

    /// Hex HMAC-SHA256 of `"{timestamp}.{payload}"` under the webhook secret.
    fn sign(&self, timestamp: i64, payload: &str) -> Result<String, StripeError> {
        let mut mac =
            Hmac::<Sha256>::new_from_slice(self.webhook_secret.expose_secret().as_bytes())
                .map_err(|e| StripeError::InvalidSignature(e.to_string()))?;

        mac.update(format!("{timestamp}.{payload}").as_bytes());

        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

/// Parsed `Stripe-Signature` header: `t=<unix>,v1=<hex>[,v1=<hex>...]`.
#[derive(Debug)]
struct SignatureHeader<'a> {
    timestamp: i64,
    signatures: Vec<&'a str>,
}

impl<'a> SignatureHeader<'a> {
    fn parse(header: &'a str) -> Result<Self, StripeError> {
        let mut timestamp = None;
        let mut signatures = Vec::new();

        for part in header.split(',') {
            match part.trim().split_once('=') {
                Some(("t", value)) => {
                    timestamp = Some(value.parse::<i64>().map_err(|_| {
                        StripeError::InvalidSignature("Invalid timestamp".to_string())
                    })?);
                }
                Some(("v1", value)) => signatures.push(value),
                _ => {}
            }
        }

        let timestamp = timestamp.ok_or_else(|| {
            StripeError::InvalidSignature("Unable to extract timestamp from header".to_string())
        })?;

        if signatures.is_empty() {
            return Err(StripeError::InvalidSignature(
                "No v1 signatures found in header".to_string(),
            ));
        }

        Ok(Self {
            timestamp,
            signatures,
        })
    }
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }

    result == 0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test_4f9a2c1e8b7d";
    const NOW: i64 = 1_717_200_000;

    fn client() -> StripeClient {
        StripeClient::new(
            SecretString::from("sk_test_123"),
            SecretString::from(SECRET),
        )
    }

    fn payload() -> String {
        serde_json::json!({
            "id": "evt_1",
            "type": "checkout.session.completed",
            "data": { "object": { "id": "cs_1", "metadata": { "orderId": "x" } } }
        })
        .to_string()
    }

    fn header_for(timestamp: i64, payload: &str) -> String {
        let signature = client().sign(timestamp, payload).unwrap();
        format!("t={timestamp},v1={signature}")
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("abc", "abc"));
        assert!(!constant_time_compare("abc", "abd"));
        assert!(!constant_time_compare("abc", "abcd"));
        assert!(constant_time_compare("", ""));
    }

    #[test]
    fn test_verify_webhook_accepts_valid_signature() {
        let body = payload();
        let event = client()
            .verify_webhook_at(&body, &header_for(NOW, &body), NOW + 10)
            .unwrap();

        assert_eq!(event.id, "evt_1");
        assert_eq!(event.event_type, "checkout.session.completed");
        assert_eq!(event.data.object["metadata"]["orderId"], "x");
    }

    #[test]
    fn test_verify_webhook_accepts_any_matching_v1() {
        let body = payload();
        let signature = client().sign(NOW, &body).unwrap();
        let header = format!("t={NOW},v1=deadbeef,v0=ignored,v1={signature}");

        assert!(client().verify_webhook_at(&body, &header, NOW).is_ok());
    }

    #[test]
    fn test_verify_webhook_rejects_tampered_body() {
        let body = payload();
        let header = header_for(NOW, &body);
        let tampered = body.replace("evt_1", "evt_2");

        let err = client().verify_webhook_at(&tampered, &header, NOW).unwrap_err();
        assert!(matches!(err, StripeError::InvalidSignature(_)));
    }

    #[test]
    fn test_verify_webhook_rejects_stale_timestamp() {
        let body = payload();
        let header = header_for(NOW, &body);

        let err = client()
            .verify_webhook_at(&body, &header, NOW + WEBHOOK_TOLERANCE_SECS + 1)
            .unwrap_err();
        assert!(matches!(err, StripeError::InvalidSignature(_)));
    }

    #[test]
    fn test_verify_webhook_rejects_wrong_secret() {
        let body = payload();
        let other = StripeClient::new(
            SecretString::from("sk_test_123"),
            SecretString::from("whsec_other"),
        );
        let header = format!("t={NOW},v1={}", other.sign(NOW, &body).unwrap());

        assert!(client().verify_webhook_at(&body, &header, NOW).is_err());
    }

    #[test]
    fn test_verify_webhook_rejects_malformed_header() {
        let body = payload();
        let unsigned = format!("t={NOW}");
        for header in [
            "",
            "v1=abc",
            "t=notanumber,v1=abc",
            "t=-9223372036854775808,v1=00",
            unsigned.as_str(),
        ] {
            let err = client().verify_webhook_at(&body, header, NOW).unwrap_err();
            assert!(
                matches!(err, StripeError::InvalidSignature(_)),
                "header {header:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_verify_webhook_accepts_timestamp_ahead_of_clock() {
        let body = payload();
        let header = header_for(NOW + 30, &body);

        assert!(client().verify_webhook_at(&body, &header, NOW).is_ok());
    }

    #[test]
    fn test_verify_webhook_rejects_timestamp_that_overflows_age() {
        let body = payload();
        let header = header_for(i64::MIN, &body);

        let err = client().verify_webhook_at(&body, &header, NOW).unwrap_err();
        assert!(matches!(err, StripeError::InvalidSignature(_)));
    }

    #[test]
    fn test_verify_webhook_rejects_non_event_payload() {
        let body = "{\"hello\":\"world\"}";
        let err = client()
            .verify_webhook_at(body, &header_for(NOW, body), NOW)
            .unwrap_err();
        assert!(matches!(err, StripeError::InvalidPayload(_)));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let debug_output = format!("{:?}", client());
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("sk_test_123"));
        assert!(!debug_output.contains(SECRET));
    }
}
