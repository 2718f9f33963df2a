//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREHUB_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `FRONTEND_STORE_URL` - Public storefront URL, used for checkout redirects
//! - `STRIPE_SECRET_KEY` - Stripe secret API key
//! - `STRIPE_WEBHOOK_SECRET` - Stripe webhook endpoint secret (whsec_...)
//! - `AUTH_JWT_PUBLIC_KEY` or `AUTH_JWT_SECRET` - Identity provider token key
//!   (PEM public key for RS256, or shared secret for HS256)
//!
//! ## Optional
//! - `STOREHUB_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREHUB_PORT` - Listen port (default: 3000)
//! - `AUTH_JWT_ISSUER` - Expected `iss` claim
//! - `CORS_ALLOWED_ORIGINS` - Comma-separated origins for checkout (default: `*`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT`, `SENTRY_SAMPLE_RATE`, `SENTRY_TRACES_SAMPLE_RATE`
//! - `STOREHUB_LOG_JSON` - Emit logs as JSON when set
//!
//! ## Optional (TLS)
//! - `STOREHUB_TLS_CERT` - PEM-encoded certificate chain
//! - `STOREHUB_TLS_KEY` - PEM-encoded private key

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_JWT_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public storefront URL, without a trailing slash
    pub frontend_store_url: String,
    /// Stripe API configuration
    pub stripe: StripeConfig,
    /// Bearer token verification
    pub auth: AuthConfig,
    /// Origins allowed to call the checkout route
    pub cors_origins: CorsOrigins,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
    /// TLS configuration for HTTPS (optional)
    pub tls: Option<TlsConfig>,
    /// Emit JSON logs instead of text
    pub log_json: bool,
}

/// Stripe API configuration.
///
/// Implements `Debug` manually to redact both secrets.
#[derive(Clone)]
pub struct StripeConfig {
    /// Secret API key (sk_...)
    pub secret_key: SecretString,
    /// Webhook endpoint secret (whsec_...)
    pub webhook_secret: SecretString,
}

impl std::fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeConfig")
            .field("secret_key", &"[REDACTED]")
            .field("webhook_secret", &"[REDACTED]")
            .finish()
    }
}

impl StripeConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            secret_key: get_validated_secret("STRIPE_SECRET_KEY")?,
            webhook_secret: get_validated_secret("STRIPE_WEBHOOK_SECRET")?,
        })
    }
}

/// Key used to verify identity provider tokens.
#[derive(Clone)]
pub enum JwtKey {
    /// PEM-encoded RSA public key (RS256).
    RsaPublicPem(String),
    /// Shared secret (HS256).
    HmacSecret(SecretString),
}

impl std::fmt::Debug for JwtKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RsaPublicPem(_) => f.write_str("RsaPublicPem([PUBLIC KEY])"),
            Self::HmacSecret(_) => f.write_str("HmacSecret([REDACTED])"),
        }
    }
}

/// Bearer token verification settings.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub key: JwtKey,
    /// Required `iss` claim, if any.
    pub issuer: Option<String>,
}

impl AuthConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let public_key = get_optional_env("AUTH_JWT_PUBLIC_KEY");
        let secret = get_optional_env("AUTH_JWT_SECRET");

        let key = match (public_key, secret) {
            (Some(pem), None) => JwtKey::RsaPublicPem(pem),
            (None, Some(secret)) => {
                let secret = SecretString::from(secret);
                validate_jwt_secret(&secret, "AUTH_JWT_SECRET")?;
                validate_secret_strength(secret.expose_secret(), "AUTH_JWT_SECRET")?;
                JwtKey::HmacSecret(secret)
            }
            (Some(_), Some(_)) => {
                return Err(ConfigError::InvalidEnvVar(
                    "AUTH_JWT_*".to_string(),
                    "Set only one of AUTH_JWT_PUBLIC_KEY and AUTH_JWT_SECRET".to_string(),
                ));
            }
            (None, None) => {
                return Err(ConfigError::MissingEnvVar(
                    "AUTH_JWT_PUBLIC_KEY or AUTH_JWT_SECRET".to_string(),
                ));
            }
        };

        Ok(Self {
            key,
            issuer: get_optional_env("AUTH_JWT_ISSUER"),
        })
    }
}

/// Origins allowed by the checkout CORS policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    Any,
    List(Vec<String>),
}

impl CorsOrigins {
    /// Parse a comma-separated origin list; `*` allows any origin.
    fn parse(raw: &str) -> Self {
        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
            Self::Any
        } else {
            Self::List(origins)
        }
    }
}

/// TLS configuration for HTTPS.
#[derive(Clone)]
pub struct TlsConfig {
    /// PEM-encoded certificate chain
    pub cert_pem: String,
    /// PEM-encoded private key
    pub key_pem: SecretString,
}

impl std::fmt::Debug for TlsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsConfig")
            .field("cert_pem", &"[CERTIFICATE]")
            .field("key_pem", &"[REDACTED]")
            .finish()
    }
}

impl TlsConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let cert_pem = get_optional_env("STOREHUB_TLS_CERT");
        let key_pem = get_optional_env("STOREHUB_TLS_KEY");

        match (cert_pem, key_pem) {
            (Some(cert), Some(key)) => Ok(Some(Self {
                cert_pem: cert,
                key_pem: SecretString::from(key),
            })),
            (None, None) => Ok(None),
            _ => Err(ConfigError::InvalidEnvVar(
                "STOREHUB_TLS_*".to_string(),
                "Both STOREHUB_TLS_CERT and STOREHUB_TLS_KEY must be set together".to_string(),
            )),
        }
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("STOREHUB_DATABASE_URL")?;
        let host = get_env_or_default("STOREHUB_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("STOREHUB_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("STOREHUB_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("STOREHUB_PORT".to_string(), e.to_string()))?;
        let frontend_store_url = get_required_env("FRONTEND_STORE_URL")?
            .trim_end_matches('/')
            .to_string();

        let stripe = StripeConfig::from_env()?;
        let auth = AuthConfig::from_env()?;
        let cors_origins = CorsOrigins::parse(&get_env_or_default("CORS_ALLOWED_ORIGINS", "*"));
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let tls = TlsConfig::from_env()?;
        let log_json = get_optional_env("STOREHUB_LOG_JSON").is_some();

        Ok(Self {
            database_url,
            host,
            port,
            frontend_store_url,
            stripe,
            auth,
            cors_origins,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
            tls,
            log_json,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Where Stripe sends the customer after paying.
    #[must_use]
    pub fn checkout_success_url(&self) -> String {
        format!("{}/cart?success=1", self.frontend_store_url)
    }

    /// Where Stripe sends the customer after abandoning checkout.
    #[must_use]
    pub fn checkout_cancel_url(&self) -> String {
        format!("{}/cart?canceled=1", self.frontend_store_url)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL` (used by Fly.io postgres attach).
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that an HS256 secret meets minimum length requirements.
fn validate_jwt_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_JWT_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_JWT_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_config() -> AdminConfig {
        AdminConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            frontend_store_url: "https://shop.example.com".to_string(),
            stripe: StripeConfig {
                secret_key: SecretString::from("sk_test_super_secret_key"),
                webhook_secret: SecretString::from("whsec_super_secret_hook"),
            },
            auth: AuthConfig {
                key: JwtKey::HmacSecret(SecretString::from("jwt_super_secret_value")),
                issuer: None,
            },
            cors_origins: CorsOrigins::Any,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
            tls: None,
            log_json: false,
        }
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_single_char() {
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        // "ab" has entropy of 1 bit per char (50% a, 50% b)
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-stripe-key-here", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_changeme() {
        assert!(validate_secret_strength("changeme123", "TEST_VAR").is_err());
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_stripe_shaped_keys() {
        assert!(validate_secret_strength("sk_test_51Hx9QmK2nL5pQ7rT0uW4zC6", "TEST_VAR").is_ok());
        assert!(validate_secret_strength("whsec_aB3xY9mK2nL5pQ7rT0uW4zC6", "TEST_VAR").is_ok());
    }

    #[test]
    fn test_validate_jwt_secret_too_short() {
        let secret = SecretString::from("short");
        assert!(validate_jwt_secret(&secret, "TEST_JWT").is_err());
    }

    #[test]
    fn test_validate_jwt_secret_valid_length() {
        let secret = SecretString::from("a".repeat(32));
        assert!(validate_jwt_secret(&secret, "TEST_JWT").is_ok());
    }

    #[test]
    fn test_cors_origins_parse() {
        assert_eq!(CorsOrigins::parse("*"), CorsOrigins::Any);
        assert_eq!(CorsOrigins::parse(""), CorsOrigins::Any);
        assert_eq!(
            CorsOrigins::parse("https://a.test, https://b.test,"),
            CorsOrigins::List(vec![
                "https://a.test".to_string(),
                "https://b.test".to_string()
            ])
        );
        assert_eq!(CorsOrigins::parse("https://a.test,*"), CorsOrigins::Any);
    }

    #[test]
    fn test_socket_addr() {
        let addr = sample_config().socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_checkout_redirect_urls() {
        let config = sample_config();
        assert_eq!(
            config.checkout_success_url(),
            "https://shop.example.com/cart?success=1"
        );
        assert_eq!(
            config.checkout_cancel_url(),
            "https://shop.example.com/cart?canceled=1"
        );
    }

    #[test]
    fn test_config_debug_redacts_secrets() {
        let debug_output = format!("{:?}", sample_config());

        assert!(debug_output.contains("shop.example.com"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("sk_test_super_secret_key"));
        assert!(!debug_output.contains("whsec_super_secret_hook"));
        assert!(!debug_output.contains("jwt_super_secret_value"));
    }
}
