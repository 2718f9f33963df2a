//! Bearer token authentication.
//!
//! Users sign in with an external identity provider, which issues a JWT. The
//! token's `sub` claim is the user id stores are owned by. This module
//! verifies those tokens and checks store ownership.

use axum::{extract::FromRequestParts, http::request::Parts};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use secrecy::ExposeSecret;
use serde::Deserialize;
use sqlx::PgPool;
use thiserror::Error;
use tracing::debug;

use storehub_core::{StoreId, UserId};

use crate::config::{AuthConfig, JwtKey};
use crate::db::StoreRepository;
use crate::error::{AppError, set_sentry_user};
use crate::state::AppState;

/// Token verification errors.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The configured key could not be loaded.
    #[error("Invalid verification key: {0}")]
    Key(String),

    /// The token failed signature, expiry, or issuer checks.
    #[error("Invalid token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),

    /// The token carries no subject.
    #[error("Token has an empty subject")]
    EmptySubject,
}

/// Claims read from identity provider tokens.
#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    /// Subject: the user id.
    pub sub: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issuer, when the provider sets one.
    pub iss: Option<String>,
}

/// Verifies bearer tokens against the configured key.
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("algorithms", &self.validation.algorithms)
            .field("issuer", &self.validation.iss)
            .finish_non_exhaustive()
    }
}

impl TokenVerifier {
    /// Build a verifier from auth configuration.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Key` if the RSA public key is not valid PEM.
    pub fn new(config: &AuthConfig) -> Result<Self, TokenError> {
        let (key, algorithm) = match &config.key {
            JwtKey::RsaPublicPem(pem) => (
                DecodingKey::from_rsa_pem(pem.as_bytes())
                    .map_err(|e| TokenError::Key(e.to_string()))?,
                Algorithm::RS256,
            ),
            JwtKey::HmacSecret(secret) => (
                DecodingKey::from_secret(secret.expose_secret().as_bytes()),
                Algorithm::HS256,
            ),
        };

        let mut validation = Validation::new(algorithm);
        // Provider tokens carry audiences we do not pin.
        validation.validate_aud = false;
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
            validation.set_required_spec_claims(&["exp", "iss"]);
        }

        Ok(Self { key, validation })
    }

    /// Verify a token and return its user id.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Invalid` if the signature, expiry, or issuer
    /// check fails, and `TokenError::EmptySubject` if `sub` is blank.
    pub fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        let claims = decode::<Claims>(token, &self.key, &self.validation)?.claims;

        if claims.sub.trim().is_empty() {
            return Err(TokenError::EmptySubject);
        }

        Ok(UserId::new(claims.sub))
    }
}

/// The authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: UserId,
}

/// Extractor that requires a valid bearer token.
///
/// Rejects with 401 when the `Authorization` header is missing, is not a
/// bearer token, or the token does not verify.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireUser(user): RequireUser) -> impl IntoResponse {
///     format!("Hello, {}!", user.id)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireUser(pub CurrentUser);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Unauthenticated".to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::Unauthorized("Unauthenticated".to_string()))?;

        let user_id = state.token_verifier().verify(token).map_err(|e| {
            debug!(error = %e, "Rejected bearer token");
            AppError::Unauthorized("Unauthenticated".to_string())
        })?;

        set_sentry_user(&user_id);

        Ok(Self(CurrentUser { id: user_id }))
    }
}

/// Require that `user` owns the store.
///
/// A store that does not exist is treated the same as one owned by someone
/// else.
///
/// # Errors
///
/// Returns `AppError::Forbidden` if the user does not own the store, or
/// `AppError::Database` if the lookup fails.
pub async fn ensure_store_owner(
    pool: &PgPool,
    store_id: StoreId,
    user: &CurrentUser,
) -> Result<(), AppError> {
    if StoreRepository::new(pool)
        .is_owned_by(store_id, &user.id)
        .await?
    {
        Ok(())
    } else {
        Err(AppError::Forbidden("Unauthorized".to_string()))
    }
}
