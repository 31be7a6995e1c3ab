//! Bearer token handling and the auth provider seam.

use async_trait::async_trait;
use axum::http::{HeaderMap, header::AUTHORIZATION};

use crate::{error::ApiError, models::UserIdentity};

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthError {
    /// The provider refused the token.
    #[error("token rejected by auth provider (status {0})")]
    Rejected(u16),

    #[error("auth provider unreachable: {0}")]
    Transport(String),

    #[error("unexpected auth provider response: {0}")]
    Decode(String),
}

/// Exchanges a bearer token for the identity it was issued to.
#[async_trait]
pub trait AuthVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<UserIdentity, AuthError>;
}

/// Strips a leading `Bearer ` if present; anything else is returned as-is.
pub fn strip_bearer_prefix(header: &str) -> &str {
    header.strip_prefix(BEARER_PREFIX).unwrap_or(header)
}

/// Pulls the token out of the `Authorization` header.
///
/// An absent or empty header is [`ApiError::MissingAuthHeader`]; a value that
/// is not valid header text can never verify and is [`ApiError::InvalidToken`].
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let value = headers
        .get(AUTHORIZATION)
        .filter(|value| !value.is_empty())
        .ok_or(ApiError::MissingAuthHeader)?;

    let header = value.to_str().map_err(|_| ApiError::InvalidToken)?;
    Ok(strip_bearer_prefix(header))
}
