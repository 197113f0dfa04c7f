use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use storefront_core::UserId;

use crate::Role;

/// Session token claims, exactly as they appear on the wire.
///
/// Timestamps are whole seconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the account e-mail.
    pub sub: String,

    #[serde(rename = "userId")]
    pub user_id: UserId,

    pub role: Role,

    /// Issued-at timestamp.
    pub iat: i64,

    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Build claims for a token issued at `now` and living for `ttl`.
    pub fn new(
        subject: impl Into<String>,
        user_id: UserId,
        role: Role,
        now: DateTime<Utc>,
        ttl: chrono::Duration,
    ) -> Self {
        let iat = now.timestamp();
        Self {
            sub: subject.into(),
            user_id,
            role,
            iat,
            exp: iat.saturating_add(ttl.num_seconds()),
        }
    }

    /// A token is live strictly before `exp`; the boundary second is expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}

/// Why a presented token was not accepted.
///
/// `Malformed` and `BadSignature` must never be distinguishable to a client;
/// the transport layer collapses them into one response.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is not a well-formed signed token")]
    Malformed,

    #[error("token signature does not match")]
    BadSignature,

    #[error("token has expired")]
    Expired,

    /// Signing failed while minting. Not reachable with a valid key.
    #[error("token could not be encoded: {0}")]
    Encoding(String),
}

/// Deterministically check the time window of already-verified claims.
pub fn validate_claims(claims: &Claims, now: DateTime<Utc>) -> Result<(), TokenError> {
    if claims.is_expired_at(now) {
        return Err(TokenError::Expired);
    }
    Ok(())
}
