//! Process-wide signing configuration.
//!
//! Built once at startup and shared read-only (behind `Arc`) by every codec.
//! Nothing in here is ever mutated after construction.

use chrono::Duration;
use jsonwebtoken::{DecodingKey, EncodingKey};
use thiserror::Error;

/// Minimum secret length for HMAC-SHA256 (256 bits).
pub const MIN_SECRET_BYTES: usize = 32;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("signing secret is empty")]
    EmptySecret,

    #[error("signing secret is {len} bytes; at least {MIN_SECRET_BYTES} are required")]
    WeakSecret { len: usize },

    #[error("token lifetime must be positive and in range, got {0} seconds")]
    InvalidTtl(i64),
}

/// Symmetric key material for token signing and verification.
///
/// `Debug` never prints the secret.
#[derive(Clone)]
pub struct SigningKey {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKey {
    pub fn from_secret(secret: &[u8]) -> Result<Self, ConfigError> {
        if secret.is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        if secret.len() < MIN_SECRET_BYTES {
            return Err(ConfigError::WeakSecret { len: secret.len() });
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        })
    }

    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.encoding
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.decoding
    }
}

impl core::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("SigningKey(<redacted>)")
    }
}

/// Immutable authentication configuration: the signing key plus token lifetime.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    signing_key: SigningKey,
    token_ttl: Duration,
}

impl AuthConfig {
    pub fn new(secret: impl AsRef<[u8]>, ttl_seconds: i64) -> Result<Self, ConfigError> {
        let token_ttl = Duration::try_seconds(ttl_seconds)
            .filter(|_| ttl_seconds > 0)
            .ok_or(ConfigError::InvalidTtl(ttl_seconds))?;

        Ok(Self {
            signing_key: SigningKey::from_secret(secret.as_ref())?,
            token_ttl,
        })
    }

    pub fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }
}
