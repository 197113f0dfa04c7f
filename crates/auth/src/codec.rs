//! Signed session token encoding and verification (HS256 JWS compact form).
//!
//! This is the only module that touches signing keys.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, Header, Validation};

use storefront_core::UserId;

use crate::claims::validate_claims;
use crate::{AuthConfig, Claims, Role, TokenError};

/// Issues and verifies session tokens against the process signing key.
///
/// Cheap to clone; all clones share the same immutable [`AuthConfig`].
#[derive(Debug, Clone)]
pub struct TokenCodec {
    config: Arc<AuthConfig>,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the caller's clock in `verify`, with no leeway.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self { config, validation }
    }

    /// Sign a fresh token for `subject` valid from `now` for the configured TTL.
    ///
    /// Identical inputs at the same second produce the identical string.
    pub fn issue(
        &self,
        subject: &str,
        user_id: UserId,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims::new(subject, user_id, role, now, self.config.token_ttl());
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            self.config.signing_key().encoding_key(),
        )
        .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Verify the signature, then decode the claims, then check expiry.
    ///
    /// No claim value is looked at before the signature has been checked.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(
            token,
            self.config.signing_key().decoding_key(),
            &self.validation,
        )
        .map_err(|e| {
            let err = classify(e.kind());
            tracing::debug!(reason = %err, "token verification failed");
            err
        })?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

fn classify(kind: &JwtErrorKind) -> TokenError {
    match kind {
        JwtErrorKind::InvalidSignature => TokenError::BadSignature,
        JwtErrorKind::ExpiredSignature => TokenError::Expired,
        // Structure, encoding, algorithm mismatch, unknown role, missing claims.
        _ => TokenError::Malformed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    const SECRET: &str = "storefront-test-secret-0123456789abcdef";
    const TTL: i64 = 3_600;
    const B64URL: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

    fn codec_with(secret: &str) -> TokenCodec {
        TokenCodec::new(Arc::new(AuthConfig::new(secret, TTL).unwrap()))
    }

    fn codec() -> TokenCodec {
        codec_with(SECRET)
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn issue_then_verify_returns_inputs() {
        let codec = codec();
        let now = at(1_700_000_000);
        let token = codec.issue("alice@shop.io", UserId::new(7), Role::Admin, now).unwrap();

        let claims = codec.verify(&token, now).unwrap();
        assert_eq!(claims.sub, "alice@shop.io");
        assert_eq!(claims.user_id, UserId::new(7));
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.iat, 1_700_000_000);
        assert_eq!(claims.exp, 1_700_000_000 + TTL);
    }

    #[test]
    fn token_has_three_segments_and_is_deterministic() {
        let codec = codec();
        let now = at(1_700_000_000);
        let a = codec.issue("a@shop.io", UserId::new(1), Role::User, now).unwrap();
        let b = codec.issue("a@shop.io", UserId::new(1), Role::User, now).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.split('.').count(), 3);
    }

    #[test]
    fn expiry_boundary() {
        let codec = codec();
        let issued = at(1_000_000);
        let token = codec.issue("a@shop.io", UserId::new(1), Role::User, issued).unwrap();
        let exp = 1_000_000 + TTL;

        assert!(codec.verify(&token, at(exp - 1)).is_ok());
        assert_eq!(codec.verify(&token, at(exp)), Err(TokenError::Expired));
        assert_eq!(codec.verify(&token, at(exp + 1)), Err(TokenError::Expired));
    }

    #[test]
    fn wrong_key_is_bad_signature() {
        let now = at(1_000_000);
        let token = codec_with("another-secret-that-is-long-enough-000")
            .issue("a@shop.io", UserId::new(1), Role::Admin, now)
            .unwrap();
        assert_eq!(codec().verify(&token, now), Err(TokenError::BadSignature));
    }

    #[test]
    fn tampered_claims_are_bad_signature() {
        let codec = codec();
        let now = at(1_000_000);
        let token = codec.issue("a@shop.io", UserId::new(1), Role::User, now).unwrap();
        let parts: Vec<&str> = token.split('.').collect();

        // Re-encode the payload with an escalated role, keep the original signature.
        let forged_claims = Claims {
            role: Role::Admin,
            ..codec.verify(&token, now).unwrap()
        };
        let forged_payload = {
            use jsonwebtoken::EncodingKey;
            let other = jsonwebtoken::encode(
                &Header::new(Algorithm::HS256),
                &forged_claims,
                &EncodingKey::from_secret(b"irrelevant"),
            )
            .unwrap();
            other.split('.').nth(1).unwrap().to_string()
        };
        let forged = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

        assert_eq!(codec.verify(&forged, now), Err(TokenError::BadSignature));
    }

    #[test]
    fn expired_forgery_reports_signature_not_expiry() {
        // Signature precedes claim interpretation: an expired token signed with
        // the wrong key is a signature failure.
        let issued = at(1_000);
        let token = codec_with("another-secret-that-is-long-enough-000")
            .issue("a@shop.io", UserId::new(1), Role::User, issued)
            .unwrap();
        assert_eq!(codec().verify(&token, at(1_000_000)), Err(TokenError::BadSignature));
    }

    #[test]
    fn structural_garbage_is_malformed() {
        let codec = codec();
        let now = at(1_000_000);
        for garbage in ["", "abc", "a.b", "a.b.c", "....", "not a token at all"] {
            assert_eq!(codec.verify(garbage, now), Err(TokenError::Malformed), "{garbage:?}");
        }
    }

    #[test]
    fn foreign_algorithm_is_malformed() {
        use jsonwebtoken::EncodingKey;
        let now = at(1_000_000);
        let claims = Claims::new("a@shop.io", UserId::new(1), Role::Admin, now, chrono::Duration::hours(1));
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert_eq!(codec().verify(&token, now), Err(TokenError::Malformed));
    }

    #[test]
    fn unknown_role_is_malformed_even_when_signed() {
        use jsonwebtoken::EncodingKey;
        let now = at(1_000_000);
        let claims = serde_json::json!({
            "sub": "a@shop.io", "userId": 1, "role": "ROOT", "iat": 1_000_000, "exp": 1_000_000 + TTL
        });
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert_eq!(codec().verify(&token, now), Err(TokenError::Malformed));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Property: verify(issue(x, now), now) yields x.
        #[test]
        fn round_trip_preserves_claims(
            local in "[a-z][a-z0-9.]{0,15}",
            domain in "[a-z]{1,10}\\.[a-z]{2,4}",
            user_id in any::<i64>(),
            admin in any::<bool>(),
            now_secs in 0i64..4_000_000_000i64,
        ) {
            let codec = codec();
            let email = format!("{local}@{domain}");
            let role = if admin { Role::Admin } else { Role::User };
            let now = at(now_secs);

            let token = codec.issue(&email, UserId::new(user_id), role, now).unwrap();
            let claims = codec.verify(&token, now).unwrap();

            prop_assert_eq!(claims.sub, email);
            prop_assert_eq!(claims.user_id, UserId::new(user_id));
            prop_assert_eq!(claims.role, role);
            prop_assert_eq!(claims.iat, now_secs);
        }

        /// Property: changing any one character of the signature segment is a
        /// signature failure.
        #[test]
        fn single_char_signature_flip_is_rejected(
            user_id in 1i64..1_000_000,
            position in any::<prop::sample::Index>(),
            replacement in any::<prop::sample::Index>(),
        ) {
            let codec = codec();
            let now = at(1_700_000_000);
            let token = codec.issue("p@shop.io", UserId::new(user_id), Role::User, now).unwrap();

            let sig_start = token.rfind('.').unwrap() + 1;
            let mut bytes = token.clone().into_bytes();
            let idx = sig_start + position.index(bytes.len() - sig_start);

            let original = bytes[idx];
            let candidates: Vec<u8> = B64URL.iter().copied().filter(|c| *c != original).collect();
            bytes[idx] = *replacement.get(&candidates);
            let tampered = String::from_utf8(bytes).unwrap();

            prop_assert_eq!(codec.verify(&tampered, now), Err(TokenError::BadSignature));
        }
    }
}
