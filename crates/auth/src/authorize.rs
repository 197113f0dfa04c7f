//! Per-operation access control, evaluated before the operation runs.
//!
//! Per request the gate moves from "unchecked" to exactly one terminal state:
//! token missing, token invalid, role denied, or authorized. Operations with
//! no declared requirement skip the gate entirely.
//!
//! - No IO
//! - No shared mutable state
//! - No retries (every rejection is final for the presented credential)

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::policy::{AccessPolicy, OperationId, RoleRequirement};
use crate::{Identity, Role, TokenCodec, TokenError, extract_bearer};

/// Terminal rejection states.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GateRejection {
    #[error("no bearer credential presented")]
    TokenMissing,

    #[error("bearer credential rejected: {0}")]
    TokenInvalid(TokenError),

    #[error("role '{role}' is not permitted")]
    RoleDenied { role: Role },
}

impl GateRejection {
    /// `true` for "who are you" failures, `false` for "what may you do".
    pub fn is_unauthenticated(&self) -> bool {
        !matches!(self, GateRejection::RoleDenied { .. })
    }

    /// Stable label for diagnostics.
    pub fn state(&self) -> &'static str {
        match self {
            GateRejection::TokenMissing => "token_missing",
            GateRejection::TokenInvalid(_) => "token_invalid",
            GateRejection::RoleDenied { .. } => "role_denied",
        }
    }
}

/// Outcome of a request that was allowed through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// The operation declares no requirement.
    Open,
    /// Credential verified and role permitted.
    Authorized(Identity),
}

#[derive(Debug, Clone)]
pub struct AuthorizationGate {
    codec: TokenCodec,
    policy: Arc<AccessPolicy>,
}

impl AuthorizationGate {
    pub fn new(codec: TokenCodec, policy: Arc<AccessPolicy>) -> Self {
        Self { codec, policy }
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    /// Run the gate for `operation` given the raw `Authorization` header value.
    pub fn check(
        &self,
        operation: &OperationId,
        authorization: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<GateDecision, GateRejection> {
        match self.policy.requirement_for(operation) {
            None => Ok(GateDecision::Open),
            Some(requirement) => self
                .authorize(requirement, authorization, now)
                .map(GateDecision::Authorized),
        }
    }

    /// Enforce a specific requirement.
    pub fn authorize(
        &self,
        requirement: &RoleRequirement,
        authorization: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Identity, GateRejection> {
        let token = extract_bearer(authorization).ok_or(GateRejection::TokenMissing)?;

        let claims = self
            .codec
            .verify(token, now)
            .map_err(GateRejection::TokenInvalid)?;

        if !requirement.permits(claims.role) {
            return Err(GateRejection::RoleDenied { role: claims.role });
        }

        Ok(Identity::from(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AuthConfig;
    use chrono::TimeZone;
    use storefront_core::UserId;

    const SECRET: &str = "gate-test-secret-0123456789abcdefghij";

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn gate() -> (AuthorizationGate, TokenCodec) {
        let codec = TokenCodec::new(Arc::new(AuthConfig::new(SECRET, 600).unwrap()));
        let policy = AccessPolicy::new()
            .require("GET", "/api/users", [Role::Admin])
            .require("GET", "/api/orders/user", [Role::User]);
        (AuthorizationGate::new(codec.clone(), Arc::new(policy)), codec)
    }

    fn bearer(token: &str) -> String {
        format!("Bearer {token}")
    }

    #[test]
    fn undeclared_operation_is_open_even_without_token() {
        let (gate, _) = gate();
        let op = OperationId::new("DELETE", "/api/orders/:id");
        assert_eq!(gate.check(&op, None, at(0)), Ok(GateDecision::Open));
        assert_eq!(gate.check(&op, Some("Bearer junk"), at(0)), Ok(GateDecision::Open));
    }

    #[test]
    fn missing_or_foreign_scheme_is_token_missing() {
        let (gate, _) = gate();
        let op = OperationId::new("GET", "/api/users");
        assert_eq!(gate.check(&op, None, at(0)), Err(GateRejection::TokenMissing));
        assert_eq!(gate.check(&op, Some("bearer x"), at(0)), Err(GateRejection::TokenMissing));
    }

    #[test]
    fn invalid_or_expired_token_is_token_invalid() {
        let (gate, codec) = gate();
        let op = OperationId::new("GET", "/api/users");

        let err = gate.check(&op, Some("Bearer not.a.token"), at(0)).unwrap_err();
        assert_eq!(err, GateRejection::TokenInvalid(TokenError::Malformed));
        assert!(err.is_unauthenticated());

        let token = codec.issue("root@shop.io", UserId::new(1), Role::Admin, at(1_000)).unwrap();
        let err = gate.check(&op, Some(&bearer(&token)), at(1_600)).unwrap_err();
        assert_eq!(err, GateRejection::TokenInvalid(TokenError::Expired));
    }

    #[test]
    fn user_on_admin_operation_is_role_denied() {
        let (gate, codec) = gate();
        let op = OperationId::new("GET", "/api/users");
        let token = codec.issue("u@shop.io", UserId::new(2), Role::User, at(1_000)).unwrap();

        let err = gate.check(&op, Some(&bearer(&token)), at(1_001)).unwrap_err();
        assert_eq!(err, GateRejection::RoleDenied { role: Role::User });
        assert!(!err.is_unauthenticated());
        assert_eq!(err.state(), "role_denied");
    }

    #[test]
    fn admin_does_not_satisfy_user_only_requirement() {
        let (gate, codec) = gate();
        let op = OperationId::new("GET", "/api/orders/user");
        let token = codec.issue("root@shop.io", UserId::new(1), Role::Admin, at(1_000)).unwrap();

        assert_eq!(
            gate.check(&op, Some(&bearer(&token)), at(1_001)),
            Err(GateRejection::RoleDenied { role: Role::Admin })
        );
    }

    #[test]
    fn admin_on_admin_operation_is_authorized_with_identity() {
        let (gate, codec) = gate();
        let op = OperationId::new("GET", "/api/users");
        let token = codec.issue("root@shop.io", UserId::new(41), Role::Admin, at(1_000)).unwrap();

        let decision = gate.check(&op, Some(&bearer(&token)), at(1_001)).unwrap();
        assert_eq!(
            decision,
            GateDecision::Authorized(Identity::new("root@shop.io", UserId::new(41), Role::Admin))
        );
    }
}
