use serde::{Deserialize, Serialize};

use storefront_core::UserId;

use crate::{Claims, Role};

/// Identity of an authenticated caller, derived from verified claims.
///
/// Request-scoped: the gate attaches it to the request and it is dropped with
/// the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub email: String,
    pub user_id: UserId,
    pub role: Role,
}

impl Identity {
    pub fn new(email: impl Into<String>, user_id: UserId, role: Role) -> Self {
        Self {
            email: email.into(),
            user_id,
            role,
        }
    }
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            email: claims.sub,
            user_id: claims.user_id,
            role: claims.role,
        }
    }
}
