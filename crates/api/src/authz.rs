//! Role requirements for every protected operation.
//!
//! This is the one place where an endpoint is declared protected. Routes are
//! identified by method and route template exactly as registered on the
//! router; anything not listed here is open.

use storefront_auth::{AccessPolicy, Role};

pub fn access_policy() -> AccessPolicy {
    AccessPolicy::new()
        // Account administration.
        .require("GET", "/api/users", [Role::Admin])
        .require("POST", "/api/users", [Role::Admin])
        .require("GET", "/api/users/:id", [Role::Admin])
        .require("PUT", "/api/users/:id", [Role::Admin])
        .require("DELETE", "/api/users/:id", [Role::Admin])
        // Policy introspection.
        .require("GET", "/api/admin/access-policy", [Role::Admin])
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_auth::OperationId;

    #[test]
    fn user_administration_is_admin_only() {
        let policy = access_policy();
        for (method, route) in [
            ("GET", "/api/users"),
            ("POST", "/api/users"),
            ("GET", "/api/users/:id"),
            ("PUT", "/api/users/:id"),
            ("DELETE", "/api/users/:id"),
        ] {
            let req = policy
                .requirement_for(&OperationId::new(method, route))
                .unwrap_or_else(|| panic!("{method} {route} must be protected"));
            assert!(req.permits(Role::Admin));
            assert!(!req.permits(Role::User));
        }
    }

    #[test]
    fn session_endpoints_are_open() {
        let policy = access_policy();
        for (method, route) in [
            ("POST", "/api/auth/login"),
            ("POST", "/api/auth/register"),
            ("POST", "/api/auth/ping"),
            ("GET", "/api/auth/user"),
            ("GET", "/api/status"),
        ] {
            assert!(policy.requirement_for(&OperationId::new(method, route)).is_none());
        }
    }
}
