//! Static role requirements per operation.
//!
//! Each protected operation is declared once at startup. The gate looks the
//! operation up on every request; anything not declared is open.

use std::collections::{BTreeSet, HashMap};

use crate::Role;

/// Closed set of roles allowed to invoke an operation.
///
/// Membership is exact: there is no hierarchy between roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRequirement {
    roles: BTreeSet<Role>,
}

impl RoleRequirement {
    pub fn any_of(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            roles: roles.into_iter().collect(),
        }
    }

    pub fn only(role: Role) -> Self {
        Self::any_of([role])
    }

    pub fn permits(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.roles.iter().copied()
    }
}

/// Identifies an operation by HTTP method and route template
/// (e.g. `GET /api/users/:id`), not by concrete request path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperationId {
    method: String,
    route: String,
}

impl OperationId {
    pub fn new(method: impl AsRef<str>, route: impl Into<String>) -> Self {
        Self {
            method: method.as_ref().to_ascii_uppercase(),
            route: route.into(),
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn route(&self) -> &str {
        &self.route
    }
}

impl core::fmt::Display for OperationId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} {}", self.method, self.route)
    }
}

/// Registry of operation → role requirement, frozen after startup.
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    requirements: HashMap<OperationId, RoleRequirement>,
}

impl AccessPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the roles an operation requires. A later declaration for the
    /// same operation replaces the earlier one.
    pub fn require(
        mut self,
        method: impl AsRef<str>,
        route: impl Into<String>,
        roles: impl IntoIterator<Item = Role>,
    ) -> Self {
        self.requirements
            .insert(OperationId::new(method, route), RoleRequirement::any_of(roles));
        self
    }

    pub fn requirement_for(&self, operation: &OperationId) -> Option<&RoleRequirement> {
        self.requirements.get(operation)
    }

    pub fn len(&self) -> usize {
        self.requirements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    /// Declared operations, sorted for stable listing.
    pub fn operations(&self) -> Vec<(&OperationId, &RoleRequirement)> {
        let mut ops: Vec<_> = self.requirements.iter().collect();
        ops.sort_by(|a, b| (a.0.route(), a.0.method()).cmp(&(b.0.route(), b.0.method())));
        ops
    }
}
