//! `storefront-auth`: stateless authentication and role-based authorization.
//!
//! This crate knows nothing about HTTP or storage. It signs and
//! verifies session tokens, extracts bearer credentials from header values,
//! decides per-operation access, and runs the login/registration/refresh
//! flows against abstract account storage.

pub mod authorize;
pub mod bearer;
pub mod claims;
pub mod codec;
pub mod config;
pub mod password;
pub mod policy;
pub mod principal;
pub mod roles;
pub mod session;
pub mod user;

pub use authorize::{AuthorizationGate, GateDecision, GateRejection};
pub use bearer::{BEARER_PREFIX, extract_bearer};
pub use claims::{Claims, TokenError, validate_claims};
pub use codec::TokenCodec;
pub use config::{AuthConfig, ConfigError, SigningKey};
pub use password::Argon2Passwords;
pub use policy::{AccessPolicy, OperationId, RoleRequirement};
pub use principal::Identity;
pub use roles::Role;
pub use session::{Registration, Session, SessionAuthority, SessionError};
pub use user::{
    DirectoryError, NewUser, PasswordError, PasswordVerifier, UserChanges, UserDirectory,
    UserRecord, UserSummary,
};
