//! Collaborator contracts for account storage and password checking.
//!
//! Storage itself lives outside this crate; the session flows only depend on
//! these traits.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use storefront_core::{Email, UserId};

use crate::Role;

/// A stored account.
#[derive(Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub email: Email,
    pub password_hash: String,
    pub role: Role,
}

impl core::fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

/// Public view of an account (no credential material).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub email: String,
    pub role: Role,
}

impl From<&UserRecord> for UserSummary {
    fn from(record: &UserRecord) -> Self {
        Self {
            id: record.id,
            email: record.email.to_string(),
            role: record.role,
        }
    }
}

/// Account to be inserted; the directory assigns the id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub password_hash: String,
    pub role: Role,
}

/// Partial update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<Email>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("email '{0}' is already registered")]
    EmailTaken(String),

    #[error("user not found")]
    NotFound,

    #[error("user directory unavailable: {0}")]
    Unavailable(String),
}

/// Account lookup and mutation, keyed by id or e-mail.
pub trait UserDirectory: Send + Sync {
    fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, DirectoryError>;

    fn find_by_id(&self, id: UserId) -> Result<Option<UserRecord>, DirectoryError>;

    fn list(&self) -> Result<Vec<UserRecord>, DirectoryError>;

    /// Fails with [`DirectoryError::EmailTaken`] when the e-mail exists.
    fn insert(&self, user: NewUser) -> Result<UserRecord, DirectoryError>;

    fn update(&self, id: UserId, changes: UserChanges) -> Result<UserRecord, DirectoryError>;

    fn remove(&self, id: UserId) -> Result<(), DirectoryError>;
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("random salt generation failed: {0}")]
    Rng(String),
}

/// One-way password hashing and verification.
pub trait PasswordVerifier: Send + Sync {
    fn hash(&self, plain: &str) -> Result<String, PasswordError>;

    /// `Ok(false)` for a wrong password or an unparseable stored hash.
    fn verify(&self, plain: &str, hash: &str) -> Result<bool, PasswordError>;

    /// Do the work of a failed `verify` for an account that does not exist,
    /// so login latency does not reveal which e-mails are registered.
    fn verify_missing(&self, plain: &str);
}
