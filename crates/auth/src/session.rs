//! Identity lifecycle: minting tokens at login/registration/refresh and
//! resolving who a token belongs to.
//!
//! Unlike the gate, nothing here enforces a role policy.

use chrono::{DateTime, Utc};
use thiserror::Error;

use storefront_core::{DomainError, Email, UserId};

use crate::{
    DirectoryError, Identity, NewUser, PasswordError, PasswordVerifier, Role, TokenCodec,
    TokenError, UserDirectory, UserRecord, UserSummary,
};

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_CHARS: usize = 6;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Unknown e-mail or wrong password; which one is never revealed.
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("user not found")]
    UserNotFound,

    #[error("email '{0}' is already registered")]
    EmailTaken(String),

    #[error("{0}")]
    Validation(String),

    #[error("password must be at least {} characters", MIN_PASSWORD_CHARS)]
    WeakPassword,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Directory(DirectoryError),

    #[error(transparent)]
    Password(#[from] PasswordError),
}

impl From<DirectoryError> for SessionError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::EmailTaken(email) => SessionError::EmailTaken(email),
            DirectoryError::NotFound => SessionError::UserNotFound,
            other => SessionError::Directory(other),
        }
    }
}

impl From<DomainError> for SessionError {
    fn from(err: DomainError) -> Self {
        SessionError::Validation(err.to_string())
    }
}

/// A freshly minted token together with the identity it encodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: UserSummary,
}

/// Account creation request.
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone)]
pub struct SessionAuthority {
    codec: TokenCodec,
}

impl SessionAuthority {
    pub fn new(codec: TokenCodec) -> Self {
        Self { codec }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Mint a token for the identity, issued now.
    pub fn mint_for(&self, email: &str, user_id: UserId, role: Role) -> Result<String, TokenError> {
        self.mint_at(email, user_id, role, Utc::now())
    }

    pub fn mint_at(
        &self,
        email: &str,
        user_id: UserId,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        self.codec.issue(email, user_id, role, now)
    }

    /// Verify `token` and return only its subject (the account e-mail).
    pub fn resolve_subject(&self, token: &str) -> Result<String, TokenError> {
        self.resolve_subject_at(token, Utc::now())
    }

    pub fn resolve_subject_at(&self, token: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        Ok(self.codec.verify(token, now)?.sub)
    }

    pub fn resolve_identity(&self, token: &str) -> Result<Identity, TokenError> {
        self.resolve_identity_at(token, Utc::now())
    }

    pub fn resolve_identity_at(&self, token: &str, now: DateTime<Utc>) -> Result<Identity, TokenError> {
        self.codec.verify(token, now).map(Identity::from)
    }

    /// Create an account and log it in.
    pub fn register(
        &self,
        users: &dyn UserDirectory,
        passwords: &dyn PasswordVerifier,
        registration: Registration,
    ) -> Result<Session, SessionError> {
        let email = Email::parse(&registration.email)?;
        validate_password(&registration.password)?;

        let password_hash = passwords.hash(&registration.password)?;
        let record = users.insert(NewUser {
            email,
            password_hash,
            role: registration.role,
        })?;

        tracing::info!(user_id = %record.id, role = %record.role, "account registered");
        self.session_for(&record)
    }

    /// Check credentials and mint a token.
    pub fn login(
        &self,
        users: &dyn UserDirectory,
        passwords: &dyn PasswordVerifier,
        email: &str,
        password: &str,
    ) -> Result<Session, SessionError> {
        let Some(record) = users.find_by_email(email.trim())? else {
            passwords.verify_missing(password);
            tracing::info!("login rejected: unknown account");
            return Err(SessionError::InvalidCredentials);
        };

        if !passwords.verify(password, &record.password_hash)? {
            tracing::info!(user_id = %record.id, "login rejected: wrong password");
            return Err(SessionError::InvalidCredentials);
        }

        tracing::info!(user_id = %record.id, "login succeeded");
        self.session_for(&record)
    }

    /// Exchange a still-valid token for a new one with a renewed expiry.
    ///
    /// The account is re-read so the new token carries its current id and
    /// role. The presented token is not revoked and stays valid until its
    /// own expiry.
    pub fn refresh(&self, users: &dyn UserDirectory, token: &str) -> Result<Session, SessionError> {
        self.refresh_at(users, token, Utc::now())
    }

    pub fn refresh_at(
        &self,
        users: &dyn UserDirectory,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Session, SessionError> {
        let record = self.current_user_at(users, token, now)?;
        let token = self.mint_at(record.email.as_str(), record.id, record.role, now)?;
        Ok(Session {
            token,
            user: UserSummary::from(&record),
        })
    }

    /// Resolve the account a token belongs to.
    pub fn current_user(&self, users: &dyn UserDirectory, token: &str) -> Result<UserRecord, SessionError> {
        self.current_user_at(users, token, Utc::now())
    }

    pub fn current_user_at(
        &self,
        users: &dyn UserDirectory,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<UserRecord, SessionError> {
        let subject = self.resolve_subject_at(token, now)?;
        users
            .find_by_email(&subject)?
            .ok_or(SessionError::UserNotFound)
    }

    fn session_for(&self, record: &UserRecord) -> Result<Session, SessionError> {
        let token = self.mint_for(record.email.as_str(), record.id, record.role)?;
        Ok(Session {
            token,
            user: UserSummary::from(record),
        })
    }
}

pub fn validate_password(password: &str) -> Result<(), SessionError> {
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(SessionError::WeakPassword);
    }
    Ok(())
}
