//! Service wiring: account storage, password hashing, and the session
//! authority shared by all handlers.

use std::sync::{Arc, RwLock};

use storefront_auth::{
    Argon2Passwords, DirectoryError, NewUser, PasswordVerifier, Registration, Role,
    SessionAuthority, SessionError, TokenCodec, UserChanges, UserDirectory, UserRecord,
};
use storefront_core::{Email, UserId};

use crate::app::errors::ApiError;
use crate::config::{BootstrapAdmin, ServerConfig};

/// Process-local account storage. Ids are assigned sequentially from 1.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    inner: RwLock<DirectoryState>,
}

#[derive(Debug, Default)]
struct DirectoryState {
    next_id: i64,
    users: Vec<UserRecord>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> DirectoryError {
    DirectoryError::Unavailable("lock poisoned".to_string())
}

impl UserDirectory for InMemoryUserDirectory {
    fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, DirectoryError> {
        let state = self.inner.read().map_err(poisoned)?;
        Ok(state.users.iter().find(|u| u.email.as_str() == email).cloned())
    }

    fn find_by_id(&self, id: UserId) -> Result<Option<UserRecord>, DirectoryError> {
        let state = self.inner.read().map_err(poisoned)?;
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    fn list(&self) -> Result<Vec<UserRecord>, DirectoryError> {
        let state = self.inner.read().map_err(poisoned)?;
        Ok(state.users.clone())
    }

    fn insert(&self, user: NewUser) -> Result<UserRecord, DirectoryError> {
        let mut state = self.inner.write().map_err(poisoned)?;
        if state.users.iter().any(|u| u.email == user.email) {
            return Err(DirectoryError::EmailTaken(user.email.to_string()));
        }

        state.next_id += 1;
        let record = UserRecord {
            id: UserId::new(state.next_id),
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
        };
        state.users.push(record.clone());
        Ok(record)
    }

    fn update(&self, id: UserId, changes: UserChanges) -> Result<UserRecord, DirectoryError> {
        let mut state = self.inner.write().map_err(poisoned)?;

        if let Some(email) = &changes.email {
            if state.users.iter().any(|u| u.id != id && &u.email == email) {
                return Err(DirectoryError::EmailTaken(email.to_string()));
            }
        }

        let user = state
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(DirectoryError::NotFound)?;

        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(hash) = changes.password_hash {
            user.password_hash = hash;
        }
        if let Some(role) = changes.role {
            user.role = role;
        }
        Ok(user.clone())
    }

    fn remove(&self, id: UserId) -> Result<(), DirectoryError> {
        let mut state = self.inner.write().map_err(poisoned)?;
        let before = state.users.len();
        state.users.retain(|u| u.id != id);
        if state.users.len() == before {
            return Err(DirectoryError::NotFound);
        }
        Ok(())
    }
}

/// Shared application services.
pub struct AppServices {
    pub sessions: SessionAuthority,
    pub users: Arc<dyn UserDirectory>,
    pub passwords: Arc<dyn PasswordVerifier>,
}

impl AppServices {
    /// Wire services from configuration and seed the bootstrap admin, if any.
    pub fn new(config: &ServerConfig) -> Result<Self, SessionError> {
        let codec = TokenCodec::new(Arc::new(config.auth.clone()));
        let services = Self::with_parts(
            SessionAuthority::new(codec),
            Arc::new(InMemoryUserDirectory::new()),
            Arc::new(Argon2Passwords::default()),
        );

        if let Some(admin) = &config.bootstrap_admin {
            services.seed_admin(admin)?;
        }
        Ok(services)
    }

    pub fn with_parts(
        sessions: SessionAuthority,
        users: Arc<dyn UserDirectory>,
        passwords: Arc<dyn PasswordVerifier>,
    ) -> Self {
        Self {
            sessions,
            users,
            passwords,
        }
    }

    /// Create the configured administrator unless the e-mail already exists.
    fn seed_admin(&self, admin: &BootstrapAdmin) -> Result<(), SessionError> {
        let email = Email::parse(&admin.email)?;
        if self.users.find_by_email(email.as_str())?.is_some() {
            tracing::info!(email = %email, "bootstrap admin already present");
            return Ok(());
        }

        let session = self.sessions.register(
            self.users.as_ref(),
            self.passwords.as_ref(),
            Registration {
                email: admin.email.clone(),
                password: admin.password.clone(),
                role: Role::Admin,
            },
        )?;
        tracing::info!(user_id = %session.user.id, "bootstrap admin created");
        Ok(())
    }
}

/// Run CPU-heavy work (password hashing) off the async executor.
pub async fn blocking<T, E, F>(services: Arc<AppServices>, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&AppServices) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<ApiError> + Send + 'static,
{
    match tokio::task::spawn_blocking(move || f(&services)).await {
        Ok(result) => result.map_err(Into::into),
        Err(join) => Err(ApiError::internal(join)),
    }
}
