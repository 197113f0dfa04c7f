use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher as _, PasswordVerifier as _};

use crate::{PasswordError, PasswordVerifier};

/// Well-formed PHC string with the default Argon2id parameters. No password
/// verifies against it.
const MISSING_ACCOUNT_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c3RvcmVmcm9udC1kdW1teQ$c3RvcmVmcm9udC1kdW1teS1wYXNzd29yZC1oYXNoISE";

/// Argon2id (default parameters) producing PHC-format strings.
#[derive(Clone, Default)]
pub struct Argon2Passwords {
    argon2: Argon2<'static>,
}

impl core::fmt::Debug for Argon2Passwords {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Argon2Passwords")
    }
}

impl Argon2Passwords {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordVerifier for Argon2Passwords {
    fn hash(&self, plain: &str) -> Result<String, PasswordError> {
        let mut salt_bytes = [0u8; 16];
        getrandom::getrandom(&mut salt_bytes).map_err(|e| PasswordError::Rng(e.to_string()))?;
        let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| PasswordError::Hash(e.to_string()))?;

        let phc = self
            .argon2
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| PasswordError::Hash(e.to_string()))?;
        Ok(phc.to_string())
    }

    fn verify(&self, plain: &str, hash: &str) -> Result<bool, PasswordError> {
        let Ok(parsed) = PasswordHash::new(hash) else {
            tracing::warn!("stored password hash is not a valid PHC string");
            return Ok(false);
        };
        Ok(self.argon2.verify_password(plain.as_bytes(), &parsed).is_ok())
    }

    fn verify_missing(&self, plain: &str) {
        let _ = self.verify(plain, MISSING_ACCOUNT_HASH);
    }
}
