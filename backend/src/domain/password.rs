//! Argon2id password hashing for staff credentials.

use argon2::{
    Argon2,
    password_hash::{PasswordHash as PhcHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// Errors raised while hashing or verifying passwords.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Hashing failed.
    #[error("failed to hash password: {0}")]
    Hash(String),
    /// Verification failed for a reason other than a mismatch.
    #[error("failed to verify password: {0}")]
    Verify(String),
    /// The stored hash is not a valid PHC string.
    #[error("invalid password hash format")]
    InvalidHash,
}

/// A stored password hash in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash `password` with a fresh random salt.
    ///
    /// # Examples
    /// ```
    /// use motofinance::domain::PasswordHash;
    ///
    /// let hash = PasswordHash::create("secret1").unwrap();
    /// assert!(hash.as_str().starts_with("$argon2id$"));
    /// assert!(hash.verify("secret1").unwrap());
    /// ```
    pub fn create(password: &str) -> Result<Self, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| Self(hash.to_string()))
            .map_err(|error| PasswordError::Hash(error.to_string()))
    }

    /// Wrap a hash loaded from storage.
    pub fn from_stored(value: String) -> Self {
        Self(value)
    }

    /// PHC string for storage.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check `password` against this hash.
    pub fn verify(&self, password: &str) -> Result<bool, PasswordError> {
        let parsed = PhcHash::new(&self.0).map_err(|_| PasswordError::InvalidHash)?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(error) => Err(PasswordError::Verify(error.to_string())),
        }
    }
}

impl std::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}
