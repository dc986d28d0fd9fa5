//! Account password hashing with Argon2id.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use easel_core::ports::{AuthError, PasswordService};

/// Argon2id password service with per-hash random salts.
///
/// Hashes are PHC strings, so the parameters travel with each stored hash
/// and old records keep verifying if the defaults change.
pub struct Argon2PasswordService {
    hasher: Argon2<'static>,
}

impl Argon2PasswordService {
    pub fn new() -> Self {
        Self {
            hasher: Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default()),
        }
    }
}

impl Default for Argon2PasswordService {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordService for Argon2PasswordService {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .hasher
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashingError(e.to_string()))?;
        Ok(hash.to_string())
    }

    fn verify(&self, password: &str, stored: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(stored).map_err(|e| AuthError::HashingError(e.to_string()))?;

        match self.hasher.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::HashingError(e.to_string())),
        }
    }
}
