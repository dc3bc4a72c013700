//! Argon2id password hashing.
//!
//! Hashes are PHC strings, so parameters and salt travel with the hash. The
//! salt is the 16 random bytes of a v4 UUID.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use sensorhub_core::{AppError, AppResult};

/// Hashes a password with Argon2id and default parameters.
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::encode_b64(uuid::Uuid::new_v4().as_bytes())
        .map_err(|e| AppError::General(format!("failed to encode salt: {e}")))?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::General(format!("failed to hash password: {e}")))
}

/// Checks a password against a stored PHC hash.
///
/// A wrong password is `Ok(false)`; an unparsable hash is an error.
pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::General(format!("invalid password hash format: {e}")))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AppError::General(format!(
            "password verification failed: {e}"
        ))),
    }
}
