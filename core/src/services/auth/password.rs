//! bcrypt password hashing, run off the async executor

use crate::errors::{AuthError, DomainError};

/// Hash `password` with the given bcrypt cost
pub async fn hash_password(password: &str, cost: u32) -> Result<String, DomainError> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|_| AuthError::PasswordHashFailed)?
        .map_err(|_| AuthError::PasswordHashFailed.into())
}

/// Check `password` against a stored bcrypt hash.
///
/// A malformed stored hash counts as a mismatch.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool, DomainError> {
    let password = password.to_owned();
    let hash = hash.to_owned();
    let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false))
        .await
        .map_err(|_| AuthError::PasswordHashFailed)?;
    Ok(verified)
}
