//! Password hashing.

use crate::{AuthError, AuthResult};

/// Default bcrypt work factor.
pub const DEFAULT_BCRYPT_COST: u32 = bcrypt::DEFAULT_COST;

/// Hashes and verifies passwords with bcrypt.
///
/// bcrypt is deliberately slow, so both operations run on the blocking
/// thread pool instead of the async worker threads.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_BCRYPT_COST)
    }
}

impl PasswordHasher {
    /// Creates a hasher with the given work factor.
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Returns the work factor.
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hashes a plaintext password.
    pub async fn hash(&self, password: &str) -> AuthResult<String> {
        let password = password.to_owned();
        let cost = self.cost;
        let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AuthError::TaskJoin(e.to_string()))??;
        Ok(hash)
    }

    /// Checks a plaintext password against a stored hash.
    pub async fn verify(&self, password: &str, hash: &str) -> AuthResult<bool> {
        let password = password.to_owned();
        let hash = hash.to_owned();
        let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| AuthError::TaskJoin(e.to_string()))??;
        Ok(matches)
    }
}
