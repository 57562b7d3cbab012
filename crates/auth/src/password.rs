//! One-way salted password hashing.

use gatehouse_core::{AuthError, PasswordHash};

/// bcrypt hasher with a fixed work factor.
///
/// Hashing and verification are deliberately expensive (the cost factor is
/// the brute-force defense), so neither may run on a latency-sensitive
/// dispatch path. Async callers offload through
/// `tokio::task::spawn_blocking`, as the credential and registration flows
/// do.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a secret with a fresh per-call salt.
    ///
    /// The encoded output carries algorithm id, cost, salt, and digest.
    /// The only rejected input is the empty secret.
    pub fn hash(&self, secret: &str) -> Result<PasswordHash, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::invalid_input("secret must not be empty"));
        }

        let encoded = bcrypt::hash(secret, self.cost)
            .map_err(|e| AuthError::invalid_input(format!("hashing failed: {e}")))?;
        Ok(PasswordHash::new(encoded))
    }

    /// Constant-time comparison of a secret against a stored hash.
    ///
    /// Mismatch is a normal `false`, never an error; an undecodable hash is
    /// treated as a mismatch too.
    pub fn verify(&self, secret: &str, hash: &PasswordHash) -> bool {
        bcrypt::verify(secret, hash.expose()).unwrap_or(false)
    }
}
