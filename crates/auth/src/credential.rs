//! Credential validation (identifier + secret → principal).

use std::sync::Arc;

use tracing::debug;

use gatehouse_core::{AuthError, Principal};
use gatehouse_directory::UserDirectory;

use crate::password::PasswordHasher;

/// An ephemeral (identifier, plaintext secret) pair.
///
/// Exists only for the duration of one `validate` call; never persisted.
/// `Debug` redacts the secret.
#[derive(Clone)]
pub struct Credential {
    email: String,
    secret: String,
}

impl Credential {
    pub fn new(email: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            secret: secret.into(),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl core::fmt::Debug for Credential {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credential")
            .field("email", &self.email)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Turns a credential into an authenticated principal or a rejection.
///
/// Unknown identifier and wrong secret produce the *identical* generic
/// `Unauthorized`: the externally observable outcome must not leak which
/// check failed (identifier-enumeration side channel). The distinction only
/// exists at debug log level.
#[derive(Clone)]
pub struct CredentialValidator {
    directory: Arc<dyn UserDirectory>,
    hasher: PasswordHasher,
}

impl CredentialValidator {
    pub fn new(directory: Arc<dyn UserDirectory>, hasher: PasswordHasher) -> Self {
        Self { directory, hasher }
    }

    /// Validate a credential. No mutation, no token issuance; issuance is a
    /// separate step so callers that only need identity can reuse this.
    pub async fn validate(&self, credential: &Credential) -> Result<Principal, AuthError> {
        let Some(record) = self.directory.find_by_email(credential.email()).await? else {
            debug!("credential rejected: unknown identifier");
            return Err(AuthError::Unauthorized);
        };

        // bcrypt is CPU-bound; keep it off the async dispatch path.
        let hasher = self.hasher.clone();
        let secret = credential.secret().to_owned();
        let hash = record.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || hasher.verify(&secret, &hash))
            .await
            .map_err(|e| AuthError::unavailable(format!("verification task failed: {e}")))?;

        if !matches {
            debug!(principal = %record.id, "credential rejected: secret mismatch");
            return Err(AuthError::Unauthorized);
        }

        Ok(Principal::from(&record))
    }
}
