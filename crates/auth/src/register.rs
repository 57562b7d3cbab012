//! Registration: duplicate check, hash, persist, issue.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use gatehouse_core::{AuthError, Principal, Role};
use gatehouse_directory::{NewUser, UserDirectory};

use crate::password::PasswordHasher;
use crate::token::{SessionToken, TokenIssuer};

/// Signup request: identifier, secret, display name.
///
/// `Debug` redacts the secret.
#[derive(Clone)]
pub struct Signup {
    email: String,
    secret: String,
    name: String,
}

impl Signup {
    pub fn new(
        email: impl Into<String>,
        secret: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            secret: secret.into(),
            name: name.into(),
        }
    }

    /// Validate shape and normalize whitespace. Email case is preserved:
    /// it is the stored natural key.
    fn validated(self) -> Result<Self, AuthError> {
        let email = self.email.trim().to_string();
        if email.is_empty() || !email.contains('@') {
            return Err(AuthError::invalid_input("invalid email format"));
        }

        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(AuthError::invalid_input("name cannot be empty"));
        }

        if self.secret.is_empty() {
            return Err(AuthError::invalid_input("secret must not be empty"));
        }

        Ok(Self {
            email,
            secret: self.secret,
            name,
        })
    }
}

impl core::fmt::Debug for Signup {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Signup")
            .field("email", &self.email)
            .field("secret", &"<redacted>")
            .field("name", &self.name)
            .finish()
    }
}

/// Orchestrates new-principal creation.
///
/// The one place that both creates state and issues a token in a single
/// call; everywhere else lookup/creation and issuance are separate
/// operations.
#[derive(Clone)]
pub struct RegistrationFlow {
    directory: Arc<dyn UserDirectory>,
    hasher: PasswordHasher,
    issuer: TokenIssuer,
}

impl RegistrationFlow {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        hasher: PasswordHasher,
        issuer: TokenIssuer,
    ) -> Self {
        Self {
            directory,
            hasher,
            issuer,
        }
    }

    /// Register a new principal and immediately issue a session token.
    ///
    /// New principals get the lowest-privilege role and start active. The
    /// duplicate pre-check keeps the common case cheap; the directory's
    /// atomic insert backstops the race with a concurrent registration.
    pub async fn register(
        &self,
        signup: Signup,
        now: DateTime<Utc>,
    ) -> Result<(Principal, SessionToken), AuthError> {
        let signup = signup.validated()?;

        if self.directory.find_by_email(&signup.email).await?.is_some() {
            return Err(AuthError::DuplicateIdentifier);
        }

        let hasher = self.hasher.clone();
        let secret = signup.secret.clone();
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&secret))
            .await
            .map_err(|e| AuthError::unavailable(format!("hashing task failed: {e}")))??;

        // A concurrent registration can slip between the pre-check and this
        // insert; the directory's atomic create reports it as a duplicate.
        let record = self
            .directory
            .create(NewUser {
                email: signup.email,
                name: signup.name,
                role: Role::User,
                active: true,
                password_hash,
            })
            .await?;

        let principal = Principal::from(&record);
        let token = self.issuer.issue(&principal, now)?;
        info!(principal = %principal.id, "principal registered");

        Ok((principal, token))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration as TokenTtl;

    use gatehouse_directory::InMemoryDirectory;

    use super::*;

    fn flow(directory: Arc<InMemoryDirectory>) -> RegistrationFlow {
        RegistrationFlow::new(
            directory,
            PasswordHasher::new(4),
            TokenIssuer::new("register-test-secret", TokenTtl::hours(1)),
        )
    }

    #[tokio::test]
    async fn register_creates_lowest_privilege_active_principal() {
        let directory = Arc::new(InMemoryDirectory::new());
        let (principal, token) = flow(directory.clone())
            .register(Signup::new("a@x.com", "secret1", "A"), Utc::now())
            .await
            .unwrap();

        assert_eq!(principal.role, Role::User);
        assert!(principal.active);
        assert!(!token.as_str().is_empty());

        let stored = directory.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(stored.id, principal.id);
    }

    #[tokio::test]
    async fn duplicate_identifier_rejected_and_first_hash_unaffected() {
        let directory = Arc::new(InMemoryDirectory::new());
        let flow = flow(directory.clone());

        flow.register(Signup::new("a@x.com", "secret1", "A"), Utc::now())
            .await
            .unwrap();
        let hash_before = directory
            .find_by_email("a@x.com")
            .await
            .unwrap()
            .unwrap()
            .password_hash;

        let err = flow
            .register(Signup::new("a@x.com", "secret2", "B"), Utc::now())
            .await
            .expect_err("duplicate signup");
        assert_eq!(err, AuthError::DuplicateIdentifier);

        let hash_after = directory
            .find_by_email("a@x.com")
            .await
            .unwrap()
            .unwrap()
            .password_hash;
        assert_eq!(hash_before, hash_after);
    }

    #[tokio::test]
    async fn malformed_input_rejected_before_any_side_effect() {
        let directory = Arc::new(InMemoryDirectory::new());
        let flow = flow(directory.clone());

        for signup in [
            Signup::new("not-an-email", "secret1", "A"),
            Signup::new("  ", "secret1", "A"),
            Signup::new("a@x.com", "secret1", "   "),
            Signup::new("a@x.com", "", "A"),
        ] {
            let err = flow.register(signup, Utc::now()).await.expect_err("bad input");
            assert!(matches!(err, AuthError::InvalidInput(_)));
        }

        assert!(directory.find_by_email("a@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn email_case_is_preserved() {
        let directory = Arc::new(InMemoryDirectory::new());
        let (principal, _) = flow(directory)
            .register(Signup::new("  Greta@Example.com ", "secret1", " Greta "), Utc::now())
            .await
            .unwrap();

        assert_eq!(principal.email, "Greta@Example.com");
        assert_eq!(principal.name, "Greta");
    }
}
