//! Transport-agnostic facade over the auth core.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use gatehouse_core::{AuthError, Principal};
use gatehouse_directory::UserDirectory;

use crate::config::AuthConfig;
use crate::credential::{Credential, CredentialValidator};
use crate::gate::AuthorizationGate;
use crate::password::PasswordHasher;
use crate::policy::RolePolicy;
use crate::register::{RegistrationFlow, Signup};
use crate::token::{SessionToken, TokenIssuer, TokenVerifier};

/// An authenticated session: the resolved principal plus its bearer token.
#[derive(Debug, Clone)]
pub struct Session {
    pub principal: Principal,
    pub token: SessionToken,
}

/// Wires the auth components over one directory and one configuration.
///
/// This is the surface the transport layer calls into; everything below it
/// takes `now` explicitly, so the facade is the only place the wall clock
/// is read.
#[derive(Clone)]
pub struct AuthService {
    validator: CredentialValidator,
    issuer: TokenIssuer,
    gate: AuthorizationGate,
    registration: RegistrationFlow,
}

impl AuthService {
    pub fn new(config: AuthConfig, directory: Arc<dyn UserDirectory>) -> Self {
        let hasher = PasswordHasher::new(config.hash_cost);
        let issuer = TokenIssuer::new(&config.token_secret, config.token_ttl);
        let verifier = TokenVerifier::new(
            &config.token_secret,
            directory.clone(),
            config.directory_timeout,
        );

        Self {
            validator: CredentialValidator::new(directory.clone(), hasher.clone()),
            issuer: issuer.clone(),
            gate: AuthorizationGate::new(verifier),
            registration: RegistrationFlow::new(directory, hasher, issuer),
        }
    }

    /// Validate a credential and issue a session token.
    pub async fn login(&self, email: &str, secret: &str) -> Result<Session, AuthError> {
        let credential = Credential::new(email, secret);
        let principal = self.validator.validate(&credential).await?;
        let token = self.issuer.issue(&principal, Utc::now())?;
        info!(principal = %principal.id, "login succeeded");

        Ok(Session { principal, token })
    }

    /// Register a new principal and issue its first session token.
    pub async fn signup(
        &self,
        email: &str,
        secret: &str,
        name: &str,
    ) -> Result<Session, AuthError> {
        let (principal, token) = self
            .registration
            .register(Signup::new(email, secret, name), Utc::now())
            .await?;

        Ok(Session { principal, token })
    }

    /// Admit a bearer token against an optional role policy, releasing the
    /// live principal on success.
    pub async fn authenticate_and_authorize(
        &self,
        token: &str,
        policy: Option<&RolePolicy>,
    ) -> Result<Principal, AuthError> {
        self.gate
            .authenticate_and_authorize(token, policy, Utc::now())
            .await
    }

    /// Resolve the live principal behind a token, with no role requirement.
    /// Same verification path as every role-gated operation.
    pub async fn current_principal(&self, token: &str) -> Result<Principal, AuthError> {
        self.authenticate_and_authorize(token, None).await
    }
}
