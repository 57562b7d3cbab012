//! Session-token issuance and verification.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use gatehouse_core::{AuthError, Principal};
use gatehouse_directory::{DirectoryError, UserDirectory};

use crate::claims::{SessionClaims, TokenValidationError, validate_claims};

/// An encoded, signed session token (HS256 JWT over [`SessionClaims`]).
///
/// Stateless: there is no server-side session table. Validity is signature +
/// time window + a live re-check that the principal still exists and is
/// active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<SessionToken> for String {
    fn from(token: SessionToken) -> Self {
        token.0
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Issuer
// ─────────────────────────────────────────────────────────────────────────────

/// Mints signed, time-bounded session tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    ttl: chrono::Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl: chrono::Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Issue a token for an authenticated principal.
    ///
    /// Deterministic given principal and clock, except for the signature.
    /// No side effects beyond signing.
    pub fn issue(
        &self,
        principal: &Principal,
        now: DateTime<Utc>,
    ) -> Result<SessionToken, AuthError> {
        let claims = SessionClaims {
            sub: principal.id,
            email: principal.email.clone(),
            role: principal.role,
            issued_at: now,
            expires_at: now + self.ttl,
        };

        let encoded = jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::unavailable(format!("token signing failed: {e}")))?;

        Ok(SessionToken(encoded))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Verifier
// ─────────────────────────────────────────────────────────────────────────────

/// Internal verification failure.
///
/// Callers outside this crate only ever see the collapsed [`AuthError`]
/// (everything here is `Unauthorized` except an explicit directory fault);
/// the variants exist for logging.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// Malformed, mis-signed, or claim-shape-invalid token.
    #[error("invalid token")]
    InvalidToken,

    /// Signature fine, time window elapsed.
    #[error("token has expired")]
    Expired,

    /// Subject no longer resolves (principal deleted after issuance).
    #[error("principal not found")]
    PrincipalNotFound,

    /// Principal resolved but has been deactivated.
    #[error("principal is inactive")]
    PrincipalInactive,

    /// Live lookup exceeded its deadline. Fails closed.
    #[error("directory lookup timed out")]
    Timeout,

    /// Live lookup failed outright.
    #[error("directory unavailable: {0}")]
    Directory(String),
}

impl From<VerifyError> for AuthError {
    fn from(err: VerifyError) -> Self {
        match err {
            VerifyError::Directory(msg) => AuthError::DependencyUnavailable(msg),
            VerifyError::InvalidToken
            | VerifyError::Expired
            | VerifyError::PrincipalNotFound
            | VerifyError::PrincipalInactive
            | VerifyError::Timeout => AuthError::Unauthorized,
        }
    }
}

/// Verifies presented tokens and re-resolves the live principal.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
    directory: Arc<dyn UserDirectory>,
    directory_timeout: Duration,
}

impl TokenVerifier {
    pub fn new(
        secret: &str,
        directory: Arc<dyn UserDirectory>,
        directory_timeout: Duration,
    ) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Claim timestamps are RFC3339, not numeric `exp`/`iat`, and the
        // window is enforced by `validate_claims` against an injected clock.
        validation.validate_exp = false;
        validation.required_spec_claims = HashSet::new();

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            directory,
            directory_timeout,
        }
    }

    /// Signature and claim-shape check only. No clock, no directory.
    pub fn decode(&self, token: &str) -> Result<SessionClaims, VerifyError> {
        jsonwebtoken::decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| VerifyError::InvalidToken)
    }

    /// Verify a presented token, each step a hard stop:
    ///
    /// 1. decode + signature check
    /// 2. time window against `now`
    /// 3. live principal resolution (bounded by the directory timeout)
    /// 4. active flag
    ///
    /// Returns the **live** principal, not the claim data, so role and email
    /// changes after issuance are observed immediately.
    pub async fn verify(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Principal, VerifyError> {
        let claims = self.decode(token)?;

        validate_claims(&claims, now).map_err(|e| match e {
            TokenValidationError::Expired => VerifyError::Expired,
            TokenValidationError::NotYetValid | TokenValidationError::InvalidTimeWindow => {
                VerifyError::InvalidToken
            }
        })?;

        let lookup = self.directory.resolve_live(claims.sub);
        let record = match tokio::time::timeout(self.directory_timeout, lookup).await {
            Err(_elapsed) => return Err(VerifyError::Timeout),
            Ok(Err(DirectoryError::Unavailable(msg))) => return Err(VerifyError::Directory(msg)),
            Ok(Err(other)) => return Err(VerifyError::Directory(other.to_string())),
            Ok(Ok(None)) => return Err(VerifyError::PrincipalNotFound),
            Ok(Ok(Some(record))) => record,
        };

        if !record.active {
            return Err(VerifyError::PrincipalInactive);
        }

        Ok(Principal::from(&record))
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::Duration as TokenTtl;

    use gatehouse_core::{PasswordHash, PrincipalId, Role};
    use gatehouse_directory::{InMemoryDirectory, NewUser, UserRecord};

    use super::*;

    const SECRET: &str = "test-signing-secret";

    async fn seeded_directory() -> (Arc<InMemoryDirectory>, UserRecord) {
        let directory = Arc::new(InMemoryDirectory::new());
        let record = directory
            .create(NewUser {
                email: "alice@example.com".to_string(),
                name: "Alice".to_string(),
                role: Role::User,
                active: true,
                password_hash: PasswordHash::new("$2b$04$unused"),
            })
            .await
            .unwrap();
        (directory, record)
    }

    fn verifier(directory: Arc<InMemoryDirectory>) -> TokenVerifier {
        TokenVerifier::new(SECRET, directory, Duration::from_secs(1))
    }

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(SECRET, TokenTtl::hours(1))
    }

    /// Corrupt the signature segment without touching the claims.
    ///
    /// 'A' and 'Q' differ in a high bit of the base64url group, so the
    /// decoded signature bytes change even for the final character (whose
    /// low bits are discarded).
    fn flip_signature(token: &str) -> String {
        let mut flipped = token.to_string();
        let last = flipped.pop().unwrap();
        flipped.push(if last == 'Q' { 'A' } else { 'Q' });
        flipped
    }

    #[tokio::test]
    async fn issue_then_verify_returns_live_principal() {
        let (directory, record) = seeded_directory().await;
        let now = Utc::now();
        let token = issuer().issue(&record.principal(), now).unwrap();

        let principal = verifier(directory).verify(token.as_str(), now).await.unwrap();
        assert_eq!(principal, record.principal());
    }

    #[tokio::test]
    async fn verification_window_is_exact() {
        let (directory, record) = seeded_directory().await;
        let verifier = verifier(directory);
        let issued = Utc::now();
        let token = issuer().issue(&record.principal(), issued).unwrap();

        // Valid one second before expiry, expired one second after.
        let just_before = issued + TokenTtl::seconds(3599);
        assert!(verifier.verify(token.as_str(), just_before).await.is_ok());

        let just_after = issued + TokenTtl::seconds(3601);
        assert_eq!(
            verifier.verify(token.as_str(), just_after).await,
            Err(VerifyError::Expired)
        );
    }

    #[tokio::test]
    async fn tampered_signature_never_resolves() {
        let (directory, record) = seeded_directory().await;
        let now = Utc::now();
        let token = issuer().issue(&record.principal(), now).unwrap();

        let result = verifier(directory)
            .verify(&flip_signature(token.as_str()), now)
            .await;
        assert_eq!(result, Err(VerifyError::InvalidToken));
    }

    #[tokio::test]
    async fn garbage_token_is_invalid() {
        let (directory, _) = seeded_directory().await;
        let result = verifier(directory).verify("not.a.token", Utc::now()).await;
        assert_eq!(result, Err(VerifyError::InvalidToken));
    }

    #[tokio::test]
    async fn wrong_secret_is_invalid() {
        let (directory, record) = seeded_directory().await;
        let now = Utc::now();
        let token = TokenIssuer::new("other-secret", TokenTtl::hours(1))
            .issue(&record.principal(), now)
            .unwrap();

        let result = verifier(directory).verify(token.as_str(), now).await;
        assert_eq!(result, Err(VerifyError::InvalidToken));
    }

    #[tokio::test]
    async fn deleted_principal_fails_even_with_valid_token() {
        let (directory, record) = seeded_directory().await;
        let now = Utc::now();
        let token = issuer().issue(&record.principal(), now).unwrap();

        directory.remove(record.id).await.unwrap();

        let result = verifier(directory).verify(token.as_str(), now).await;
        assert_eq!(result, Err(VerifyError::PrincipalNotFound));
    }

    #[tokio::test]
    async fn deactivated_principal_fails_even_with_valid_token() {
        let (directory, record) = seeded_directory().await;
        let now = Utc::now();
        let token = issuer().issue(&record.principal(), now).unwrap();

        directory.set_active(record.id, false).await.unwrap();

        let result = verifier(directory).verify(token.as_str(), now).await;
        assert_eq!(result, Err(VerifyError::PrincipalInactive));
    }

    #[tokio::test]
    async fn role_change_after_issuance_is_observed() {
        let (directory, record) = seeded_directory().await;
        let now = Utc::now();
        let token = issuer().issue(&record.principal(), now).unwrap();

        // Promote by replacing the stored record (the in-memory store has
        // no role-update op). The replacement gets a fresh id.
        directory.remove(record.id).await.unwrap();
        let promoted = directory
            .create(NewUser {
                email: record.email.clone(),
                name: record.name.clone(),
                role: Role::Admin,
                active: true,
                password_hash: record.password_hash.clone(),
            })
            .await
            .unwrap();

        // The old token's subject no longer resolves; a token for the new
        // record reflects the live admin role, not a stale claim.
        let stale = verifier(directory.clone()).verify(token.as_str(), now).await;
        assert_eq!(stale, Err(VerifyError::PrincipalNotFound));

        let fresh = issuer().issue(&promoted.principal(), now).unwrap();
        let live = verifier(directory).verify(fresh.as_str(), now).await.unwrap();
        assert_eq!(live.role, Role::Admin);
    }

    struct UnavailableDirectory;

    #[async_trait]
    impl UserDirectory for UnavailableDirectory {
        async fn find_by_email(&self, _: &str) -> Result<Option<UserRecord>, DirectoryError> {
            Err(DirectoryError::Unavailable("connection refused".to_string()))
        }
        async fn resolve_live(
            &self,
            _: PrincipalId,
        ) -> Result<Option<UserRecord>, DirectoryError> {
            Err(DirectoryError::Unavailable("connection refused".to_string()))
        }
        async fn create(&self, _: NewUser) -> Result<UserRecord, DirectoryError> {
            Err(DirectoryError::Unavailable("connection refused".to_string()))
        }
        async fn set_active(&self, _: PrincipalId, _: bool) -> Result<(), DirectoryError> {
            Err(DirectoryError::Unavailable("connection refused".to_string()))
        }
        async fn remove(&self, _: PrincipalId) -> Result<(), DirectoryError> {
            Err(DirectoryError::Unavailable("connection refused".to_string()))
        }
    }

    struct HangingDirectory;

    #[async_trait]
    impl UserDirectory for HangingDirectory {
        async fn find_by_email(&self, _: &str) -> Result<Option<UserRecord>, DirectoryError> {
            std::future::pending().await
        }
        async fn resolve_live(
            &self,
            _: PrincipalId,
        ) -> Result<Option<UserRecord>, DirectoryError> {
            std::future::pending().await
        }
        async fn create(&self, _: NewUser) -> Result<UserRecord, DirectoryError> {
            std::future::pending().await
        }
        async fn set_active(&self, _: PrincipalId, _: bool) -> Result<(), DirectoryError> {
            std::future::pending().await
        }
        async fn remove(&self, _: PrincipalId) -> Result<(), DirectoryError> {
            std::future::pending().await
        }
    }

    fn some_principal() -> Principal {
        Principal {
            id: PrincipalId::new(),
            email: "x@example.com".to_string(),
            name: "X".to_string(),
            role: Role::User,
            active: true,
        }
    }

    #[tokio::test]
    async fn directory_fault_is_distinguished_from_rejection() {
        let now = Utc::now();
        let token = issuer().issue(&some_principal(), now).unwrap();

        let verifier = TokenVerifier::new(SECRET, Arc::new(UnavailableDirectory), Duration::from_secs(1));
        let result = verifier.verify(token.as_str(), now).await;
        assert!(matches!(result, Err(VerifyError::Directory(_))));
    }

    #[tokio::test]
    async fn slow_directory_fails_closed() {
        let now = Utc::now();
        let token = issuer().issue(&some_principal(), now).unwrap();

        let verifier =
            TokenVerifier::new(SECRET, Arc::new(HangingDirectory), Duration::from_millis(10));
        let result = verifier.verify(token.as_str(), now).await;
        assert_eq!(result, Err(VerifyError::Timeout));
    }
}
