//! The `UserDirectory` collaborator contract.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use gatehouse_core::{AuthError, PrincipalId};

use crate::record::{NewUser, UserRecord};

/// Directory operation error.
///
/// These are collaborator-level failures; the auth core translates them into
/// its public taxonomy at the boundary (see the `From` impl below).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// Uniqueness violated on insert (including a concurrent insert racing
    /// the caller's existence check).
    #[error("identifier already registered")]
    Duplicate,

    /// Mutation targeted a principal that does not exist.
    #[error("principal not found")]
    NotFound,

    /// The backing store could not be reached or failed mid-operation.
    #[error("directory unavailable: {0}")]
    Unavailable(String),
}

impl From<DirectoryError> for AuthError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::Duplicate => AuthError::DuplicateIdentifier,
            // A missing principal on an auth path is a rejection, not a fault.
            DirectoryError::NotFound => AuthError::Unauthorized,
            DirectoryError::Unavailable(msg) => AuthError::DependencyUnavailable(msg),
        }
    }
}

/// Principal store consumed by the auth core.
///
/// ## Contract
///
/// - `find_by_email` must return the stored hash alongside the principal;
///   the credential path verifies against it. Case policy (sensitive or
///   insensitive matching) is the implementation's deployment decision;
///   stored emails are always case-preserving.
/// - `resolve_live` must reflect the most recent active-flag and role state;
///   token verification re-checks it on every request.
/// - `create` must be atomic ("insert if absent") so a duplicate check and
///   insert cannot race across concurrent registrations.
///
/// Implementations own their concurrency control; the auth core holds no
/// mutable shared state of its own.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Look up a principal by its email natural key, hash included.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, DirectoryError>;

    /// Resolve the live principal for a verified token subject.
    async fn resolve_live(&self, id: PrincipalId) -> Result<Option<UserRecord>, DirectoryError>;

    /// Insert a new principal, failing with [`DirectoryError::Duplicate`] if
    /// the email is already taken.
    async fn create(&self, new_user: NewUser) -> Result<UserRecord, DirectoryError>;

    /// Toggle the active flag. Deactivation invalidates every outstanding
    /// token for the principal at its next verification.
    async fn set_active(&self, id: PrincipalId, active: bool) -> Result<(), DirectoryError>;

    /// Delete a principal. Outstanding tokens fail verification afterwards.
    async fn remove(&self, id: PrincipalId) -> Result<(), DirectoryError>;
}

#[async_trait]
impl<D> UserDirectory for Arc<D>
where
    D: UserDirectory + ?Sized,
{
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, DirectoryError> {
        (**self).find_by_email(email).await
    }

    async fn resolve_live(&self, id: PrincipalId) -> Result<Option<UserRecord>, DirectoryError> {
        (**self).resolve_live(id).await
    }

    async fn create(&self, new_user: NewUser) -> Result<UserRecord, DirectoryError> {
        (**self).create(new_user).await
    }

    async fn set_active(&self, id: PrincipalId, active: bool) -> Result<(), DirectoryError> {
        (**self).set_active(id, active).await
    }

    async fn remove(&self, id: PrincipalId) -> Result<(), DirectoryError> {
        (**self).remove(id).await
    }
}
