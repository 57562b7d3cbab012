//! Error taxonomy for the auth core.

use thiserror::Error;

/// Result type used across the auth core.
pub type AuthResult<T> = Result<T, AuthError>;

/// Externally visible auth failure.
///
/// Keep this surface coarse on purpose: credential and token rejections all
/// collapse to `Unauthorized` so a caller cannot tell *which* check failed.
/// The finer-grained reasons live in module-level error enums and only reach
/// the log, never the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Malformed input (empty secret, bad email shape). Recoverable by the
    /// caller correcting the input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Bad credential, or bad/expired/revoked token. Deliberately generic.
    #[error("unauthorized")]
    Unauthorized,

    /// Authenticated, but the principal's role is not permitted for the
    /// operation. Distinct from `Unauthorized`: identity is known.
    #[error("forbidden")]
    Forbidden,

    /// Registration conflict: the identifier is already taken.
    #[error("identifier already registered")]
    DuplicateIdentifier,

    /// The user directory (or another collaborator) failed. Distinguishable
    /// from a rejection so callers can retry at the transport level.
    #[error("dependency unavailable: {0}")]
    DependencyUnavailable(String),
}

impl AuthError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::DependencyUnavailable(msg.into())
    }
}
