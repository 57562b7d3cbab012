//! Principal view and the opaque password hash.

use serde::{Deserialize, Serialize};

use crate::id::PrincipalId;
use crate::role::Role;

/// Encoded password hash (algorithm id + salt + digest).
///
/// # Invariants
/// - Only the hash is ever persisted; the plaintext secret never reaches
///   storage or logs.
/// - `Debug` is redacted so the encoded hash cannot leak through log
///   formatting or error messages.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// The encoded hash string, for verification only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Read-only view of an authenticated identity, resolved from storage.
///
/// The auth core never owns the principal record; this is a transient,
/// hash-stripped snapshot scoped to one request. Role and active-flag
/// changes are observed on the next verification, since tokens are bearers
/// of identity, never caches of attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: PrincipalId,
    /// Unique, case-preserving natural key for credential lookup.
    pub email: String,
    pub name: String,
    pub role: Role,
    pub active: bool,
}
