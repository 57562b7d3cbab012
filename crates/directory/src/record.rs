//! Stored user rows, as the directory sees them.

use chrono::{DateTime, Utc};

use gatehouse_core::{PasswordHash, Principal, PrincipalId, Role};

/// A principal as stored by the directory, hash included.
///
/// Only the directory and the credential path ever see this type; everything
/// past authentication works with the hash-stripped [`Principal`] view.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: PrincipalId,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub active: bool,
    pub password_hash: PasswordHash,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// The read-only, hash-stripped view released to the rest of the core.
    pub fn principal(&self) -> Principal {
        Principal {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role,
            active: self.active,
        }
    }
}

impl From<&UserRecord> for Principal {
    fn from(record: &UserRecord) -> Self {
        record.principal()
    }
}

/// Fields needed to create a principal. The directory assigns the id and
/// the creation timestamp.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub role: Role,
    pub active: bool,
    pub password_hash: PasswordHash,
}
