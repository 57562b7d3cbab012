//! In-memory directory for tests/dev.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use gatehouse_core::PrincipalId;

use crate::directory::{DirectoryError, UserDirectory};
use crate::record::{NewUser, UserRecord};

/// In-memory principal store.
///
/// Intended for tests/dev. Not optimized for performance: email lookup scans
/// the table. Lookup is exact-match (case-sensitive); deployments wanting
/// case-insensitive matching implement it in their own directory.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    users: RwLock<HashMap<PrincipalId, UserRecord>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(_: impl std::error::Error) -> DirectoryError {
    DirectoryError::Unavailable("lock poisoned".to_string())
}

#[async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, DirectoryError> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn resolve_live(&self, id: PrincipalId) -> Result<Option<UserRecord>, DirectoryError> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.get(&id).cloned())
    }

    async fn create(&self, new_user: NewUser) -> Result<UserRecord, DirectoryError> {
        // Uniqueness check and insert under one write lock ("insert if
        // absent"), so two concurrent registrations cannot both succeed.
        let mut users = self.users.write().map_err(poisoned)?;

        if users.values().any(|u| u.email == new_user.email) {
            return Err(DirectoryError::Duplicate);
        }

        let record = UserRecord {
            id: PrincipalId::new(),
            email: new_user.email,
            name: new_user.name,
            role: new_user.role,
            active: new_user.active,
            password_hash: new_user.password_hash,
            created_at: Utc::now(),
        };
        users.insert(record.id, record.clone());

        Ok(record)
    }

    async fn set_active(&self, id: PrincipalId, active: bool) -> Result<(), DirectoryError> {
        let mut users = self.users.write().map_err(poisoned)?;
        let record = users.get_mut(&id).ok_or(DirectoryError::NotFound)?;
        record.active = active;
        Ok(())
    }

    async fn remove(&self, id: PrincipalId) -> Result<(), DirectoryError> {
        let mut users = self.users.write().map_err(poisoned)?;
        users.remove(&id).map(|_| ()).ok_or(DirectoryError::NotFound)
    }
}
