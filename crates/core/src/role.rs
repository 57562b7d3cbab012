//! Role model for authorization decisions.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Role granted to a principal.
///
/// Roles are a closed set checked by flat membership (no hierarchy, no
/// inheritance). `User` is the lowest-privilege role and the default for
/// newly registered principals.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(AuthError::invalid_input(format!("unknown role: {other}"))),
        }
    }
}
