//! Two-phase authorization guard: authenticate, then authorize.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use gatehouse_core::{AuthError, Principal};

use crate::policy::RolePolicy;
use crate::token::TokenVerifier;

/// Progress of a request through the guard, for logging.
///
/// `Unauthenticated → Authenticated → Authorized`, or rejection at either
/// transition.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GatePhase {
    Unauthenticated,
    Authenticated,
    Authorized,
}

/// Guards an operation behind token verification plus an optional role
/// policy.
///
/// Both role-gated operations and "any authenticated caller" operations go
/// through the same verification path. The only difference is whether a
/// policy is declared, so there is exactly one place identity gets
/// established.
#[derive(Clone)]
pub struct AuthorizationGate {
    verifier: TokenVerifier,
}

impl AuthorizationGate {
    pub fn new(verifier: TokenVerifier) -> Self {
        Self { verifier }
    }

    /// Admit a request carrying a bearer token.
    ///
    /// Phase 1 (authenticate): verify the token and re-resolve the live
    /// principal. Every failure mode (malformed, mis-signed, expired,
    /// principal gone, principal inactive, lookup timed out) collapses to
    /// the same `Unauthorized`; the real reason only reaches the log.
    ///
    /// Phase 2 (authorize): with no policy the grant is vacuous; otherwise
    /// the live role must be a member of the permitted set, or the outcome
    /// is `Forbidden` (identity known, privilege missing).
    pub async fn authenticate_and_authorize(
        &self,
        token: &str,
        policy: Option<&RolePolicy>,
        now: DateTime<Utc>,
    ) -> Result<Principal, AuthError> {
        let principal = match self.verifier.verify(token, now).await {
            Ok(principal) => principal,
            Err(err) => {
                warn!(phase = ?GatePhase::Unauthenticated, reason = %err, "authentication rejected");
                return Err(AuthError::from(err));
            }
        };

        match policy {
            None => {
                debug!(phase = ?GatePhase::Authorized, principal = %principal.id, "no role policy declared");
                Ok(principal)
            }
            Some(policy) if policy.allows(principal.role) => {
                debug!(phase = ?GatePhase::Authorized, principal = %principal.id, role = %principal.role, "admitted");
                Ok(principal)
            }
            Some(_) => {
                warn!(
                    phase = ?GatePhase::Authenticated,
                    principal = %principal.id,
                    role = %principal.role,
                    "role not permitted for operation"
                );
                Err(AuthError::Forbidden)
            }
        }
    }
}
