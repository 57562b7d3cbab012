//! Session claim set and deterministic window validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use gatehouse_core::{PrincipalId, Role};

/// Claims carried by a session token.
///
/// The signature covers the full set, so any mutation invalidates the token.
/// Claims identify the principal; they are never trusted for attributes,
/// since verification re-resolves the live principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject: principal identifier.
    pub sub: PrincipalId,

    /// Email at issuance time (informational; the live record wins).
    pub email: String,

    /// Role claim at issuance time.
    pub role: Role,

    /// Issued-at timestamp.
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp, strictly after `issued_at` by the validity
    /// window.
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Deterministically validate the claim time window.
///
/// This checks the *claims* only, against a caller-supplied clock; signature
/// verification happens in the token layer. A token is expired from
/// `expires_at` onward (no leeway).
pub fn validate_claims(
    claims: &SessionClaims,
    now: DateTime<Utc>,
) -> Result<(), TokenValidationError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use proptest::prelude::*;

    use super::*;

    fn claims_at(issued_at: DateTime<Utc>, ttl: Duration) -> SessionClaims {
        SessionClaims {
            sub: PrincipalId::new(),
            email: "a@x.com".to_string(),
            role: Role::User,
            issued_at,
            expires_at: issued_at + ttl,
        }
    }

    #[test]
    fn valid_inside_window() {
        let issued = Utc::now();
        let claims = claims_at(issued, Duration::hours(1));
        assert!(validate_claims(&claims, issued + Duration::seconds(3599)).is_ok());
    }

    #[test]
    fn expired_after_window() {
        let issued = Utc::now();
        let claims = claims_at(issued, Duration::hours(1));
        assert_eq!(
            validate_claims(&claims, issued + Duration::seconds(3601)),
            Err(TokenValidationError::Expired)
        );
    }

    #[test]
    fn not_yet_valid_before_issuance() {
        let issued = Utc::now();
        let claims = claims_at(issued, Duration::hours(1));
        assert_eq!(
            validate_claims(&claims, issued - Duration::seconds(1)),
            Err(TokenValidationError::NotYetValid)
        );
    }

    #[test]
    fn inverted_window_rejected() {
        let issued = Utc::now();
        let claims = claims_at(issued, Duration::seconds(-1));
        assert_eq!(
            validate_claims(&claims, issued),
            Err(TokenValidationError::InvalidTimeWindow)
        );
    }

    proptest! {
        #[test]
        fn window_boundaries_hold(ttl_secs in 1i64..86_400, offset_secs in 0i64..200_000) {
            let issued = Utc::now();
            let claims = claims_at(issued, Duration::seconds(ttl_secs));
            let now = issued + Duration::seconds(offset_secs);

            let expected = if offset_secs >= ttl_secs {
                Err(TokenValidationError::Expired)
            } else {
                Ok(())
            };
            prop_assert_eq!(validate_claims(&claims, now), expected);
        }
    }
}
