//! `gatehouse-auth` — the authentication/authorization core.
//!
//! Credential validation, session-token issuance/verification, and the
//! two-phase authenticate-then-authorize guard. Persistence is delegated to
//! a [`gatehouse_directory::UserDirectory`] collaborator; transport (HTTP,
//! headers, DTOs) stays outside this crate entirely.

pub mod claims;
pub mod config;
pub mod credential;
pub mod gate;
pub mod password;
pub mod policy;
pub mod register;
pub mod service;
pub mod token;

pub use claims::{SessionClaims, TokenValidationError, validate_claims};
pub use config::AuthConfig;
pub use credential::{Credential, CredentialValidator};
pub use gate::AuthorizationGate;
pub use password::PasswordHasher;
pub use policy::RolePolicy;
pub use register::{RegistrationFlow, Signup};
pub use service::{AuthService, Session};
pub use token::{SessionToken, TokenIssuer, TokenVerifier, VerifyError};
