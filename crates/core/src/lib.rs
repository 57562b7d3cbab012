//! `gatehouse-core` — identity domain building blocks.
//!
//! This crate contains **pure domain** primitives (no I/O, no crypto, no
//! transport concerns): the error taxonomy, strongly-typed identifiers, the
//! role model, and the read-only principal view.

pub mod error;
pub mod id;
pub mod principal;
pub mod role;

pub use error::{AuthError, AuthResult};
pub use id::PrincipalId;
pub use principal::{PasswordHash, Principal};
pub use role::Role;
