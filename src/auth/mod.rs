//! Session identity and authorization
//!
//! Credential storage, registration and login live in the external
//! credential service; this module verifies the session tokens it issues
//! and centralizes the authorization rules.

pub mod jwt;
pub mod policy;

pub use jwt::{verify_token, Claims, JwtError};
pub use policy::{authorize, Action, Relation};
