//! Authentication middleware for owner requests
//!
//! Tokens are issued by the identity service; this service only verifies them.

pub mod owner_auth;

pub use owner_auth::{OwnerClaims, OwnerIdentity, Role, authenticate_owner, owner_auth_middleware};
