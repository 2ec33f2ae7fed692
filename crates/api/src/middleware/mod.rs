//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated caller from a JWT Bearer token.
//! - [`rbac::RequireEditor`] -- Requires a role that may change content.

pub mod auth;
pub mod rbac;
