//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the signed-in admin behind a Bearer token.
//! - [`rbac::RequireAdmin`] -- requires the `admin` role.

pub mod auth;
pub mod rbac;
