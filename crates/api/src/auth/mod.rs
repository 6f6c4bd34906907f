//! Authentication and authorization primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT access-token generation and validation.
//! - [`identity`] -- the admin identity provider: sign-in, sign-out,
//!   session lookup, session change notifications.

pub mod identity;
pub mod jwt;
pub mod password;
