//! Well-known role name constants.
//!
//! The admin panel has a single role; tokens carry it so the API can
//! reject anything else at the extractor level.

pub const ROLE_ADMIN: &str = "admin";
