//! Row structs for each table.
//!
//! Rows convert into the core record types; the core never sees `sqlx`.

pub mod admin_user;
pub mod inquiry;
pub mod project;
