//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async queries that
//! accept `&PgPool` as the first argument.

pub mod admin_user_repo;
pub mod inquiry_repo;
pub mod project_repo;

pub use admin_user_repo::AdminUserRepo;
pub use inquiry_repo::InquiryRepo;
pub use project_repo::ProjectRepo;
