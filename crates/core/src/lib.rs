//! Domain core for the workshop site.
//!
//! Holds the record types shared by every layer, the store contracts the
//! persistence and asset backends implement, the seed fixture, and the
//! gallery engine with its detail-view state machine. Nothing in here
//! talks HTTP or SQL.

pub mod assets;
pub mod category;
pub mod error;
pub mod gallery;
pub mod inquiry;
pub mod memory;
pub mod project;
pub mod roles;
pub mod seed;
pub mod stats;
pub mod store;
pub mod types;
pub mod validation;
