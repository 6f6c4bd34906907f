pub mod auth;
pub mod background;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod gallery;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
