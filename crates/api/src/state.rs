use std::sync::Arc;

use muebles_core::store::{AssetStore, InquiryStore, ProjectStore};

use crate::auth::identity::IdentityProvider;
use crate::config::ServerConfig;
use crate::gallery::GalleryRegistry;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind `Arc` or already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database pool; `None` on the memory backend.
    pub pool: Option<muebles_db::DbPool>,
    pub config: Arc<ServerConfig>,
    pub projects: Arc<dyn ProjectStore>,
    pub inquiries: Arc<dyn InquiryStore>,
    pub assets: Arc<dyn AssetStore>,
    pub identity: Arc<IdentityProvider>,
    pub galleries: Arc<GalleryRegistry>,
}
