use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use muebles_core::assets::LocalAssetStore;
use muebles_core::memory::{InMemoryInquiryStore, InMemoryProjectStore};
use muebles_core::store::{AdminDirectory, InquiryStore, ProjectStore};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use muebles_api::auth::identity::IdentityProvider;
use muebles_api::config::{ServerConfig, StoreBackend};
use muebles_api::gallery::GalleryRegistry;
use muebles_api::state::AppState;
use muebles_api::{background, bootstrap, router};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "muebles_api=debug,muebles_core=info,muebles_db=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        backend = ?config.store_backend,
        "Loaded server configuration",
    );

    // --- Stores ---
    let (pool, projects, inquiries, directory): (
        Option<muebles_db::DbPool>,
        Arc<dyn ProjectStore>,
        Arc<dyn InquiryStore>,
        Arc<dyn AdminDirectory>,
    ) = match config.store_backend {
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .expect("DATABASE_URL must be set");

            let pool = muebles_db::create_pool(database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            muebles_db::health_check(&pool)
                .await
                .expect("Database health check failed");
            tracing::info!("Database health check passed");

            muebles_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            bootstrap::ensure_admin_account(&pool, &config)
                .await
                .expect("Failed to bootstrap the admin account");

            let projects: Arc<dyn ProjectStore> =
                Arc::new(muebles_db::PgProjectStore::new(pool.clone()));
            let inquiries: Arc<dyn InquiryStore> =
                Arc::new(muebles_db::PgInquiryStore::new(pool.clone()));
            let directory: Arc<dyn AdminDirectory> =
                Arc::new(muebles_db::PgAdminDirectory::new(pool.clone()));
            (Some(pool), projects, inquiries, directory)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory stores; nothing will persist across restarts");
            let directory = bootstrap::memory_admin_directory(&config)
                .expect("Invalid bootstrap admin credentials");
            let projects: Arc<dyn ProjectStore> =
                Arc::new(InMemoryProjectStore::with_sample_projects());
            let inquiries: Arc<dyn InquiryStore> = Arc::new(InMemoryInquiryStore::new());
            let directory: Arc<dyn AdminDirectory> = Arc::new(directory);
            (None, projects, inquiries, directory)
        }
    };

    // --- Assets ---
    tokio::fs::create_dir_all(&config.asset_dir)
        .await
        .expect("Failed to create the asset directory");
    let assets = Arc::new(LocalAssetStore::new(
        config.asset_dir.clone(),
        &config.asset_base_url,
    ));
    tracing::info!(dir = %config.asset_dir.display(), url = %config.asset_base_url, "Asset store ready");

    // --- Identity ---
    let identity = Arc::new(IdentityProvider::new(directory, config.jwt.clone()));

    // --- Gallery sessions ---
    let galleries = Arc::new(GalleryRegistry::new(config.max_gallery_sessions));

    let sweeper_cancel = CancellationToken::new();
    let sweeper_handle = tokio::spawn(background::session_sweeper::run(
        Arc::clone(&galleries),
        Arc::clone(&identity),
        Duration::from_secs(config.gallery_session_ttl_secs),
        sweeper_cancel.clone(),
    ));

    // --- App state ---
    let config = Arc::new(config);
    let state = AppState {
        pool,
        config: Arc::clone(&config),
        projects,
        inquiries,
        assets,
        identity,
        galleries: Arc::clone(&galleries),
    };

    // --- Router ---
    let app = router::build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped, cleaning up");

    sweeper_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), sweeper_handle).await;

    let open = galleries.session_count().await;
    tracing::info!(open_sessions = open, "Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
