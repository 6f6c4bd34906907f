//! Periodic cleanup of idle gallery sessions and stale token revocations.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::auth::identity::IdentityProvider;
use crate::gallery::GalleryRegistry;

/// How often the sweep runs.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Run the sweep loop until `cancel` is triggered.
///
/// Evicts gallery sessions idle for at least `ttl` and forgets revoked
/// tokens that have expired.
pub async fn run(
    galleries: Arc<GalleryRegistry>,
    identity: Arc<IdentityProvider>,
    ttl: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(
        ttl_secs = ttl.as_secs(),
        interval_secs = SWEEP_INTERVAL.as_secs(),
        "Session sweeper started"
    );

    let mut interval = tokio::time::interval(SWEEP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Session sweeper stopping");
                break;
            }
            _ = interval.tick() => {
                sweep(&galleries, &identity, ttl).await;
            }
        }
    }
}

async fn sweep(galleries: &GalleryRegistry, identity: &IdentityProvider, ttl: Duration) {
    let evicted = galleries.evict_idle(ttl).await;
    let purged = identity.purge_revoked().await;
    if evicted > 0 || purged > 0 {
        tracing::info!(evicted, purged, "Session sweep: removed idle sessions");
    } else {
        tracing::debug!("Session sweep: nothing to remove");
    }
}
