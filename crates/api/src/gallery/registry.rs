use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use muebles_core::gallery::{Gallery, GallerySnapshot, LoadTicket};
use muebles_core::project::ProjectRecord;
use muebles_core::store::{ProjectStore, StoreError};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use uuid::Uuid;

/// One gallery instance plus its idle bookkeeping.
pub struct HostedGallery {
    pub gallery: Gallery,
    last_access: Instant,
}

impl HostedGallery {
    fn new() -> Self {
        Self {
            gallery: Gallery::new(),
            last_access: Instant::now(),
        }
    }
}

/// Snapshot of a hosted gallery, tagged with its session id.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub id: Uuid,
    #[serde(flatten)]
    pub gallery: GallerySnapshot,
}

type Entry = Arc<Mutex<HostedGallery>>;

/// Every session is busy and the registry is at its limit.
#[derive(Debug, thiserror::Error)]
#[error("gallery session limit of {limit} reached")]
pub struct RegistryFull {
    pub limit: usize,
}

/// Live gallery sessions keyed by id, at most `max_sessions` at a time.
///
/// Thread-safe via interior locks; designed to be wrapped in `Arc` and
/// shared across the application. Operations on one session are
/// serialized by that session's mutex.
pub struct GalleryRegistry {
    sessions: RwLock<HashMap<Uuid, Entry>>,
    max_sessions: usize,
}

impl GalleryRegistry {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions,
        }
    }

    /// Register a new gallery in the loading state and start its load.
    ///
    /// At the limit, the least recently used idle session is dropped to make
    /// room. The returned handle completes once the load result has been
    /// applied, or discarded because the session was removed in the meantime.
    pub async fn create(
        self: &Arc<Self>,
        store: Arc<dyn ProjectStore>,
    ) -> Result<(Uuid, JoinHandle<()>), RegistryFull> {
        let id = Uuid::new_v4();
        let mut hosted = HostedGallery::new();
        let ticket = hosted.gallery.begin_load();

        let evicted = {
            let mut sessions = self.sessions.write().await;
            let evicted = if sessions.len() >= self.max_sessions {
                let oldest = sessions
                    .iter()
                    .filter_map(|(id, entry)| {
                        entry.try_lock().ok().map(|hosted| (*id, hosted.last_access))
                    })
                    .min_by_key(|(_, last_access)| *last_access)
                    .map(|(id, _)| id);
                match oldest.and_then(|old| sessions.remove_entry(&old)) {
                    Some(evicted) => Some(evicted),
                    None => {
                        return Err(RegistryFull {
                            limit: self.max_sessions,
                        })
                    }
                }
            } else {
                None
            };
            sessions.insert(id, Arc::new(Mutex::new(hosted)));
            evicted
        };

        if let Some((old_id, entry)) = evicted {
            entry.lock().await.gallery.dispose();
            tracing::info!(session_id = %old_id, "Gallery session evicted at the session limit");
        }
        tracing::debug!(session_id = %id, "Gallery session created");

        let registry = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let Some(ticket) = ticket else {
                return;
            };
            let outcome = store.list().await;
            registry.apply_load(id, ticket, outcome).await;
        });
        Ok((id, handle))
    }

    async fn apply_load(
        &self,
        id: Uuid,
        ticket: LoadTicket,
        outcome: Result<Vec<ProjectRecord>, StoreError>,
    ) -> bool {
        let Some(entry) = self.entry(id).await else {
            tracing::debug!(session_id = %id, "Gallery session gone before load finished");
            return false;
        };
        let mut hosted = entry.lock().await;
        hosted.gallery.complete_load(ticket, outcome)
    }

    async fn entry(&self, id: Uuid) -> Option<Entry> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Run `f` on the session's gallery and mark the session as used.
    ///
    /// Returns `None` if there is no such session.
    pub async fn with_session<R>(&self, id: Uuid, f: impl FnOnce(&mut Gallery) -> R) -> Option<R> {
        let entry = self.entry(id).await?;
        let mut hosted = entry.lock().await;
        hosted.last_access = Instant::now();
        Some(f(&mut hosted.gallery))
    }

    pub async fn snapshot(&self, id: Uuid) -> Option<SessionSnapshot> {
        self.with_session(id, |gallery| SessionSnapshot {
            id,
            gallery: gallery.snapshot(),
        })
        .await
    }

    /// Drop a session and dispose its gallery. Returns `false` if unknown.
    pub async fn remove(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id);
        match removed {
            Some(entry) => {
                entry.lock().await.gallery.dispose();
                tracing::debug!(session_id = %id, "Gallery session removed");
                true
            }
            None => false,
        }
    }

    /// Remove sessions idle for at least `ttl`. Sessions in use right now
    /// are skipped.
    pub async fn evict_idle(&self, ttl: Duration) -> usize {
        let expired: Vec<Uuid> = {
            let sessions = self.sessions.read().await;
            sessions
                .iter()
                .filter(|(_, entry)| {
                    entry
                        .try_lock()
                        .map(|hosted| hosted.last_access.elapsed() >= ttl)
                        .unwrap_or(false)
                })
                .map(|(id, _)| *id)
                .collect()
        };

        let mut evicted = 0;
        for id in expired {
            if self.remove(id).await {
                evicted += 1;
            }
        }
        evicted
    }

    /// Number of live sessions.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
