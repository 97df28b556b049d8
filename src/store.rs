//! Session store contract and an in-memory reference implementation.

use anyhow::Result;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::{Instrument, info_span};
use uuid::Uuid;

use crate::record::SessionRecord;

/// Server-side persistence for session records.
///
/// Implementations must serialize access per session identifier: two
/// concurrent requests on the same session (parallel tab or asset loads)
/// race on the rotation fields unless the read-decide-write sequence runs
/// atomically. Sessions are independent; no cross-session locking is
/// required. Records never reach the client; only the rotation token value
/// does, via the credential channel.
pub trait SessionStore: Send + Sync {
    /// Fetch a record by session id.
    fn load(&self, id: Uuid) -> impl std::future::Future<Output = Result<Option<SessionRecord>>> + Send;

    /// Persist a record under a session id.
    fn save(&self, id: Uuid, record: SessionRecord) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Drop a session entirely.
    fn delete(&self, id: Uuid) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// In-memory store keyed by session id.
///
/// One lock across the map is enough at this scale: the closure passed to
/// [`MemoryStore::update`] runs while the lock is held, which gives every
/// session the per-identifier atomicity the contract requires.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sessions: Mutex<HashMap<Uuid, SessionRecord>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-modify-write a record in one atomic step.
    ///
    /// Missing sessions are materialized empty so an authentication step can
    /// populate them through the same path.
    pub async fn update<F, R>(&self, id: Uuid, apply: F) -> R
    where
        F: FnOnce(&mut SessionRecord) -> R,
    {
        let span = info_span!("session.update", session.id = %id);
        async {
            let mut sessions = self.sessions.lock().await;
            let record = sessions.entry(id).or_default();
            apply(record)
        }
        .instrument(span)
        .await
    }
}

impl SessionStore for MemoryStore {
    async fn load(&self, id: Uuid) -> Result<Option<SessionRecord>> {
        let span = info_span!("session.load", session.id = %id);
        async { Ok(self.sessions.lock().await.get(&id).cloned()) }
            .instrument(span)
            .await
    }

    async fn save(&self, id: Uuid, record: SessionRecord) -> Result<()> {
        let span = info_span!("session.save", session.id = %id);
        async {
            self.sessions.lock().await.insert(id, record);
            Ok(())
        }
        .instrument(span)
        .await
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let span = info_span!("session.delete", session.id = %id);
        async {
            self.sessions.lock().await.remove(&id);
            Ok(())
        }
        .instrument(span)
        .await
    }
}
