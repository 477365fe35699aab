//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and the in-memory store of page sessions.

use crate::config::Config;
use chrono::Utc;
use genui_core::{ports::ClipboardService, Generator, Session};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sessions: SessionStore,
    pub generator: Generator,
    pub clipboard: Arc<dyn ClipboardService>,
}

//=========================================================================================
// SessionStore (One Entry Per Open Page)
//=========================================================================================

/// Holds the live sessions. Nothing here outlives the process.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Arc<Mutex<Session>>>>>,
    idle_ttl: Duration,
}

impl SessionStore {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            idle_ttl,
        }
    }

    /// Creates a session for a freshly loaded page. Idle sessions are evicted first.
    pub async fn create(&self) -> Uuid {
        self.evict_idle().await;
        let session = Session::new();
        let id = session.id();
        self.inner
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(session)));
        info!(session = %id, "Session created");
        id
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<Mutex<Session>>> {
        self.inner.read().await.get(&id).cloned()
    }

    /// Drops a session, cancelling any generation it still has in flight.
    pub async fn remove(&self, id: Uuid) -> bool {
        let removed = self.inner.write().await.remove(&id);
        match removed {
            Some(session) => {
                session.lock().await.reset();
                info!(session = %id, "Session discarded");
                true
            }
            None => false,
        }
    }

    /// Removes sessions that have not been touched within the idle TTL.
    /// Sessions with a generation in flight are never evicted.
    pub async fn evict_idle(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.inner.write().await;

        let mut expired = Vec::new();
        for (id, session) in sessions.iter() {
            // A session locked by a running request is in use.
            if let Ok(session) = session.try_lock() {
                let idle = (now - session.last_accessed_at()).to_std().unwrap_or_default();
                if session.in_flight().is_none() && idle > self.idle_ttl {
                    expired.push(*id);
                }
            }
        }
        for id in &expired {
            sessions.remove(id);
        }
        if !expired.is_empty() {
            info!(count = expired.len(), "Evicted idle sessions");
        }
        expired.len()
    }
}
