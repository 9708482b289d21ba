//! Session registry
//!
//! Keys [`SessionContext`]s by session id for a server hosting many users.
//! Each session sits behind its own async mutex; holding it for a whole
//! invocation serializes invocations within that session.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use crate::orchestrator::SessionContext;

/// A session shared between request handlers
pub type SharedSession = Arc<Mutex<SessionContext>>;

#[derive(Default)]
struct Sessions {
    by_id: HashMap<Uuid, SharedSession>,
    /// Creation order, oldest first
    order: VecDeque<Uuid>,
}

/// Registry of live sessions
pub struct SessionRegistry {
    sessions: RwLock<Sessions>,

    /// Maximum idle time before session expires (in seconds)
    max_idle_secs: i64,

    /// Maximum number of live sessions
    max_sessions: usize,
}

impl SessionRegistry {
    /// Create a new registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(Sessions::default()),
            max_idle_secs: 3600, // 1 hour default
            max_sessions: 1000,
        }
    }

    /// Configure maximum idle time
    #[must_use]
    pub fn with_max_idle_secs(mut self, secs: i64) -> Self {
        self.max_idle_secs = secs;
        self
    }

    /// Configure maximum number of sessions
    #[must_use]
    pub fn with_max_sessions(mut self, max: usize) -> Self {
        self.max_sessions = max.max(1);
        self
    }

    /// Create a new session, evicting the oldest beyond capacity
    pub async fn create_session(&self) -> (Uuid, SharedSession) {
        let context = SessionContext::new();
        let id = context.id;
        let shared = Arc::new(Mutex::new(context));

        let mut sessions = self.sessions.write().await;
        sessions.by_id.insert(id, Arc::clone(&shared));
        sessions.order.push_back(id);

        while sessions.order.len() > self.max_sessions {
            if let Some(oldest) = sessions.order.pop_front() {
                sessions.by_id.remove(&oldest);
                info!(session_id = %oldest, "Evicted oldest session");
            }
        }

        debug!(session_id = %id, "Session created");
        (id, shared)
    }

    /// Get a session by ID
    pub async fn get(&self, id: Uuid) -> Option<SharedSession> {
        let sessions = self.sessions.read().await;
        sessions.by_id.get(&id).cloned()
    }

    /// Remove a session. Returns whether it existed.
    pub async fn remove(&self, id: Uuid) -> bool {
        let mut sessions = self.sessions.write().await;
        let removed = sessions.by_id.remove(&id).is_some();
        if removed {
            sessions.order.retain(|s| *s != id);
        }
        removed
    }

    /// Clean up expired sessions.
    ///
    /// A session that is mid-invocation is busy, not idle, and is skipped.
    pub async fn cleanup_expired(&self) -> usize {
        let expired: Vec<Uuid> = {
            let sessions = self.sessions.read().await;
            sessions
                .by_id
                .iter()
                .filter(|(_, session)| {
                    session
                        .try_lock()
                        .map(|ctx| ctx.is_expired(self.max_idle_secs))
                        .unwrap_or(false)
                })
                .map(|(id, _)| *id)
                .collect()
        };

        let mut count = 0;
        for id in expired {
            if self.remove(id).await {
                count += 1;
            }
        }
        if count > 0 {
            info!(count, "Expired idle sessions");
        }
        count
    }

    /// Get total number of active sessions
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.by_id.len()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn test_create_and_get() {
        let registry = SessionRegistry::new();
        let (id, _) = registry.create_session().await;

        let session = registry.get(id).await.unwrap();
        assert_eq!(session.lock().await.id, id);
        assert_eq!(registry.session_count().await, 1);
    }

    #[tokio::test]
    async fn test_remove() {
        let registry = SessionRegistry::new();
        let (id, _) = registry.create_session().await;

        assert!(registry.remove(id).await);
        assert!(!registry.remove(id).await);
        assert!(registry.get(id).await.is_none());
    }

    #[tokio::test]
    async fn test_max_sessions_evicts_oldest() {
        let registry = SessionRegistry::new().with_max_sessions(2);

        let (first, _) = registry.create_session().await;
        let (second, _) = registry.create_session().await;
        let (third, _) = registry.create_session().await;

        assert_eq!(registry.session_count().await, 2);
        assert!(registry.get(first).await.is_none());
        assert!(registry.get(second).await.is_some());
        assert!(registry.get(third).await.is_some());
    }

    #[tokio::test]
    async fn test_cleanup_expired() {
        let registry = SessionRegistry::new().with_max_idle_secs(60);
        let (stale, session) = registry.create_session().await;
        let (fresh, _) = registry.create_session().await;

        session
            .lock()
            .await
            .set_last_accessed_at(Utc::now() - chrono::Duration::seconds(120));

        assert_eq!(registry.cleanup_expired().await, 1);
        assert!(registry.get(stale).await.is_none());
        assert!(registry.get(fresh).await.is_some());
    }

    #[tokio::test]
    async fn test_cleanup_skips_busy_sessions() {
        let registry = SessionRegistry::new().with_max_idle_secs(60);
        let (id, session) = registry.create_session().await;

        let mut guard = session.lock().await;
        guard.set_last_accessed_at(Utc::now() - chrono::Duration::seconds(120));

        assert_eq!(registry.cleanup_expired().await, 0);
        drop(guard);
        assert_eq!(registry.cleanup_expired().await, 1);
        assert!(registry.get(id).await.is_none());
    }
}
