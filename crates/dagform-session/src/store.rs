//! Process-wide session store.
//!
//! Sessions live in a bounded moka cache with idle and absolute expiry, so
//! abandoned forms do not accumulate for the lifetime of the process. Each
//! entry sits behind its own async mutex: requests against one session are
//! serialized, requests against different sessions never contend.

use std::sync::Arc;
use std::time::Duration;

use dagform_common::{Owner, SessionConfig};
use moka::future::Cache;
use moka::notification::RemovalCause;
use moka::policy::EvictionPolicy;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;
use uuid::Uuid;

use crate::error::{Result, SessionError};
use crate::session::Session;

pub type SessionHandle = Arc<Mutex<Session>>;

/// Eviction policy. `None` disables the corresponding expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPolicy {
    pub idle_timeout: Option<Duration>,
    pub max_lifetime: Option<Duration>,
    pub max_sessions: u64,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self::from(&SessionConfig::default())
    }
}

impl From<&SessionConfig> for SessionPolicy {
    fn from(config: &SessionConfig) -> Self {
        let secs = |s: u64| (s > 0).then(|| Duration::from_secs(s));
        Self {
            idle_timeout: secs(config.idle_timeout_secs),
            max_lifetime: secs(config.max_lifetime_secs),
            max_sessions: config.max_sessions,
        }
    }
}

#[derive(Clone)]
pub struct SessionStore {
    cache: Cache<Uuid, SessionHandle>,
    policy: SessionPolicy,
}

impl SessionStore {
    pub fn new(policy: SessionPolicy) -> Self {
        let mut builder = Cache::<Uuid, SessionHandle>::builder()
            .max_capacity(policy.max_sessions)
            // a full store evicts its least recently used session, never the new one
            .eviction_policy(EvictionPolicy::lru())
            .eviction_listener(|id: Arc<Uuid>, _session: SessionHandle, cause: RemovalCause| {
                if cause.was_evicted() {
                    debug!(session_id = %id, ?cause, "session evicted");
                }
            });
        if let Some(idle) = policy.idle_timeout {
            builder = builder.time_to_idle(idle);
        }
        if let Some(lifetime) = policy.max_lifetime {
            builder = builder.time_to_live(lifetime);
        }

        Self { cache: builder.build(), policy }
    }

    pub fn policy(&self) -> &SessionPolicy {
        &self.policy
    }

    /// Allocate a fresh session and return its id.
    pub async fn create(&self, owner: Owner) -> Uuid {
        let id = Uuid::new_v4();
        self.cache
            .insert(id, Arc::new(Mutex::new(Session::new(id, owner))))
            .await;
        debug!(session_id = %id, "session created");
        id
    }

    /// Clone of the current session state.
    pub async fn get(&self, id: &str) -> Result<Session> {
        let handle = self.handle(id).await?;
        let session = handle.lock().await;
        Ok(session.clone())
    }

    /// Run `mutator` with exclusive access to the session.
    pub async fn update<F, R>(&self, id: &str, mutator: F) -> Result<R>
    where
        F: FnOnce(&mut Session) -> Result<R>,
    {
        let handle = self.handle(id).await?;
        let mut session = handle.lock().await;
        mutator(&mut session)
    }

    /// Exclusive access held across awaits, e.g. while a snapshot is persisted.
    pub async fn lock(&self, id: &str) -> Result<OwnedMutexGuard<Session>> {
        Ok(self.handle(id).await?.lock_owned().await)
    }

    pub async fn remove(&self, id: &str) -> bool {
        match Uuid::parse_str(id) {
            Ok(uuid) => self.cache.remove(&uuid).await.is_some(),
            Err(_) => false,
        }
    }

    /// Number of live sessions, after pending expirations are applied.
    pub async fn len(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn handle(&self, id: &str) -> Result<SessionHandle> {
        let uuid = Uuid::parse_str(id.trim()).map_err(|_| SessionError::NotFound(id.to_string()))?;
        self.cache
            .get(&uuid)
            .await
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dagform_graph::AddOutcome;
    use dagform_graph::SpringRenderer;

    fn owner() -> Owner {
        Owner {
            name: "Grace".to_string(),
            position: "Engineer".to_string(),
            email: "grace@example.org".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_get_update() {
        let store = SessionStore::new(SessionPolicy::default());
        let id = store.create(owner()).await.to_string();

        store
            .update(&id, |s| s.set_variables(vec!["A".into(), "B".into()]))
            .await
            .unwrap();

        let session = store.get(&id).await.unwrap();
        assert_eq!(session.owner().name, "Grace");
        assert_eq!(session.graph().variables(), &["A", "B"]);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_and_malformed_ids() {
        let store = SessionStore::new(SessionPolicy::default());
        let missing = Uuid::new_v4().to_string();
        assert_eq!(store.get(&missing).await.unwrap_err(), SessionError::NotFound(missing.clone()));
        assert!(matches!(store.get("not-a-uuid").await, Err(SessionError::NotFound(_))));
        assert!(!store.remove("not-a-uuid").await);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = SessionStore::new(SessionPolicy::default());
        let renderer = SpringRenderer::default();
        let a = store.create(owner()).await.to_string();
        let b = store.create(owner()).await.to_string();
        assert_ne!(a, b);

        for id in [&a, &b] {
            store
                .update(id, |s| s.set_variables(vec!["X".into(), "Y".into()]))
                .await
                .unwrap();
        }
        let update = store
            .update(&a, |s| s.add_dependency("X", "Y", &renderer))
            .await
            .unwrap();
        assert_eq!(update.outcome, AddOutcome::Accepted);

        assert_eq!(store.get(&a).await.unwrap().graph().edge_count(), 1);
        assert_eq!(store.get(&b).await.unwrap().graph().edge_count(), 0);
    }

    #[tokio::test]
    async fn test_idle_sessions_expire() {
        let store = SessionStore::new(SessionPolicy {
            idle_timeout: Some(Duration::from_millis(50)),
            max_lifetime: None,
            max_sessions: 10,
        });
        let id = store.create(owner()).await.to_string();
        assert!(store.get(&id).await.is_ok());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(matches!(store.get(&id).await, Err(SessionError::NotFound(_))));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_lock_serializes_access() {
        let store = SessionStore::new(SessionPolicy::default());
        let id = store.create(owner()).await.to_string();

        let guard = store.lock(&id).await.unwrap();
        let contender = {
            let store = store.clone();
            let id = id.clone();
            tokio::spawn(async move {
                store.update(&id, |s| s.set_variables(vec!["late".into()])).await
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());
        assert!(guard.graph().variables().is_empty());
        drop(guard);

        contender.await.unwrap().unwrap();
        assert_eq!(store.get(&id).await.unwrap().graph().variables(), &["late"]);
    }

    #[tokio::test]
    async fn test_full_store_admits_new_sessions() {
        let store = SessionStore::new(SessionPolicy {
            idle_timeout: None,
            max_lifetime: None,
            max_sessions: 3,
        });

        let mut old = Vec::new();
        for _ in 0..3 {
            let id = store.create(owner()).await.to_string();
            for _ in 0..5 {
                store.get(&id).await.unwrap();
            }
            old.push(id);
        }

        for _ in 0..5 {
            let fresh = store.create(owner()).await.to_string();
            store.cache.run_pending_tasks().await;
            assert!(store.get(&fresh).await.is_ok(), "new session dropped on admission");
        }

        assert!(store.len().await <= 3);
        let mut evicted = 0;
        for id in &old {
            if store.get(id).await.is_err() {
                evicted += 1;
            }
        }
        assert!(evicted >= 1, "capacity bound not enforced");
    }

    #[tokio::test]
    async fn test_remove() {
        let store = SessionStore::new(SessionPolicy::default());
        let id = store.create(owner()).await.to_string();
        assert!(store.remove(&id).await);
        assert!(store.get(&id).await.is_err());
    }

    #[test]
    fn test_zero_disables_expiry() {
        let policy = SessionPolicy::from(&SessionConfig {
            idle_timeout_secs: 0,
            max_lifetime_secs: 120,
            max_sessions: 5,
        });
        assert_eq!(policy.idle_timeout, None);
        assert_eq!(policy.max_lifetime, Some(Duration::from_secs(120)));
    }
}
