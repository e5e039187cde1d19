//! Session architecture cache using moka
//!
//! Stores the serialized architecture of each planning session under
//! `architecture:<session_id>` with a fixed time-to-live.

use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use autodev_core::Architecture;
use moka::future::Cache;
use std::time::Duration;

/// Default session expiry (one hour)
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(3600);

/// Cache key for a session's architecture
#[inline]
#[must_use]
pub fn architecture_key(session_id: &str) -> String {
    format!("architecture:{}", session_id)
}

/// Key-value sink for serialized session values
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value
    async fn put(&self, key: String, value: String) -> StoreResult<()>;

    /// Fetch the value under `key`; expired or absent keys yield `None`
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;
}

/// Store an architecture as JSON for `session_id`
pub async fn save_architecture(
    store: &dyn SessionStore,
    session_id: &str,
    architecture: &Architecture,
) -> StoreResult<()> {
    let json = serde_json::to_string(architecture)?;
    store.put(architecture_key(session_id), json).await
}

/// Load the architecture for `session_id`, `None` on a miss
pub async fn load_architecture(
    store: &dyn SessionStore,
    session_id: &str,
) -> StoreResult<Option<Architecture>> {
    match store.get(&architecture_key(session_id)).await? {
        Some(json) => serde_json::from_str(&json)
            .map(Some)
            .map_err(StoreError::from),
        None => Ok(None),
    }
}

/// In-process TTL cache
///
/// Every entry expires a fixed time after insertion; capacity overflow evicts
/// least-recently-used sessions first.
#[derive(Debug, Clone)]
pub struct MokaSessionStore {
    inner: Cache<String, String>,
}

impl MokaSessionStore {
    /// Create store with max capacity and entry time-to-live
    #[inline]
    #[must_use]
    pub fn with_ttl(max_capacity: u64, ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Get approximate entry count
    #[inline]
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }
}

impl Default for MokaSessionStore {
    /// Store with 10,000 sessions and a one hour expiry
    fn default() -> Self {
        Self::with_ttl(10_000, DEFAULT_SESSION_TTL)
    }
}

#[async_trait]
impl SessionStore for MokaSessionStore {
    async fn put(&self, key: String, value: String) -> StoreResult<()> {
        self.inner.insert(key, value).await;
        Ok(())
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.inner.get(key).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autodev_core::{heuristic, PlanningRequest};

    fn architecture() -> Architecture {
        heuristic::generate(&PlanningRequest::new(
            "US-1",
            "s1",
            "Task Management",
            "user tasks",
        ))
    }

    #[test]
    fn key_is_prefixed() {
        assert_eq!(architecture_key("s1"), "architecture:s1");
    }

    #[tokio::test]
    async fn architecture_round_trip() {
        let store = MokaSessionStore::default();
        let arch = architecture();

        save_architecture(&store, "s1", &arch).await.unwrap();

        let loaded = load_architecture(&store, "s1").await.unwrap();
        assert_eq!(loaded, Some(arch));
        assert!(store.get("architecture:s1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn missing_session_is_none() {
        let store = MokaSessionStore::default();
        assert_eq!(load_architecture(&store, "nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn later_save_replaces_earlier() {
        let store = MokaSessionStore::default();
        let first = architecture();
        let second = heuristic::generate(&PlanningRequest::new("US-2", "s1", "Inventory", ""));

        save_architecture(&store, "s1", &first).await.unwrap();
        save_architecture(&store, "s1", &second).await.unwrap();

        assert_eq!(load_architecture(&store, "s1").await.unwrap(), Some(second));
    }

    #[tokio::test]
    async fn entries_expire_after_ttl() {
        let store = MokaSessionStore::with_ttl(100, Duration::from_millis(50));
        store.put("k".to_string(), "v".to_string()).await.unwrap();
        assert!(store.get("k").await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(store.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn corrupt_value_is_a_serialization_error() {
        let store = MokaSessionStore::default();
        store
            .put(architecture_key("bad"), "not json".to_string())
            .await
            .unwrap();

        assert!(matches!(
            load_architecture(&store, "bad").await,
            Err(StoreError::Serialization(_))
        ));
    }
}
