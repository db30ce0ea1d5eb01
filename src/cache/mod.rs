//! Cache used by the proxy pipeline.
//!
//! Values are stored as JSON snapshots in a bounded [`moka`] cache.
//! [`Cache::try_get`] computes on a miss and runs at most one computation
//! per key at a time; concurrent callers for the same key wait for it and
//! share its result. Failed computations are never stored.
//!
//! Freshness is judged against [`tokio::time::Instant`], so TTLs follow the
//! runtime clock. moka's own per-entry expiry reclaims the memory.

mod config;

pub use config::CacheConfig;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use moka::Expiry;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::app::{Result, RssProxyError};

/// Longest lifetime an entry can be given; larger TTLs are clamped.
pub const MAX_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

#[derive(Debug, Clone)]
struct Snapshot {
    json: Arc<str>,
    ttl: Duration,
    expires_at: Instant,
}

impl Snapshot {
    fn new(json: String, ttl: Duration) -> Self {
        let ttl = ttl.min(MAX_TTL);
        Self {
            json: json.into(),
            ttl,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_live(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

struct SnapshotExpiry;

impl Expiry<String, Snapshot> for SnapshotExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Snapshot,
        _created_at: std::time::Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Snapshot,
        _updated_at: std::time::Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

pub struct Cache {
    entries: moka::future::Cache<String, Snapshot>,
}

impl Cache {
    /// In-memory cache holding at most `max_entries` values.
    pub fn memory(max_entries: usize) -> Self {
        let entries = moka::future::Cache::builder()
            .max_capacity(max_entries.max(1) as u64)
            .expire_after(SnapshotExpiry)
            .build();
        Self { entries }
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let snapshot = self.live_snapshot(key).await?;
        match serde_json::from_str(&snapshot.json) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Discarding undecodable cache entry {}: {}", key, e);
                self.entries.invalidate(key).await;
                None
            }
        }
    }

    /// Store `value` under `key` for `ttl`, clamped to [`MAX_TTL`].
    pub async fn set<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        match serde_json::to_string(value) {
            Ok(json) => {
                self.entries
                    .insert(key.to_string(), Snapshot::new(json, ttl))
                    .await
            }
            Err(e) => warn!("Failed to serialize cache entry {}: {}", key, e),
        }
    }

    /// Return the cached value for `key`, or run `compute` and store its
    /// result for `ttl`. Errors from `compute` are returned and not cached.
    pub async fn try_get<T, F, Fut>(&self, key: &str, ttl: Duration, compute: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(value) = self.get(key).await {
            debug!("Cache hit for {}", key);
            return Ok(value);
        }

        let init = async {
            debug!("Cache miss for {}", key);
            let value = compute().await?;
            let json = serde_json::to_string(&value)
                .map_err(|e| RssProxyError::Other(format!("Failed to encode {}: {}", key, e)))?;
            Ok::<_, RssProxyError>(Snapshot::new(json, ttl))
        };

        let snapshot = self
            .entries
            .try_get_with(key.to_string(), init)
            .await
            .map_err(|shared| Arc::try_unwrap(shared).unwrap_or_else(RssProxyError::Shared))?;

        serde_json::from_str(&snapshot.json)
            .map_err(|e| RssProxyError::Other(format!("Failed to decode {}: {}", key, e)))
    }

    /// Live entry for `key`; a stale one is dropped so the next compute
    /// replaces it.
    async fn live_snapshot(&self, key: &str) -> Option<Snapshot> {
        let snapshot = self.entries.get(key).await?;
        if snapshot.is_live() {
            Some(snapshot)
        } else {
            self.entries.invalidate(key).await;
            None
        }
    }

    #[cfg(test)]
    async fn insert_raw(&self, key: &str, json: &str, ttl: Duration) {
        self.entries
            .insert(key.to_string(), Snapshot::new(json.to_string(), ttl))
            .await;
    }

    #[cfg(test)]
    async fn entry_count(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }
}
