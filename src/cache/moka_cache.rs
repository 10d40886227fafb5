use async_trait::async_trait;
use chrono::Utc;
use moka::future::Cache;
use moka::Expiry;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::cache::{CacheEntry, ReportCache};
use crate::models::RenderedReport;

/// Expires each entry after its own ttl, restarting the clock on overwrite
struct EntryTtl;

impl Expiry<String, CacheEntry> for EntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CacheEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CacheEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-process report cache backed by Moka
pub struct MokaReportCache {
    entries: Cache<String, CacheEntry>,
}

impl MokaReportCache {
    pub fn new(max_entries: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_entries)
            .expire_after(EntryTtl)
            .build();

        Self { entries }
    }

    /// Full entry for `key`, including its metadata
    pub async fn entry(&self, key: &str) -> Option<CacheEntry> {
        self.entries.get(key).await
    }

    /// Approximate number of live entries
    pub async fn len(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ReportCache for MokaReportCache {
    async fn get(&self, key: &str) -> Option<Arc<RenderedReport>> {
        self.entries.get(key).await.map(|entry| entry.payload)
    }

    async fn put(&self, key: &str, payload: Arc<RenderedReport>, ttl: Duration) {
        let entry = CacheEntry {
            key: key.to_string(),
            payload,
            created_at: Utc::now(),
            ttl,
        };
        self.entries.insert(key.to_string(), entry).await;
        tracing::debug!(key, ttl_secs = ttl.as_secs(), "cached report");
    }
}
