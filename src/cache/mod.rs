//! Computed-report cache
//!
//! Reports are cached under a key derived from their normalized parameters and
//! expire passively after their ttl. There is no invalidation path: a report
//! can be up to one ttl stale. Concurrent misses on the same key may both
//! build and both store; the last write wins.

pub mod moka_cache;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;

use crate::models::RenderedReport;

pub use moka_cache::MokaReportCache;

/// Lifetime of every cached report
pub const REPORT_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub key: String,
    pub payload: Arc<RenderedReport>,
    pub created_at: DateTime<Utc>,
    pub ttl: Duration,
}

#[async_trait]
pub trait ReportCache: Send + Sync {
    /// Cached payload for `key`, if present and not yet expired
    async fn get(&self, key: &str) -> Option<Arc<RenderedReport>>;

    /// Store `payload` under `key` for `ttl`
    async fn put(&self, key: &str, payload: Arc<RenderedReport>, ttl: Duration);
}
