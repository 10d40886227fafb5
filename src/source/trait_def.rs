use async_trait::async_trait;
use thiserror::Error;

use crate::models::{RawRow, ZeroHitItem, ZeroHitOrder};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SourceResult<T> = Result<T, SourceError>;

/// Read-only access to the pageview store joined with content metadata.
///
/// Every grouped query orders by summed views descending and leaves ties in
/// whatever order the database produces.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Whether the pageview table exists
    async fn is_installed(&self) -> SourceResult<bool>;

    /// Views and content count per author
    async fn author_rows(&self) -> SourceResult<Vec<RawRow>>;

    /// Views and content count per term of `taxonomy`, one page at a time
    async fn term_rows(&self, taxonomy: &str, limit: u32, offset: u64)
        -> SourceResult<Vec<RawRow>>;

    /// Views and content count per publication year
    async fn year_rows(&self) -> SourceResult<Vec<RawRow>>;

    /// Views and content count per content type
    async fn post_type_rows(&self) -> SourceResult<Vec<RawRow>>;

    /// Published content of the given types with no pageview record at all
    async fn zero_hits(
        &self,
        post_types: &[String],
        order: ZeroHitOrder,
        limit: u32,
        offset: u64,
    ) -> SourceResult<Vec<ZeroHitItem>>;

    /// Taxonomy names that have at least one term
    async fn taxonomies(&self) -> SourceResult<Vec<String>>;
}
