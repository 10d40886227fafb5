use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::cache::{ReportCache, REPORT_TTL};
use crate::models::{
    ParamSettings, RawParams, RenderedReport, ReportBody, ReportKind, ReportParams,
};
use crate::reports::builder::build;
use crate::reports::paginator::{self, Navigation, NextPagePolicy};
use crate::reports::ReportError;
use crate::source::DataSource;

#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub params: ParamSettings,
    pub next_page_policy: NextPagePolicy,
    /// Content types listed by the zero-hit report
    pub zero_hit_post_types: Vec<String>,
    pub ttl: Duration,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            params: ParamSettings::default(),
            next_page_policy: NextPagePolicy::default(),
            zero_hit_post_types: vec!["post".to_string(), "page".to_string()],
            ttl: REPORT_TTL,
        }
    }
}

/// Serves reports from the cache, computing and storing them on a miss.
///
/// Failures are never cached and are not retried.
pub struct ReportService {
    source: Arc<dyn DataSource>,
    cache: Arc<dyn ReportCache>,
    settings: ReportSettings,
}

impl ReportService {
    pub fn new(
        source: Arc<dyn DataSource>,
        cache: Arc<dyn ReportCache>,
        settings: ReportSettings,
    ) -> Self {
        Self {
            source,
            cache,
            settings,
        }
    }

    pub fn settings(&self) -> &ReportSettings {
        &self.settings
    }

    /// Render the report named `kind` (wire name, e.g. `post-type`)
    pub async fn render_named(
        &self,
        kind: &str,
        raw: &RawParams,
    ) -> Result<Arc<RenderedReport>, ReportError> {
        let kind = kind
            .parse::<ReportKind>()
            .map_err(ReportError::UnknownKind)?;
        self.render(kind, raw).await
    }

    pub async fn render(
        &self,
        kind: ReportKind,
        raw: &RawParams,
    ) -> Result<Arc<RenderedReport>, ReportError> {
        let params = ReportParams::normalize(kind, raw, &self.settings.params);
        let key = params.cache_key();

        if let Some(hit) = self.cache.get(&key).await {
            debug!(%key, "report cache hit");
            return Ok(hit);
        }
        debug!(%key, "report cache miss");

        if !self.source.is_installed().await? {
            return Err(ReportError::MissingDependency);
        }

        let report = Arc::new(self.compute(params).await?);
        self.cache
            .put(&key, Arc::clone(&report), self.settings.ttl)
            .await;
        info!(%key, rows = report.body.len(), "computed report");

        Ok(report)
    }

    /// Taxonomies the term report will honour: those with terms in the store
    /// that are also on the configured allow-list.
    pub async fn taxonomies(&self) -> Result<Vec<String>, ReportError> {
        if !self.source.is_installed().await? {
            return Err(ReportError::MissingDependency);
        }
        let allowed = &self.settings.params.taxonomies;
        let found = self.source.taxonomies().await?;
        Ok(found
            .into_iter()
            .filter(|name| allowed.contains(name))
            .collect())
    }

    async fn compute(&self, params: ReportParams) -> Result<RenderedReport, ReportError> {
        let kind = params.kind();
        let policy = self.settings.next_page_policy;

        let (body, window) = match &params {
            ReportParams::Author => {
                let rows = self.source.author_rows().await?;
                (ReportBody::Aggregate(build(kind, rows)?), None)
            }
            ReportParams::Year => {
                let rows = self.source.year_rows().await?;
                (ReportBody::Aggregate(build(kind, rows)?), None)
            }
            ReportParams::PostType => {
                let rows = self.source.post_type_rows().await?;
                (ReportBody::Aggregate(build(kind, rows)?), None)
            }
            ReportParams::Term { taxonomy, page } => {
                let rows = self
                    .source
                    .term_rows(taxonomy, policy.fetch_limit(), paginator::offset(*page))
                    .await?;
                let (window, rows) = policy.apply(*page, rows);
                (ReportBody::Aggregate(build(kind, rows)?), Some(window))
            }
            ReportParams::ZeroHit { orderby, page } => {
                let items = self
                    .source
                    .zero_hits(
                        &self.settings.zero_hit_post_types,
                        *orderby,
                        policy.fetch_limit(),
                        paginator::offset(*page),
                    )
                    .await?;
                let (window, items) = policy.apply(*page, items);
                (ReportBody::ZeroHit(items), Some(window))
            }
        };

        let navigation = window
            .as_ref()
            .map(|w| Navigation::for_window(w, &params.filters()))
            .unwrap_or_default();

        Ok(RenderedReport {
            kind,
            params,
            body,
            window,
            navigation,
            generated_at: Utc::now(),
        })
    }
}
