use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tally::api::create_api_router;
use tally::cache::MokaReportCache;
use tally::config::{Config, DatabaseBackend};
use tally::reports::ReportService;
use tally::source::{DataSource, PostgresSource, SqliteSource};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Loaded configuration");

    // Connect to the pageview store
    let db = &config.database;
    let source: Arc<dyn DataSource> = match db.backend {
        DatabaseBackend::Sqlite => {
            info!("Using SQLite pageview store: {}", db.url);
            Arc::new(SqliteSource::new(&db.url, db.max_connections, &db.table_prefix).await?)
        }
        DatabaseBackend::Postgres => {
            info!("Using PostgreSQL pageview store: {}", db.url);
            Arc::new(PostgresSource::new(&db.url, db.max_connections, &db.table_prefix).await?)
        }
    };

    if !source.is_installed().await? {
        tracing::warn!(
            "Koko Analytics tables not found under prefix '{}'; reports will be unavailable",
            db.table_prefix
        );
    }

    let cache = Arc::new(MokaReportCache::new(config.cache.max_entries));
    let reports = Arc::new(ReportService::new(
        source,
        cache,
        config.reports.to_settings(),
    ));
    info!(
        "Next page policy: {:?}, zero-hit post types: {:?}",
        config.reports.next_page_policy, config.reports.zero_hit_post_types
    );

    let router = create_api_router(reports);

    let api_addr = format!("{}:{}", config.api_server.host, config.api_server.port);
    let listener = tokio::net::TcpListener::bind(&api_addr).await?;
    info!("🚀 Report API listening on http://{}", api_addr);
    info!("   - Reports available at http://{}/api/reports/...", api_addr);

    axum::serve(listener, router).await?;

    Ok(())
}
