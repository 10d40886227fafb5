use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tally::cache::MokaReportCache;
use tally::config::{Config, DatabaseBackend};
use tally::models::{RawParams, RenderedReport, ReportBody, ReportKind};
use tally::reports::ReportService;
use tally::source::{DataSource, PostgresSource, SqliteSource};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tally-admin")]
#[command(about = "Render pageview reports from the command line", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a report
    Report {
        /// Report kind (author, term, year, post-type, zero-hit)
        kind: String,
        /// Page number (term and zero-hit reports)
        #[arg(long)]
        page: Option<String>,
        /// Taxonomy (term report)
        #[arg(long)]
        taxonomy: Option<String>,
        /// Sort order: date or title (zero-hit report)
        #[arg(long)]
        orderby: Option<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// List the available reports
    Kinds,
    /// List taxonomies with terms
    Taxonomies,
}

fn print_report(report: &RenderedReport) {
    match &report.body {
        ReportBody::Aggregate(body) => {
            println!(
                "{:<40} {:>10} {:>8} {:>12}",
                "Name", "Views", "Posts", "Views/post"
            );
            println!("{}", "-".repeat(73));
            for row in &body.rows {
                let ratio = row
                    .views_per_content
                    .map(|r| format!("{r:.1}"))
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:<40} {:>10} {:>8} {:>12}",
                    row.dimension_label, row.total_views, row.distinct_content_count, ratio
                );
            }
        }
        ReportBody::ZeroHit(items) => {
            println!("{:<10} {:<20} {}", "ID", "Published", "Title");
            println!("{}", "-".repeat(80));
            for item in items {
                println!(
                    "{:<10} {:<20} {}",
                    item.id,
                    item.published_at.format("%Y-%m-%d %H:%M"),
                    item.title
                );
            }
        }
    }

    if let Some(window) = &report.window {
        println!();
        println!(
            "Page {} (offset {}){}{}",
            window.page_number,
            window.offset,
            if window.has_prev { ", previous page available" } else { "" },
            if window.has_next { ", next page available" } else { "" },
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let db = &config.database;
    let source: Arc<dyn DataSource> = match db.backend {
        DatabaseBackend::Sqlite => {
            Arc::new(SqliteSource::new(&db.url, db.max_connections, &db.table_prefix).await?)
        }
        DatabaseBackend::Postgres => {
            Arc::new(PostgresSource::new(&db.url, db.max_connections, &db.table_prefix).await?)
        }
    };

    let service = ReportService::new(
        source,
        Arc::new(MokaReportCache::new(config.cache.max_entries)),
        config.reports.to_settings(),
    );

    match cli.command {
        Commands::Report {
            kind,
            page,
            taxonomy,
            orderby,
            json,
        } => {
            let params = RawParams {
                page,
                taxonomy,
                orderby,
            };
            let report = service
                .render_named(&kind, &params)
                .await
                .with_context(|| format!("Failed to render '{kind}' report"))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&*report)?);
            } else {
                print_report(&report);
            }
        }
        Commands::Kinds => {
            for kind in ReportKind::ALL {
                println!("{:<12} {}", kind.as_str(), kind.label());
            }
        }
        Commands::Taxonomies => {
            let taxonomies = service.taxonomies().await?;
            if taxonomies.is_empty() {
                println!("No taxonomies found.");
            } else {
                for name in taxonomies {
                    println!("{name}");
                }
            }
        }
    }

    Ok(())
}
