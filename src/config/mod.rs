use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::cache::REPORT_TTL;
use crate::models::{params::sanitize_key, ParamSettings, DEFAULT_TAXONOMY};
use crate::reports::{NextPagePolicy, ReportSettings};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub api_server: ServerConfig,
    pub cache: CacheConfig,
    pub reports: ReportsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub backend: DatabaseBackend,
    pub url: String,
    pub max_connections: u32,
    /// Prefix of the WordPress tables, e.g. `wp_`
    pub table_prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    Sqlite,
    Postgres,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub max_entries: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportsConfig {
    pub next_page_policy: NextPagePolicy,
    pub zero_hit_post_types: Vec<String>,
    pub taxonomies: Vec<String>,
    pub default_taxonomy: String,
}

impl ReportsConfig {
    pub fn to_settings(&self) -> ReportSettings {
        ReportSettings {
            params: ParamSettings {
                taxonomies: self.taxonomies.clone(),
                default_taxonomy: self.default_taxonomy.clone(),
            },
            next_page_policy: self.next_page_policy,
            zero_hit_post_types: self.zero_hit_post_types.clone(),
            ttl: REPORT_TTL,
        }
    }
}

/// Split a comma separated list, dropping blanks
fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_next_page_policy(value: &str) -> NextPagePolicy {
    match value.to_lowercase().as_str() {
        "full-page" | "full_page" | "fullpage" => NextPagePolicy::FullPage,
        "probe" => NextPagePolicy::Probe,
        other => {
            tracing::warn!(
                "Unknown TALLY_NEXT_PAGE_POLICY '{other}', falling back to 'full-page'. \
                 Supported values: full-page, probe"
            );
            NextPagePolicy::FullPage
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let backend_str =
            std::env::var("DATABASE_BACKEND").unwrap_or_else(|_| "sqlite".to_string());

        let backend = match backend_str.to_lowercase().as_str() {
            "postgres" | "postgresql" => DatabaseBackend::Postgres,
            _ => DatabaseBackend::Sqlite,
        };

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://./wordpress.db".to_string());

        let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?;

        let table_prefix = std::env::var("TABLE_PREFIX").unwrap_or_else(|_| "wp_".to_string());

        let api_host = std::env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let api_port = std::env::var("API_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .context("API_PORT must be a port number")?;

        let max_entries = std::env::var("TALLY_CACHE_MAX_ENTRIES")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(1000);

        let next_page_policy = std::env::var("TALLY_NEXT_PAGE_POLICY")
            .map(|v| parse_next_page_policy(&v))
            .unwrap_or_default();

        let zero_hit_post_types = std::env::var("TALLY_ZERO_HIT_POST_TYPES")
            .map(|v| parse_list(&v))
            .unwrap_or_else(|_| vec!["post".to_string(), "page".to_string()]);

        let default_taxonomy = std::env::var("TALLY_DEFAULT_TAXONOMY")
            .map(|v| sanitize_key(&v))
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_TAXONOMY.to_string());

        let mut taxonomies: Vec<String> = std::env::var("TALLY_TAXONOMIES")
            .map(|v| parse_list(&v).iter().map(|t| sanitize_key(t)).collect())
            .unwrap_or_else(|_| vec![DEFAULT_TAXONOMY.to_string(), "category".to_string()]);
        if !taxonomies.contains(&default_taxonomy) {
            taxonomies.push(default_taxonomy.clone());
        }

        Ok(Config {
            database: DatabaseConfig {
                backend,
                url: database_url,
                max_connections,
                table_prefix,
            },
            api_server: ServerConfig {
                host: api_host,
                port: api_port,
            },
            cache: CacheConfig { max_entries },
            reports: ReportsConfig {
                next_page_policy,
                zero_hit_post_types,
                taxonomies,
                default_taxonomy,
            },
        })
    }
}
