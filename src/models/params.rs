use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{ReportKind, ZeroHitOrder};
use crate::reports::paginator::normalize_page;

pub const DEFAULT_TAXONOMY: &str = "post_tag";

/// Query parameters exactly as the host received them
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawParams {
    pub page: Option<String>,
    pub taxonomy: Option<String>,
    pub orderby: Option<String>,
}

/// Which taxonomies the term report may be asked about
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamSettings {
    pub taxonomies: Vec<String>,
    pub default_taxonomy: String,
}

impl Default for ParamSettings {
    fn default() -> Self {
        Self {
            taxonomies: vec![DEFAULT_TAXONOMY.to_string(), "category".to_string()],
            default_taxonomy: DEFAULT_TAXONOMY.to_string(),
        }
    }
}

/// Validated parameters; one variant per report kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ReportParams {
    Author,
    Term { taxonomy: String, page: u32 },
    Year,
    PostType,
    ZeroHit { orderby: ZeroHitOrder, page: u32 },
}

impl ReportParams {
    /// Sanitize raw request values into a parameter record.
    ///
    /// Navigation parameters are never rejected: a bad page becomes 1, an
    /// unknown taxonomy becomes the default one and an unknown sort key becomes
    /// publish-date descending.
    pub fn normalize(kind: ReportKind, raw: &RawParams, settings: &ParamSettings) -> Self {
        match kind {
            ReportKind::Author => ReportParams::Author,
            ReportKind::Year => ReportParams::Year,
            ReportKind::PostType => ReportParams::PostType,
            ReportKind::Term => ReportParams::Term {
                taxonomy: normalize_taxonomy(raw.taxonomy.as_deref(), settings),
                page: normalize_page(raw.page.as_deref()),
            },
            ReportKind::ZeroHit => ReportParams::ZeroHit {
                orderby: normalize_orderby(raw.orderby.as_deref()),
                page: normalize_page(raw.page.as_deref()),
            },
        }
    }

    pub fn kind(&self) -> ReportKind {
        match self {
            ReportParams::Author => ReportKind::Author,
            ReportParams::Term { .. } => ReportKind::Term,
            ReportParams::Year => ReportKind::Year,
            ReportParams::PostType => ReportKind::PostType,
            ReportParams::ZeroHit { .. } => ReportKind::ZeroHit,
        }
    }

    pub fn page(&self) -> Option<u32> {
        match self {
            ReportParams::Term { page, .. } | ReportParams::ZeroHit { page, .. } => Some(*page),
            _ => None,
        }
    }

    /// Cache key partitioned by every parameter that changes the result.
    ///
    /// Sanitized taxonomies never contain ':', so distinct taxonomies cannot
    /// produce the same key.
    pub fn cache_key(&self) -> String {
        match self {
            ReportParams::Term { taxonomy, page } => format!("term:{taxonomy}:{page}"),
            ReportParams::ZeroHit { orderby, page } => {
                format!("zero-hit:{}:{page}", orderby.as_str())
            }
            other => other.kind().as_str().to_string(),
        }
    }

    /// Filter parameters that navigation links must carry, minus the page
    pub fn filters(&self) -> Vec<(&'static str, String)> {
        match self {
            ReportParams::Term { taxonomy, .. } => vec![("taxonomy", taxonomy.clone())],
            ReportParams::ZeroHit { orderby, .. } => {
                vec![("orderby", orderby.as_str().to_string())]
            }
            _ => Vec::new(),
        }
    }
}

/// Lowercase and keep only `[a-z0-9_-]`, like the host's key sanitizer
pub fn sanitize_key(value: &str) -> String {
    value
        .chars()
        .map(|c| c.to_ascii_lowercase())
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

fn normalize_taxonomy(raw: Option<&str>, settings: &ParamSettings) -> String {
    let Some(raw) = raw else {
        return settings.default_taxonomy.clone();
    };

    let key = sanitize_key(raw);
    if !key.is_empty() && settings.taxonomies.iter().any(|t| *t == key) {
        return key;
    }

    debug!(taxonomy = raw, "taxonomy not allowed, using default");
    settings.default_taxonomy.clone()
}

fn normalize_orderby(raw: Option<&str>) -> ZeroHitOrder {
    match raw {
        None => ZeroHitOrder::default(),
        Some(value) => ZeroHitOrder::parse(value).unwrap_or_else(|| {
            debug!(orderby = value, "unknown sort key, using publish date");
            ZeroHitOrder::default()
        }),
    }
}
