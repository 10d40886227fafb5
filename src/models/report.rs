use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::ReportParams;
use crate::reports::paginator::{Navigation, PageWindow};

/// The five aggregate views offered on top of the pageview store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    Author,
    Term,
    Year,
    PostType,
    ZeroHit,
}

impl ReportKind {
    pub const ALL: [ReportKind; 5] = [
        ReportKind::Author,
        ReportKind::Term,
        ReportKind::Year,
        ReportKind::PostType,
        ReportKind::ZeroHit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Author => "author",
            ReportKind::Term => "term",
            ReportKind::Year => "year",
            ReportKind::PostType => "post-type",
            ReportKind::ZeroHit => "zero-hit",
        }
    }

    /// Human label used by report indexes
    pub fn label(&self) -> &'static str {
        match self {
            ReportKind::Author => "Authors",
            ReportKind::Term => "Terms",
            ReportKind::Year => "Years",
            ReportKind::PostType => "Post types",
            ReportKind::ZeroHit => "Zero hits",
        }
    }

    /// Whether results for this kind are windowed by page
    pub fn is_paginated(&self) -> bool {
        matches!(self, ReportKind::Term | ReportKind::ZeroHit)
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Grouping value of a report row: numeric ids and years, or type names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DimensionKey {
    Id(i64),
    Name(String),
}

impl fmt::Display for DimensionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DimensionKey::Id(id) => write!(f, "{id}"),
            DimensionKey::Name(name) => f.write_str(name),
        }
    }
}

/// One grouped row as delivered by the data source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub key: DimensionKey,
    pub label: String,
    /// Only populated for term rows
    pub slug: Option<String>,
    pub views: i64,
    pub posts: i64,
}

/// One row of a computed report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub dimension_key: DimensionKey,
    pub dimension_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub total_views: u64,
    pub distinct_content_count: u64,
    /// Absent when the row has no distinct content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views_per_content: Option<f64>,
}

/// Rows ordered as the source delivered them (views descending).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub rows: Vec<AggregateRow>,
}

impl Report {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Published content that never received a pageview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZeroHitItem {
    pub id: i64,
    pub title: String,
    pub published_at: NaiveDateTime,
}

/// Sort order of the zero-hit listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZeroHitOrder {
    #[default]
    #[serde(rename = "date")]
    PublishDateDesc,
    #[serde(rename = "title")]
    TitleAsc,
}

impl ZeroHitOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZeroHitOrder::PublishDateDesc => "date",
            ZeroHitOrder::TitleAsc => "title",
        }
    }

    /// Parse a request value; anything unrecognised yields `None`
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "date" | "publish-date-desc" => Some(ZeroHitOrder::PublishDateDesc),
            "title" | "title-asc" => Some(ZeroHitOrder::TitleAsc),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "items", rename_all = "snake_case")]
pub enum ReportBody {
    Aggregate(Report),
    ZeroHit(Vec<ZeroHitItem>),
}

impl ReportBody {
    pub fn len(&self) -> usize {
        match self {
            ReportBody::Aggregate(report) => report.len(),
            ReportBody::ZeroHit(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The cached, renderable result of one report request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedReport {
    pub kind: ReportKind,
    pub params: ReportParams,
    pub body: ReportBody,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<PageWindow>,
    pub navigation: Navigation,
    pub generated_at: DateTime<Utc>,
}
