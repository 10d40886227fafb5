use std::collections::HashSet;

use crate::models::{AggregateRow, RawRow, Report, ReportKind};
use crate::reports::ReportError;

/// Turn grouped source rows into a report.
///
/// Row order is kept as delivered. Negative counts from the source are
/// clamped to zero.
pub fn build(kind: ReportKind, rows: Vec<RawRow>) -> Result<Report, ReportError> {
    let mut seen = HashSet::with_capacity(rows.len());
    let mut out = Vec::with_capacity(rows.len());

    for row in rows {
        if !seen.insert(row.key.clone()) {
            return Err(ReportError::DuplicateDimension {
                kind,
                key: row.key.to_string(),
            });
        }

        let total_views = row.views.max(0) as u64;
        let distinct_content_count = row.posts.max(0) as u64;

        out.push(AggregateRow {
            dimension_key: row.key,
            dimension_label: row.label,
            slug: row.slug,
            total_views,
            distinct_content_count,
            views_per_content: views_per_content(total_views, distinct_content_count),
        });
    }

    Ok(Report { rows: out })
}

/// Views per piece of content, rounded to one decimal
pub fn views_per_content(views: u64, posts: u64) -> Option<f64> {
    if posts == 0 {
        return None;
    }
    let ratio = views as f64 / posts as f64;
    Some((ratio * 10.0).round() / 10.0)
}
