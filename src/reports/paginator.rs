//! Offset pagination for the term and zero-hit reports
//!
//! Pages are fixed at 25 rows. Whether a next page exists is decided by a
//! [`NextPagePolicy`]: the default looks only at whether the current page came
//! back full, which offers one empty trailing page when the total is an exact
//! multiple of 25. The probe policy asks the source for one extra row instead.

use serde::{Deserialize, Serialize};
use std::num::IntErrorKind;
use url::form_urlencoded;

pub const PAGE_SIZE: u32 = 25;

/// How `has_next` is determined
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NextPagePolicy {
    /// A full page implies a next page. Over-reports at exact multiples of the page size.
    #[default]
    FullPage,
    /// Fetch `PAGE_SIZE + 1` rows; a next page exists iff the extra row came back.
    Probe,
}

impl NextPagePolicy {
    /// Number of rows to request from the source for one page
    pub fn fetch_limit(&self) -> u32 {
        match self {
            NextPagePolicy::FullPage => PAGE_SIZE,
            NextPagePolicy::Probe => PAGE_SIZE + 1,
        }
    }

    /// Derive the window for `rows` fetched under this policy, dropping the
    /// probe row if one came back.
    pub fn apply<T>(&self, page: u32, mut rows: Vec<T>) -> (PageWindow, Vec<T>) {
        match self {
            NextPagePolicy::FullPage => (window(page, rows.len()), rows),
            NextPagePolicy::Probe => {
                let has_next = rows.len() > PAGE_SIZE as usize;
                rows.truncate(PAGE_SIZE as usize);
                let mut w = window(page, rows.len());
                w.has_next = has_next;
                (w, rows)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    pub page_number: u32,
    pub page_size: u32,
    pub offset: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

/// Parse a requested page; absent, non-numeric and non-positive values become 1.
/// Pages too large for `u32` saturate.
pub fn normalize_page(raw: Option<&str>) -> u32 {
    let Some(value) = raw else {
        return 1;
    };

    match value.trim().parse::<u64>() {
        Ok(0) => 1,
        Ok(page) => u32::try_from(page).unwrap_or(u32::MAX),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => u32::MAX,
        Err(_) => 1,
    }
}

/// Offset of the first row of `page`
pub fn offset(page: u32) -> u64 {
    (u64::from(page.max(1)) - 1) * u64::from(PAGE_SIZE)
}

/// Window for `page` given how many rows the page came back with.
pub fn window(page: u32, rows_returned: usize) -> PageWindow {
    let page = page.max(1);
    PageWindow {
        page_number: page,
        page_size: PAGE_SIZE,
        offset: offset(page),
        has_next: rows_returned == PAGE_SIZE as usize,
        has_prev: page > 1,
    }
}

/// Query strings for the previous and next pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Navigation {
    pub prev: Option<String>,
    pub next: Option<String>,
}

impl Navigation {
    /// Build links carrying every filter parameter alongside the adjusted page
    pub fn for_window(window: &PageWindow, filters: &[(&str, String)]) -> Self {
        let link = |page: u32| {
            let mut serializer = form_urlencoded::Serializer::new(String::new());
            serializer.append_pair("page", &page.to_string());
            for (name, value) in filters {
                serializer.append_pair(name, value);
            }
            serializer.finish()
        };

        Self {
            prev: window.has_prev.then(|| link(window.page_number - 1)),
            next: window
                .has_next
                .then(|| link(window.page_number.saturating_add(1))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_page() {
        assert_eq!(normalize_page(None), 1);
        assert_eq!(normalize_page(Some("")), 1);
        assert_eq!(normalize_page(Some("abc")), 1);
        assert_eq!(normalize_page(Some("0")), 1);
        assert_eq!(normalize_page(Some("-4")), 1);
        assert_eq!(normalize_page(Some("3")), 3);
        assert_eq!(normalize_page(Some(" 12 ")), 12);
        assert_eq!(normalize_page(Some("4294967296")), u32::MAX);
        assert_eq!(normalize_page(Some("99999999999999999999")), u32::MAX);
        assert_eq!(normalize_page(Some("-99999999999999999999")), 1);
    }

    #[test]
    fn test_has_prev_only_after_first_page() {
        assert!(!window(1, 0).has_prev);
        assert!(!window(0, 0).has_prev);
        for page in 2..10 {
            assert!(window(page, 0).has_prev);
        }
    }

    #[test]
    fn test_second_full_page() {
        let w = window(2, 25);
        assert_eq!(w.offset, 25);
        assert!(w.has_next);
        assert!(w.has_prev);
    }

    #[test]
    fn test_short_page_has_no_next() {
        let w = window(1, 24);
        assert_eq!(w.offset, 0);
        assert!(!w.has_next);
    }

    #[test]
    fn test_full_page_policy_offers_empty_page_at_exact_multiple() {
        // 25 matching rows in total: page 1 is full, so a next page is offered
        let rows: Vec<u32> = (0..25).collect();
        let (w, rows) = NextPagePolicy::FullPage.apply(1, rows);
        assert!(w.has_next);
        assert_eq!(rows.len(), 25);

        // and the offered page is empty
        let (w, rows) = NextPagePolicy::FullPage.apply(2, Vec::<u32>::new());
        assert!(rows.is_empty());
        assert!(!w.has_next);
    }

    #[test]
    fn test_probe_policy_is_exact_at_multiple() {
        assert_eq!(NextPagePolicy::Probe.fetch_limit(), 26);

        let (w, rows) = NextPagePolicy::Probe.apply(1, (0..25).collect::<Vec<u32>>());
        assert!(!w.has_next);
        assert_eq!(rows.len(), 25);

        let (w, rows) = NextPagePolicy::Probe.apply(1, (0..26).collect::<Vec<u32>>());
        assert!(w.has_next);
        assert_eq!(rows.len(), 25);
        assert_eq!(rows.last(), Some(&24));
    }

    #[test]
    fn test_navigation_preserves_filters() {
        let w = window(2, 25);
        let nav = Navigation::for_window(&w, &[("taxonomy", "category".to_string())]);
        assert_eq!(nav.prev.as_deref(), Some("page=1&taxonomy=category"));
        assert_eq!(nav.next.as_deref(), Some("page=3&taxonomy=category"));

        let nav = Navigation::for_window(&window(1, 3), &[]);
        assert_eq!(nav, Navigation::default());
    }
}
