use anyhow::{bail, Result};

use crate::models::ZeroHitOrder;

/// Table names under a validated prefix.
///
/// The prefix comes from configuration, never from a request, and is the only
/// non-literal text spliced into query strings.
#[derive(Debug, Clone)]
pub struct Tables {
    prefix: String,
}

impl Tables {
    pub fn new(prefix: &str) -> Result<Self> {
        if !prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            bail!("invalid table prefix '{prefix}': only [A-Za-z0-9_] allowed");
        }
        Ok(Self {
            prefix: prefix.to_string(),
        })
    }

    pub fn posts(&self) -> String {
        format!("{}posts", self.prefix)
    }

    pub fn users(&self) -> String {
        format!("{}users", self.prefix)
    }

    pub fn terms(&self) -> String {
        format!("{}terms", self.prefix)
    }

    pub fn term_taxonomy(&self) -> String {
        format!("{}term_taxonomy", self.prefix)
    }

    pub fn term_relationships(&self) -> String {
        format!("{}term_relationships", self.prefix)
    }

    pub fn post_stats(&self) -> String {
        format!("{}koko_analytics_post_stats", self.prefix)
    }
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            prefix: "wp_".to_string(),
        }
    }
}

/// ORDER BY fragment for the zero-hit listing; content id breaks ties
pub fn zero_hit_order_sql(order: ZeroHitOrder) -> &'static str {
    match order {
        ZeroHitOrder::PublishDateDesc => "p.post_date DESC, p.ID DESC",
        ZeroHitOrder::TitleAsc => "p.post_title ASC, p.ID ASC",
    }
}
