use serde::{Deserialize, Serialize};

use crate::domain::NormalizedItem;

/// Title used when the upstream feed does not carry one.
pub const DEFAULT_FEED_TITLE: &str = "RSS Proxy";

/// A feed in the uniform shape served by the proxy.
///
/// Item order always matches the upstream document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedFeed {
    pub title: String,
    pub link: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(rename = "item", default)]
    pub items: Vec<NormalizedItem>,
}

impl NormalizedFeed {
    pub fn new(feed_url: &str) -> Self {
        Self {
            title: DEFAULT_FEED_TITLE.to_string(),
            link: feed_url.to_string(),
            description: String::new(),
            language: None,
            items: Vec::new(),
        }
    }

    /// Keep at most `limit` items, preserving order.
    pub fn truncate(&mut self, limit: usize) {
        self.items.truncate(limit);
    }
}
