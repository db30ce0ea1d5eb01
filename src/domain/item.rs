use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedItem {
    pub title: String,
    pub link: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pub_date: Option<DateTime<Utc>>,
    pub author: String,
    #[serde(default)]
    pub category: Vec<String>,
    pub guid: String,
}

impl NormalizedItem {
    pub fn new(title: &str, link: &str) -> Self {
        Self {
            title: title.to_string(),
            link: link.to_string(),
            description: String::new(),
            pub_date: None,
            author: String::new(),
            category: Vec::new(),
            guid: link.to_string(),
        }
    }

    /// Add a category unless it is blank or already present.
    pub fn add_category(&mut self, category: &str) {
        let category = category.trim();
        if category.is_empty() || self.category.iter().any(|c| c == category) {
            return;
        }
        self.category.push(category.to_string());
    }

    pub fn has_link(&self) -> bool {
        !self.link.is_empty()
    }
}
