use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for full-text enrichment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Extracted content must be longer than this many characters to
    /// replace an item's description (default: 40)
    pub min_content_length: usize,

    /// A content selector only wins if its text is longer than this (default: 100)
    pub min_selector_text: usize,

    /// How long an extracted article stays cached, in seconds (default: 3600)
    pub cache_ttl_secs: u64,

    /// Cap on simultaneous article fetches per request (default: unbounded)
    pub max_concurrency: Option<usize>,

    /// CSS selectors to try for article content extraction, in priority order
    pub content_selectors: Vec<String>,

    /// CSS selectors for elements to remove (ads, navigation, etc.)
    pub remove_selectors: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            min_content_length: 40,
            min_selector_text: 100,
            cache_ttl_secs: 3600,
            max_concurrency: None,
            content_selectors: vec![
                // Common article content selectors in priority order
                "article".to_string(),
                "[role=\"main\"]".to_string(),
                "main".to_string(),
                ".post-content".to_string(),
                ".article-content".to_string(),
                ".entry-content".to_string(),
                ".content".to_string(),
                "#content".to_string(),
                ".post".to_string(),
                ".article".to_string(),
                ".blog-post".to_string(),
            ],
            remove_selectors: vec![
                "nav".to_string(),
                "header".to_string(),
                "footer".to_string(),
                "aside".to_string(),
                ".sidebar".to_string(),
                ".advertisement".to_string(),
                ".ad".to_string(),
                ".ads".to_string(),
                ".social-share".to_string(),
                ".comments".to_string(),
                ".related-posts".to_string(),
                "script".to_string(),
                "style".to_string(),
                "noscript".to_string(),
                "iframe".to_string(),
                "form".to_string(),
            ],
        }
    }
}

impl ExtractorConfig {
    /// Get the article cache lifetime as a Duration
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = ExtractorConfig::default();
        assert_eq!(config.min_content_length, 40);
        assert_eq!(config.min_selector_text, 100);
        assert_eq!(config.cache_ttl(), Duration::from_secs(3600));
        assert!(config.max_concurrency.is_none());
        assert_eq!(config.content_selectors[0], "article");
        assert!(config.remove_selectors.contains(&"script".to_string()));
    }

    #[test]
    fn test_partial_toml_keeps_selectors() {
        let config: ExtractorConfig =
            toml::from_str("max_concurrency = 4\ncache_ttl_secs = 60").unwrap();
        assert_eq!(config.max_concurrency, Some(4));
        assert_eq!(config.cache_ttl(), Duration::from_secs(60));
        assert!(!config.content_selectors.is_empty());
    }
}
