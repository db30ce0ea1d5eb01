//! Full-text enrichment for feed items.
//!
//! Feeds often ship only a summary. When full text is requested, each
//! item's linked page is fetched, run through a [`ContentExtractor`], and
//! the result replaces the item's description if it is long enough.
//!
//! # Architecture
//!
//! ```text
//! Item (with link) → Fetcher → bytes → (blocking pool) Html → Extractor → ArticleContent
//!                                                   ↓
//!                              cache (rssproxy:fulltext:<link>)
//! ```
//!
//! Every item is enriched independently: a failure on one article leaves
//! that item untouched and never fails the request. Parsing and extraction
//! run on the blocking pool so large pages do not stall the runtime.

mod config;
mod extractor;

pub use config::ExtractorConfig;
pub use extractor::{ContentExtractor, ReadableExtractor};

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use scraper::Html;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::app::{Result, RssProxyError};
use crate::cache::Cache;
use crate::domain::NormalizedItem;
use crate::fetcher::Fetcher;

/// Extraction result, cached per article link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleContent {
    pub title: Option<String>,
    /// The extracted article content (HTML)
    pub content: String,
    pub author: Option<String>,
}

/// Why an item kept its original description.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// The item has no link to follow.
    NoLink,
    /// Extraction succeeded but produced this many characters, not enough.
    TooShort(usize),
    /// Fetch, parse or extraction failed.
    Failed(String),
}

/// Result of enriching one item.
#[derive(Debug, Clone, PartialEq)]
pub enum EnrichOutcome {
    Enriched(NormalizedItem),
    Unchanged(NormalizedItem, SkipReason),
}

impl EnrichOutcome {
    pub fn is_enriched(&self) -> bool {
        matches!(self, Self::Enriched(_))
    }

    pub fn into_item(self) -> NormalizedItem {
        match self {
            Self::Enriched(item) | Self::Unchanged(item, _) => item,
        }
    }
}

/// Cache key for an article's extraction.
pub fn fulltext_cache_key(link: &str) -> String {
    format!("rssproxy:fulltext:{}", link)
}

pub struct Enricher {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    extractor: Arc<dyn ContentExtractor>,
    cache: Arc<Cache>,
    ttl: Duration,
    min_content_length: usize,
    semaphore: Option<Arc<Semaphore>>,
}

impl Enricher {
    pub fn new(
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        extractor: Arc<dyn ContentExtractor>,
        cache: Arc<Cache>,
        config: &ExtractorConfig,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            cache,
            ttl: config.cache_ttl(),
            min_content_length: config.min_content_length,
            semaphore: config
                .max_concurrency
                .map(|n| Arc::new(Semaphore::new(n.max(1)))),
        }
    }

    /// Enrich every item concurrently. The output has the same length and
    /// order as the input whatever order the fetches finish in.
    pub async fn enrich_all(&self, items: Vec<NormalizedItem>) -> Vec<NormalizedItem> {
        let total = items.len();
        let outcomes = join_all(items.into_iter().map(|item| self.enrich(item))).await;

        let enriched = outcomes.iter().filter(|o| o.is_enriched()).count();
        info!("Enriched {}/{} items with full text", enriched, total);

        outcomes.into_iter().map(EnrichOutcome::into_item).collect()
    }

    pub async fn enrich(&self, item: NormalizedItem) -> EnrichOutcome {
        if !item.has_link() {
            return EnrichOutcome::Unchanged(item, SkipReason::NoLink);
        }

        let key = fulltext_cache_key(&item.link);
        let article = self
            .cache
            .try_get(&key, self.ttl, || self.extract_article(&item.link))
            .await;

        match article {
            Ok(article) => self.apply(item, article),
            Err(e) => {
                warn!("Full text unavailable for {}: {}", item.link, e);
                let reason = SkipReason::Failed(e.to_string());
                EnrichOutcome::Unchanged(item, reason)
            }
        }
    }

    fn apply(&self, mut item: NormalizedItem, article: ArticleContent) -> EnrichOutcome {
        let length = article.content.chars().count();
        if length <= self.min_content_length {
            debug!("Extracted text for {} too short ({} chars)", item.link, length);
            return EnrichOutcome::Unchanged(item, SkipReason::TooShort(length));
        }

        item.description = article.content;
        if item.author.is_empty() {
            if let Some(author) = article.author.filter(|a| !a.is_empty()) {
                item.author = author;
            }
        }

        EnrichOutcome::Enriched(item)
    }

    async fn extract_article(&self, link: &str) -> Result<ArticleContent> {
        let raw = {
            let _permit = match &self.semaphore {
                Some(semaphore) => Some(
                    semaphore
                        .acquire()
                        .await
                        .map_err(|e| RssProxyError::Other(format!("Semaphore error: {}", e)))?,
                ),
                None => None,
            };
            self.fetcher.fetch(link).await?
        };

        let extractor = self.extractor.clone();
        let link = link.to_string();
        tokio::task::spawn_blocking(move || {
            let document = Html::parse_document(&String::from_utf8_lossy(&raw));
            extractor.extract(&link, document)
        })
        .await
        .map_err(|e| RssProxyError::Other(format!("Extraction task failed: {}", e)))?
    }
}
