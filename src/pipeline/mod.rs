//! Request pipeline: admission → cached fetch/normalize → optional full text.

mod request;

pub use request::{
    resolve_ttl, FeedRequest, ItemFilter, ProxyQuery, FALLBACK_TTL_SECS, MAX_TTL_SECS,
};

use std::sync::Arc;

use tracing::{info, warn};

use crate::admission::DomainFilter;
use crate::app::{Result, RssProxyError};
use crate::cache::Cache;
use crate::domain::NormalizedFeed;
use crate::fetcher::Fetcher;
use crate::fulltext::Enricher;
use crate::normalizer::Normalizer;

pub struct FeedProxy {
    filter: DomainFilter,
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    normalizer: Normalizer,
    enricher: Enricher,
    cache: Arc<Cache>,
    default_ttl: Option<u64>,
}

impl FeedProxy {
    pub fn new(
        filter: DomainFilter,
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        normalizer: Normalizer,
        enricher: Enricher,
        cache: Arc<Cache>,
        default_ttl: Option<u64>,
    ) -> Self {
        Self {
            filter,
            fetcher,
            normalizer,
            enricher,
            cache,
            default_ttl,
        }
    }

    pub fn filter(&self) -> &DomainFilter {
        &self.filter
    }

    /// Validate `query` and serve the feed it names. `filter` and `limit`
    /// shape the response only; the cached entry is always the whole feed.
    pub async fn handle(&self, query: &ProxyQuery) -> Result<NormalizedFeed> {
        let request = self.admit(query)?;
        let mut feed = self.load(&request).await?;

        if let Some(filter) = &request.filter {
            feed.items.retain(|item| filter.matches(item));
        }
        if let Some(limit) = request.limit {
            feed.truncate(limit);
        }
        Ok(feed)
    }

    /// Parse the query and run the admission filter on its host.
    pub fn admit(&self, query: &ProxyQuery) -> Result<FeedRequest> {
        let request = FeedRequest::from_query(query, self.default_ttl)?;

        let hostname = request.hostname();
        if let Some(reason) = self.filter.check(hostname) {
            warn!("Rejected feed host {} ({})", hostname, reason);
            return Err(RssProxyError::BlockedDomain(hostname.to_string()));
        }

        Ok(request)
    }

    /// Return the cached feed for `request`, building it on a miss. With
    /// full text on, enrichment runs inside the cached computation, so a
    /// warm entry skips it entirely.
    pub async fn load(&self, request: &FeedRequest) -> Result<NormalizedFeed> {
        let key = request.cache_key();

        self.cache
            .try_get(&key, request.ttl, || async move {
                let feed_url = request.feed_url.as_str();
                let mut feed = self
                    .normalizer
                    .fetch_and_normalize(self.fetcher.as_ref(), feed_url)
                    .await
                    .inspect_err(|e| warn!("Failed to load feed {}: {}", feed_url, e))?;

                if request.fulltext {
                    feed.items = self.enricher.enrich_all(feed.items).await;
                }

                info!(
                    "Loaded {} items from {} (fulltext: {})",
                    feed.items.len(),
                    feed_url,
                    request.fulltext
                );
                Ok(feed)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fulltext::{ExtractorConfig, ReadableExtractor};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    const FEED_URL: &str = "https://example.com/feed.xml";

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Example</title>
    <link>https://example.com/</link>
    <description>Example feed</description>
    <item>
      <title>Broken</title>
      <link>https://example.com/broken</link>
      <description>Broken summary</description>
    </item>
    <item>
      <title>Working</title>
      <link>https://example.com/working</link>
      <description>Working summary</description>
    </item>
  </channel>
</rss>"#;

    const ARTICLE: &str = r#"<html><head><meta name="author" content="Ada"></head><body>
<article><p>This is the complete article body, comfortably longer than the summary it replaces and long enough for the selector.</p></article>
</body></html>"#;

    /// In-memory upstream that records every URL fetched.
    #[derive(Default)]
    struct Upstream {
        pages: HashMap<String, String>,
        log: Mutex<Vec<String>>,
    }

    impl Upstream {
        fn with_page(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), body.to_string());
            self
        }

        fn hits(&self, url: &str) -> usize {
            self.log.lock().unwrap().iter().filter(|u| *u == url).count()
        }

        fn total(&self) -> usize {
            self.log.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Fetcher for Upstream {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
            self.log.lock().unwrap().push(url.to_string());
            self.pages
                .get(url)
                .map(|p| p.as_bytes().to_vec())
                .ok_or_else(|| RssProxyError::UpstreamStatus {
                    url: url.to_string(),
                    status: 500,
                })
        }
    }

    fn proxy(upstream: Arc<Upstream>, rules: Option<&[String]>) -> FeedProxy {
        let cache = Arc::new(Cache::memory(64));
        let config = ExtractorConfig::default();
        let enricher = Enricher::new(
            upstream.clone(),
            Arc::new(ReadableExtractor::new(&config).unwrap()),
            cache.clone(),
            &config,
        );
        FeedProxy::new(
            DomainFilter::new(rules),
            upstream,
            Normalizer::new(),
            enricher,
            cache,
            None,
        )
    }

    fn query(url: &str, fulltext: bool) -> ProxyQuery {
        ProxyQuery {
            url: Some(url.to_string()),
            fulltext: fulltext.then(|| "true".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_plain_request_fetches_feed_once_without_enrichment() {
        let upstream = Arc::new(
            Upstream::default()
                .with_page(FEED_URL, FEED)
                .with_page("https://example.com/working", ARTICLE),
        );
        let proxy = proxy(upstream.clone(), None);

        let feed = proxy.handle(&query(FEED_URL, false)).await.unwrap();

        assert_eq!(feed.title, "Example");
        assert_eq!(feed.items[0].description, "Broken summary");
        assert_eq!(feed.items[1].description, "Working summary");
        assert_eq!(upstream.hits(FEED_URL), 1);
        assert_eq!(upstream.total(), 1);
    }

    #[tokio::test]
    async fn test_fulltext_isolates_failures() {
        let upstream = Arc::new(
            Upstream::default()
                .with_page(FEED_URL, FEED)
                .with_page("https://example.com/working", ARTICLE),
        );
        let proxy = proxy(upstream, None);

        let feed = proxy.handle(&query(FEED_URL, true)).await.unwrap();

        assert_eq!(feed.items.len(), 2);
        assert_eq!(feed.items[0].title, "Broken");
        assert_eq!(feed.items[0].description, "Broken summary");
        assert_eq!(feed.items[1].title, "Working");
        assert!(feed.items[1].description.contains("complete article body"));
        assert_eq!(feed.items[1].author, "Ada");
    }

    #[tokio::test]
    async fn test_warm_cache_skips_fetch_and_enrichment() {
        let upstream = Arc::new(
            Upstream::default()
                .with_page(FEED_URL, FEED)
                .with_page("https://example.com/working", ARTICLE),
        );
        let proxy = proxy(upstream.clone(), None);

        let first = proxy.handle(&query(FEED_URL, true)).await.unwrap();
        let fetched = upstream.total();
        let second = proxy.handle(&query(FEED_URL, true)).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        assert_eq!(upstream.total(), fetched);
    }

    #[tokio::test]
    async fn test_fulltext_and_plain_cached_separately() {
        let upstream = Arc::new(
            Upstream::default()
                .with_page(FEED_URL, FEED)
                .with_page("https://example.com/working", ARTICLE),
        );
        let proxy = proxy(upstream.clone(), None);

        let full = proxy.handle(&query(FEED_URL, true)).await.unwrap();
        let plain = proxy.handle(&query(FEED_URL, false)).await.unwrap();

        assert_eq!(upstream.hits(FEED_URL), 2);
        assert_ne!(full.items[1].description, plain.items[1].description);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_expiry_refetches() {
        let upstream = Arc::new(Upstream::default().with_page(FEED_URL, FEED));
        let proxy = proxy(upstream.clone(), None);

        let mut q = query(FEED_URL, false);
        q.ttl = Some("60".into());

        proxy.handle(&q).await.unwrap();
        proxy.handle(&q).await.unwrap();
        assert_eq!(upstream.hits(FEED_URL), 1);

        tokio::time::advance(Duration::from_secs(61)).await;
        proxy.handle(&q).await.unwrap();
        assert_eq!(upstream.hits(FEED_URL), 2);
    }

    #[tokio::test]
    async fn test_blocked_host_never_fetched() {
        let upstream = Arc::new(Upstream::default());
        let proxy = proxy(upstream.clone(), None);

        let err = proxy
            .handle(&query("http://192.168.1.10/feed.xml", false))
            .await
            .unwrap_err();

        assert!(matches!(err, RssProxyError::BlockedDomain(ref h) if h == "192.168.1.10"));
        assert_eq!(upstream.total(), 0);
    }

    #[tokio::test]
    async fn test_custom_rules_replace_defaults() {
        let upstream = Arc::new(Upstream::default());
        let rules = vec!["*.example.net".to_string()];
        let proxy = proxy(upstream, Some(&rules));

        let err = proxy
            .handle(&query("https://feeds.example.net/rss", false))
            .await
            .unwrap_err();
        assert!(err.is_forbidden());

        // localhost is no longer an exact rule; the fetch itself fails instead.
        let err = proxy
            .handle(&query("http://localhost/feed", false))
            .await
            .unwrap_err();
        assert!(err.is_upstream());
    }

    #[tokio::test]
    async fn test_upstream_failure_not_cached() {
        let upstream = Arc::new(Upstream::default());
        let proxy = proxy(upstream.clone(), None);

        assert!(proxy.handle(&query(FEED_URL, false)).await.is_err());
        assert!(proxy.handle(&query(FEED_URL, false)).await.is_err());
        assert_eq!(upstream.hits(FEED_URL), 2);
    }

    #[tokio::test]
    async fn test_invalid_input_is_client_error() {
        let proxy = proxy(Arc::new(Upstream::default()), None);

        let err = proxy.handle(&ProxyQuery::default()).await.unwrap_err();
        assert!(err.is_client_error());

        let err = proxy.handle(&query("::::", false)).await.unwrap_err();
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn test_limit_applied_after_cache() {
        let upstream = Arc::new(Upstream::default().with_page(FEED_URL, FEED));
        let proxy = proxy(upstream.clone(), None);

        let mut q = query(FEED_URL, false);
        q.limit = Some("1".into());
        let limited = proxy.handle(&q).await.unwrap();
        assert_eq!(limited.items.len(), 1);

        let full = proxy.handle(&query(FEED_URL, false)).await.unwrap();
        assert_eq!(full.items.len(), 2);
        assert_eq!(upstream.hits(FEED_URL), 1);
    }

    #[tokio::test]
    async fn test_filter_applied_after_cache() {
        let upstream = Arc::new(Upstream::default().with_page(FEED_URL, FEED));
        let proxy = proxy(upstream.clone(), None);

        let mut q = query(FEED_URL, false);
        q.filter = Some("^Work".into());
        let filtered = proxy.handle(&q).await.unwrap();
        assert_eq!(filtered.items.len(), 1);
        assert_eq!(filtered.items[0].title, "Working");

        q.filter = Some("summary".into());
        q.limit = Some("1".into());
        let limited = proxy.handle(&q).await.unwrap();
        assert_eq!(limited.items.len(), 1);
        assert_eq!(limited.items[0].title, "Broken");

        let full = proxy.handle(&query(FEED_URL, false)).await.unwrap();
        assert_eq!(full.items.len(), 2);
        assert_eq!(upstream.hits(FEED_URL), 1);
    }

    #[tokio::test]
    async fn test_invalid_filter_rejected_before_fetch() {
        let upstream = Arc::new(Upstream::default().with_page(FEED_URL, FEED));
        let proxy = proxy(upstream.clone(), None);

        let mut q = query(FEED_URL, false);
        q.filter = Some("[".into());
        let err = proxy.handle(&q).await.unwrap_err();

        assert!(matches!(err, RssProxyError::InvalidFilter(_)));
        assert_eq!(upstream.total(), 0);
    }

    #[tokio::test]
    async fn test_huge_ttl_is_served_and_cached() {
        let upstream = Arc::new(Upstream::default().with_page(FEED_URL, FEED));
        let proxy = proxy(upstream.clone(), None);

        let mut q = query(FEED_URL, false);
        q.ttl = Some("18446744073709551615".into());

        let first = proxy.handle(&q).await.unwrap();
        let second = proxy.handle(&q).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(upstream.hits(FEED_URL), 1);
    }
}
