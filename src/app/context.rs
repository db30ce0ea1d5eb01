use std::sync::Arc;

use crate::admission::DomainFilter;
use crate::app::error::Result;
use crate::cache::Cache;
use crate::config::Config;
use crate::fetcher::{Fetcher, HttpFetcher};
use crate::fulltext::{Enricher, ReadableExtractor};
use crate::normalizer::Normalizer;
use crate::pipeline::FeedProxy;

pub struct AppContext {
    pub config: Config,
    pub proxy: Arc<FeedProxy>,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::new(&config.fetcher)?);
        Self::with_fetcher(config, fetcher)
    }

    /// Wire every component around `fetcher`. The feed and article caches
    /// share one store.
    pub fn with_fetcher(config: Config, fetcher: Arc<dyn Fetcher + Send + Sync>) -> Result<Self> {
        let cache = Arc::new(Cache::memory(config.cache.max_entries));
        let filter = DomainFilter::new(config.proxy.blocked_domains.as_deref());
        let extractor = Arc::new(ReadableExtractor::new(&config.fulltext)?);
        let enricher = Enricher::new(fetcher.clone(), extractor, cache.clone(), &config.fulltext);

        let proxy = FeedProxy::new(
            filter,
            fetcher,
            Normalizer::new(),
            enricher,
            cache,
            config.proxy.default_ttl,
        );

        Ok(Self {
            config,
            proxy: Arc::new(proxy),
        })
    }
}
