use std::time::Duration;

use regex::Regex;
use serde::Deserialize;
use url::Url;

use crate::app::{Result, RssProxyError};
use crate::domain::NormalizedItem;

/// Used when neither the request nor the configuration gives a TTL.
pub const FALLBACK_TTL_SECS: u64 = 300;

/// Upper bound on any TTL, requested or configured: one year.
pub const MAX_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// Raw query parameters as received from the caller.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProxyQuery {
    pub url: Option<String>,
    pub fulltext: Option<String>,
    pub ttl: Option<String>,
    pub limit: Option<String>,
    pub filter: Option<String>,
    pub format: Option<String>,
}

impl ProxyQuery {
    pub fn for_url(url: &str) -> Self {
        Self {
            url: Some(url.to_string()),
            ..Default::default()
        }
    }
}

/// Keeps items whose title or description matches a regular expression.
#[derive(Debug, Clone)]
pub struct ItemFilter(Regex);

impl ItemFilter {
    pub fn new(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(Self)
            .map_err(|e| RssProxyError::InvalidFilter(e.to_string()))
    }

    pub fn matches(&self, item: &NormalizedItem) -> bool {
        self.0.is_match(&item.title) || self.0.is_match(&item.description)
    }
}

/// A validated request for one feed.
#[derive(Debug, Clone)]
pub struct FeedRequest {
    pub feed_url: Url,
    pub fulltext: bool,
    pub ttl: Duration,
    pub limit: Option<usize>,
    pub filter: Option<ItemFilter>,
}

impl FeedRequest {
    /// Validate `query`. Admission is checked separately by the caller.
    pub fn from_query(query: &ProxyQuery, default_ttl: Option<u64>) -> Result<Self> {
        let raw = query
            .url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(RssProxyError::MissingUrl)?;

        let feed_url = Url::parse(raw).map_err(|e| RssProxyError::InvalidUrl(e.to_string()))?;
        if feed_url.host_str().is_none() {
            return Err(RssProxyError::InvalidUrl(format!("{} has no host", raw)));
        }

        Ok(Self {
            feed_url,
            fulltext: query.fulltext.as_deref() == Some("true"),
            ttl: Duration::from_secs(resolve_ttl(query.ttl.as_deref(), default_ttl)),
            limit: parse_positive(query.limit.as_deref()).map(|l| l as usize),
            filter: query
                .filter
                .as_deref()
                .filter(|f| !f.is_empty())
                .map(ItemFilter::new)
                .transpose()?,
        })
    }

    pub fn hostname(&self) -> &str {
        self.feed_url.host_str().unwrap_or_default()
    }

    /// Key of the whole-feed cache entry; fulltext and plain variants are
    /// stored separately.
    pub fn cache_key(&self) -> String {
        format!("rssproxy:{}:{}", self.feed_url, self.fulltext)
    }
}

/// Explicit TTL if positive, else the configured default if positive, else
/// [`FALLBACK_TTL_SECS`]. Capped at [`MAX_TTL_SECS`].
pub fn resolve_ttl(requested: Option<&str>, default_ttl: Option<u64>) -> u64 {
    parse_positive(requested)
        .or(default_ttl.filter(|t| *t > 0))
        .unwrap_or(FALLBACK_TTL_SECS)
        .min(MAX_TTL_SECS)
}

fn parse_positive(value: Option<&str>) -> Option<u64> {
    value
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|v| *v > 0)
}
