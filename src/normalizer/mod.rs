mod source;

pub use source::{SourceFeed, SourceItem};

use feed_rs::parser;

use crate::app::{Result, RssProxyError};
use crate::datetime::parse_date;
use crate::domain::{NormalizedFeed, NormalizedItem};
use crate::fetcher::Fetcher;

#[derive(Clone)]
pub struct Normalizer;

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Fetch `feed_url` and normalize it. Any fetch or parse failure is
    /// returned as-is; nothing partial is produced.
    pub async fn fetch_and_normalize(
        &self,
        fetcher: &(dyn Fetcher + Send + Sync),
        feed_url: &str,
    ) -> Result<NormalizedFeed> {
        let body = fetcher.fetch(feed_url).await?;
        let source = self.parse(&body)?;
        let feed = self.normalize(feed_url, source);
        tracing::debug!("Normalized {} items from {}", feed.items.len(), feed_url);
        Ok(feed)
    }

    /// Parse RSS 0.9x/1.0/2.0, Atom or JSON Feed bytes.
    pub fn parse(&self, body: &[u8]) -> Result<SourceFeed> {
        // Entries without an id keep it empty so the guid falls back to the link.
        let feed = parser::Builder::new()
            .id_generator(|_links, _title, _uri| String::new())
            .build()
            .parse(body)
            .map_err(|e| RssProxyError::FeedParse(e.to_string()))?;

        Ok(SourceFeed::from(feed))
    }

    pub fn normalize(&self, feed_url: &str, source: SourceFeed) -> NormalizedFeed {
        let mut feed = NormalizedFeed::new(feed_url);

        if let Some(title) = non_empty(source.title) {
            feed.title = title;
        }
        if let Some(link) = non_empty(source.link) {
            feed.link = link;
        }
        feed.description = non_empty(source.description).unwrap_or_default();
        feed.language = non_empty(source.language);
        feed.items = source.items.into_iter().map(normalize_item).collect();

        feed
    }
}

fn normalize_item(source: SourceItem) -> NormalizedItem {
    let title = non_empty(source.title).unwrap_or_default();
    let link = non_empty(source.link).unwrap_or_default();
    let mut item = NormalizedItem::new(&title, &link);

    item.description = [
        source.content_encoded,
        source.content,
        source.content_snippet,
        source.description,
    ]
    .into_iter()
    .find_map(non_empty)
    .unwrap_or_default();

    item.pub_date = source.pub_date.as_deref().and_then(parse_date);
    item.author = non_empty(source.creator)
        .or_else(|| non_empty(source.author))
        .unwrap_or_default();

    for category in &source.categories {
        item.add_category(category);
    }

    if let Some(guid) = non_empty(source.guid) {
        item.guid = guid;
    }

    item
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
