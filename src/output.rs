use rss::{CategoryBuilder, ChannelBuilder, GuidBuilder, ItemBuilder};

use crate::app::{Result, RssProxyError};
use crate::domain::{NormalizedFeed, NormalizedItem};

pub const RSS_CONTENT_TYPE: &str = "application/rss+xml; charset=utf-8";
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Rss,
    Json,
}

impl OutputFormat {
    /// `json` selects JSON; anything else, including nothing, is RSS.
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Rss,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Rss => RSS_CONTENT_TYPE,
            Self::Json => JSON_CONTENT_TYPE,
        }
    }

    pub fn render(&self, feed: &NormalizedFeed) -> Result<String> {
        match self {
            Self::Rss => Ok(to_rss(feed)),
            Self::Json => serde_json::to_string_pretty(feed)
                .map_err(|e| RssProxyError::Other(format!("Failed to encode feed: {}", e))),
        }
    }
}

/// Render as an RSS 2.0 document.
pub fn to_rss(feed: &NormalizedFeed) -> String {
    let items = feed.items.iter().map(to_rss_item).collect::<Vec<_>>();

    ChannelBuilder::default()
        .title(feed.title.clone())
        .link(feed.link.clone())
        .description(feed.description.clone())
        .language(feed.language.clone())
        .generator(Some(format!("rssproxy {}", env!("CARGO_PKG_VERSION"))))
        .items(items)
        .build()
        .to_string()
}

fn to_rss_item(item: &NormalizedItem) -> rss::Item {
    let categories = item
        .category
        .iter()
        .map(|name| CategoryBuilder::default().name(name.clone()).build())
        .collect::<Vec<_>>();

    let guid = (!item.guid.is_empty()).then(|| {
        GuidBuilder::default()
            .value(item.guid.clone())
            .permalink(false)
            .build()
    });

    ItemBuilder::default()
        .title(non_empty(&item.title))
        .link(non_empty(&item.link))
        .description(non_empty(&item.description))
        .author(non_empty(&item.author))
        .pub_date(item.pub_date.map(|d| d.to_rfc2822()))
        .categories(categories)
        .guid(guid)
        .build()
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample() -> NormalizedFeed {
        let mut feed = NormalizedFeed::new("https://example.com/feed.xml");
        feed.title = "Example & Co".to_string();
        feed.language = Some("en".to_string());

        let mut item = NormalizedItem::new("First", "https://example.com/1");
        item.description = "<p>Hello</p>".to_string();
        item.pub_date = Some(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());
        item.add_category("rust");
        feed.items.push(item);

        feed.items.push(NormalizedItem::new("Second", ""));
        feed
    }

    #[test]
    fn test_format_from_param() {
        assert_eq!(OutputFormat::from_param(None), OutputFormat::Rss);
        assert_eq!(OutputFormat::from_param(Some("rss")), OutputFormat::Rss);
        assert_eq!(OutputFormat::from_param(Some("JSON")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_param(Some("atom")), OutputFormat::Rss);
    }

    #[test]
    fn test_rss_output_parses_back() {
        let xml = to_rss(&sample());
        let channel = rss::Channel::read_from(xml.as_bytes()).unwrap();

        assert_eq!(channel.title(), "Example & Co");
        assert_eq!(channel.language(), Some("en"));
        assert_eq!(channel.items().len(), 2);

        let first = &channel.items()[0];
        assert_eq!(first.title(), Some("First"));
        assert_eq!(first.description(), Some("<p>Hello</p>"));
        let published = chrono::DateTime::parse_from_rfc2822(first.pub_date().unwrap()).unwrap();
        assert_eq!(published, Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());
        assert_eq!(first.categories()[0].name(), "rust");
        let guid = first.guid().unwrap();
        assert_eq!(guid.value(), "https://example.com/1");
        assert!(!guid.is_permalink());

        let second = &channel.items()[1];
        assert!(second.link().is_none());
        assert!(second.guid().is_none());
    }

    #[test]
    fn test_json_output_uses_item_key() {
        let body = OutputFormat::Json.render(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();

        assert_eq!(value["title"], "Example & Co");
        assert_eq!(value["item"][0]["link"], "https://example.com/1");
        assert_eq!(value["item"][0]["category"][0], "rust");
        assert!(value["item"][0]["pubDate"].is_string());
    }
}
