use feed_rs::model::{Entry, Feed, FeedType, Link};
use html_escape::decode_html_entities;

/// Feed as handed over by the parser, before normalization.
#[derive(Debug, Clone, Default)]
pub struct SourceFeed {
    pub title: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
    pub items: Vec<SourceItem>,
}

/// One upstream entry with every body variant kept separately.
#[derive(Debug, Clone, Default)]
pub struct SourceItem {
    pub title: Option<String>,
    pub link: Option<String>,
    /// `content:encoded` on RSS.
    pub content_encoded: Option<String>,
    /// `<content>` on Atom.
    pub content: Option<String>,
    /// Plain-text excerpt such as `media:description`.
    pub content_snippet: Option<String>,
    /// `<description>` on RSS, `<summary>` on Atom.
    pub description: Option<String>,
    pub pub_date: Option<String>,
    pub creator: Option<String>,
    pub author: Option<String>,
    pub categories: Vec<String>,
    pub guid: Option<String>,
}

impl From<Feed> for SourceFeed {
    fn from(feed: Feed) -> Self {
        let is_atom = matches!(feed.feed_type, FeedType::Atom);

        Self {
            title: feed.title.map(|t| decode_html_entities(&t.content).to_string()),
            link: pick_link(&feed.links),
            description: feed.description.map(|d| d.content),
            language: feed.language,
            items: feed
                .entries
                .into_iter()
                .map(|entry| SourceItem::from_entry(entry, is_atom))
                .collect(),
        }
    }
}

impl SourceItem {
    fn from_entry(entry: Entry, is_atom: bool) -> Self {
        let body = entry.content.and_then(|c| c.body);
        let (content_encoded, content) = if is_atom { (None, body) } else { (body, None) };

        let author = entry.authors.first();

        Self {
            title: entry.title.map(|t| decode_html_entities(&t.content).to_string()),
            link: pick_link(&entry.links),
            content_encoded,
            content,
            content_snippet: entry
                .media
                .iter()
                .find_map(|m| m.description.as_ref().map(|d| d.content.clone())),
            description: entry.summary.map(|s| s.content),
            pub_date: entry
                .published
                .or(entry.updated)
                .map(|dt| dt.to_rfc3339()),
            creator: author.map(|p| p.name.clone()),
            author: author.and_then(|p| p.email.clone()),
            categories: entry.categories.into_iter().map(|c| c.term).collect(),
            guid: Some(entry.id),
        }
    }
}

/// Prefer the alternate link; never the feed's own `rel="self"`.
fn pick_link(links: &[Link]) -> Option<String> {
    links
        .iter()
        .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
        .or_else(|| links.iter().find(|l| l.rel.as_deref() != Some("self")))
        .map(|l| l.href.clone())
}
