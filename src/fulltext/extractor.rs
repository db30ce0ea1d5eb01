use scraper::{ElementRef, Html, Selector};

use crate::app::{Result, RssProxyError};
use crate::fulltext::{ArticleContent, ExtractorConfig};

/// Turns a parsed page into article content. Called on the blocking pool.
pub trait ContentExtractor: Send + Sync {
    fn extract(&self, url: &str, document: Html) -> Result<ArticleContent>;
}

const AUTHOR_META: &[&str] = &[
    "meta[name=\"author\"]",
    "meta[property=\"article:author\"]",
    "meta[name=\"dc.creator\"]",
];

const AUTHOR_TEXT: &[&str] = &["[rel=\"author\"]", ".byline", ".author"];

const TITLE_META: &[&str] = &["meta[property=\"og:title\"]", "meta[name=\"twitter:title\"]"];

/// Selector-driven readability extractor.
///
/// Drops `remove_selectors`, then returns the inner HTML of the first
/// `content_selectors` match with enough text, falling back to `<body>`.
pub struct ReadableExtractor {
    content_selectors: Vec<Selector>,
    remove_selectors: Vec<Selector>,
    author_meta: Vec<Selector>,
    author_text: Vec<Selector>,
    title_meta: Vec<Selector>,
    title: Selector,
    body: Selector,
    min_selector_text: usize,
}

impl ReadableExtractor {
    pub fn new(config: &ExtractorConfig) -> Result<Self> {
        Ok(Self {
            content_selectors: compile_all(&config.content_selectors),
            remove_selectors: compile_all(&config.remove_selectors),
            author_meta: compile_all(AUTHOR_META),
            author_text: compile_all(AUTHOR_TEXT),
            title_meta: compile_all(TITLE_META),
            title: compile("title")?,
            body: compile("body")?,
            min_selector_text: config.min_selector_text,
        })
    }

    fn find_author(&self, document: &Html) -> Option<String> {
        let from_meta = self
            .author_meta
            .iter()
            .find_map(|sel| document.select(sel).find_map(meta_content));

        from_meta.or_else(|| {
            self.author_text
                .iter()
                .find_map(|sel| document.select(sel).map(element_text).find(|t| !t.is_empty()))
        })
    }

    fn find_title(&self, document: &Html) -> Option<String> {
        self.title_meta
            .iter()
            .find_map(|sel| document.select(sel).find_map(meta_content))
            .or_else(|| {
                document
                    .select(&self.title)
                    .map(element_text)
                    .find(|t| !t.is_empty())
            })
    }

    fn strip_unwanted(&self, document: &mut Html) {
        let doomed: Vec<_> = self
            .remove_selectors
            .iter()
            .flat_map(|sel| document.select(sel).map(|el| el.id()).collect::<Vec<_>>())
            .collect();

        for id in doomed {
            if let Some(mut node) = document.tree.get_mut(id) {
                node.detach();
            }
        }
    }

    fn find_content(&self, document: &Html) -> Option<String> {
        for sel in &self.content_selectors {
            if let Some(element) = document.select(sel).next() {
                if element_text(element).chars().count() > self.min_selector_text {
                    return Some(element.inner_html());
                }
            }
        }

        document
            .select(&self.body)
            .next()
            .map(|body| body.inner_html())
    }
}

impl ContentExtractor for ReadableExtractor {
    fn extract(&self, url: &str, mut document: Html) -> Result<ArticleContent> {
        let author = self.find_author(&document);
        let title = self.find_title(&document);

        self.strip_unwanted(&mut document);

        let content = self
            .find_content(&document)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| RssProxyError::Extraction(format!("No content extracted from {}", url)))?;

        Ok(ArticleContent {
            title,
            content,
            author,
        })
    }
}

fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| RssProxyError::Config(format!("Invalid selector {:?}: {:?}", selector, e)))
}

fn compile_all<S: AsRef<str>>(selectors: &[S]) -> Vec<Selector> {
    selectors
        .iter()
        .filter_map(|s| match compile(s.as_ref()) {
            Ok(sel) => Some(sel),
            Err(e) => {
                tracing::warn!("Skipping selector: {}", e);
                None
            }
        })
        .collect()
}

fn meta_content(element: ElementRef<'_>) -> Option<String> {
    element
        .value()
        .attr("content")
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
