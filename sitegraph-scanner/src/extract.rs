use crate::error::ParseError;
use scraper::{Html, Node, Selector};
use tracing::debug;
use url::Url;

const ANCHOR_SELECTOR: &str = "a[href]";

/// Elements whose text never reaches the reader.
const HIDDEN_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Turns a fetched document into raw link references and page text.
///
/// Implementations run inside worker tasks, so they must be `Send + Sync`.
/// References are returned as written in the document; the engine resolves
/// and canonicalizes them.
pub trait LinkExtractor: Send + Sync + 'static {
    fn extract_links(&self, base_url: &Url, body: &str) -> Result<Vec<String>, ParseError>;

    fn extract_text(&self, body: &str) -> String;
}

/// scraper-based extractor reading `href`s of anchor elements.
#[derive(Debug, Clone)]
pub struct HtmlLinkExtractor {
    selector: Selector,
    limit: Option<usize>,
}

impl HtmlLinkExtractor {
    pub fn new() -> Self {
        Self {
            selector: Selector::parse(ANCHOR_SELECTOR).expect("anchor selector is valid"),
            limit: None,
        }
    }

    /// Use a custom CSS selector. Matched elements must carry an `href`.
    pub fn with_selector(css: &str) -> Result<Self, ParseError> {
        let selector =
            Selector::parse(css).map_err(|_| ParseError::InvalidSelector(css.to_string()))?;
        Ok(Self {
            selector,
            limit: None,
        })
    }

    /// Take at most `limit` references per document, in document order.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }
}

impl Default for HtmlLinkExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkExtractor for HtmlLinkExtractor {
    fn extract_links(&self, base_url: &Url, body: &str) -> Result<Vec<String>, ParseError> {
        let document = Html::parse_document(body);
        let limit = self.limit.unwrap_or(usize::MAX);

        let links: Vec<String> = document
            .select(&self.selector)
            .filter_map(|element| element.value().attr("href"))
            .map(|href| href.to_string())
            .take(limit)
            .collect();

        debug!("Found {} links on {}", links.len(), base_url);
        Ok(links)
    }

    fn extract_text(&self, body: &str) -> String {
        let document = Html::parse_document(body);

        let visible = document.root_element().descendants().filter_map(|node| {
            let Node::Text(text) = node.value() else {
                return None;
            };
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .map(|el| HIDDEN_ELEMENTS.contains(&el.name()))
                    .unwrap_or(false)
            });
            (!hidden).then_some(&**text)
        });

        let mut out = String::new();
        for word in visible.flat_map(str::split_whitespace) {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(word);
        }
        out
    }
}
