// Shared in-memory site for report and export tests
#![allow(dead_code)]

use sitegraph_scanner::{
    CrawlConfig, CrawlOutcome, Crawler, FetchError, FetchedPage, Fetcher, HtmlLinkExtractor,
};
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

pub const HOST: &str = "http://site.test";

/// Pages keyed by path. Unknown paths answer 404.
#[derive(Default)]
pub struct MapSite {
    pages: HashMap<String, (&'static str, String)>,
}

impl MapSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn html(mut self, path: &str, body: &str) -> Self {
        self.pages
            .insert(path.to_string(), ("text/html", body.to_string()));
        self
    }

    pub fn plain(mut self, path: &str, body: &str) -> Self {
        self.pages
            .insert(path.to_string(), ("text/plain", body.to_string()));
        self
    }
}

impl Fetcher for MapSite {
    async fn fetch(&self, url: &Url, _timeout: Duration) -> Result<FetchedPage, FetchError> {
        let (content_type, body) = self
            .pages
            .get(url.path())
            .ok_or(FetchError::Status(404))?;
        Ok(FetchedPage {
            final_url: url.clone(),
            status_code: 200,
            content_type: Some(content_type.to_string()),
            body: body.clone(),
            response_time: Duration::from_millis(1),
        })
    }
}

/// `/` links to `/a` and `/b`, `/a` links to `/c`, `/b` is missing.
pub fn small_site() -> MapSite {
    MapSite::new()
        .html(
            "/",
            r#"<html><head><title>Home</title></head><body>
                <a href="/a">A</a> <a href="/b">B</a></body></html>"#,
        )
        .html("/a", r#"<p>Page "A", with commas</p><a href="/c">C</a>"#)
        .plain("/c", "line one\nline two")
}

pub async fn crawl(site: MapSite, max_depth: usize) -> CrawlOutcome {
    let config = CrawlConfig::new(max_depth, Duration::from_secs(10)).with_workers(1);
    Crawler::new(site, HtmlLinkExtractor::new(), config)
        .unwrap()
        .crawl(&format!("{}/", HOST))
        .await
        .unwrap()
}
