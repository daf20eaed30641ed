use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use sitegraph_scanner::{
    CrawlConfig, CrawlOutcome, CrawlProgress, Crawler, HttpOptions, PageRecord, ScanError,
    TraversalOrder,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use url::Url;

/// Options for configuring a crawl operation
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    pub url: String,
    pub max_depth: usize,
    pub time_limit: Duration,
    pub threads: usize,
    pub order: TraversalOrder,
    pub fetch_timeout: Duration,
    pub max_links: Option<usize>,
    pub follow_mode: FollowMode,
    pub http: HttpOptions,
    pub show_progress_bars: bool,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        let config = CrawlConfig::default();
        Self {
            url: String::new(),
            max_depth: config.max_depth,
            time_limit: config.time_budget,
            threads: config.max_workers,
            order: config.order,
            fetch_timeout: config.fetch_timeout,
            max_links: config.max_links_per_page,
            follow_mode: FollowMode::Any,
            http: HttpOptions::default(),
            show_progress_bars: false,
        }
    }
}

impl CrawlOptions {
    pub fn to_config(&self) -> CrawlConfig {
        CrawlConfig::new(self.max_depth, self.time_limit)
            .with_workers(self.threads)
            .with_order(self.order)
            .with_fetch_timeout(self.fetch_timeout)
            .with_max_links_per_page(self.max_links)
            .with_same_host(matches!(self.follow_mode, FollowMode::SameHost))
    }
}

/// Which discovered links are followed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowMode {
    /// Only links on the seed's host
    SameHost,
    /// Every HTTP(S) link
    Any,
}

/// Callback for reporting crawl progress
pub type CrawlProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Extract the path component from a URL
pub fn extract_url_path(url: &str) -> String {
    Url::parse(url)
        .ok()
        .map(|u| {
            let mut path = u.path().to_string();
            if path.is_empty() {
                path.push('/');
            }
            if let Some(query) = u.query() {
                path.push('?');
                path.push_str(query);
            }
            path
        })
        .unwrap_or_else(|| url.to_string())
}

/// Run one crawl from `options.url` and return everything it produced.
pub async fn execute_crawl(
    options: CrawlOptions,
    progress_callback: Option<CrawlProgressCallback>,
) -> Result<CrawlOutcome, ScanError> {
    let config = options.to_config();

    let progress_bar = if options.show_progress_bars {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message("Starting crawl...");
        pb.enable_steady_tick(Duration::from_millis(120));
        Some(pb)
    } else {
        None
    };

    let spinner = progress_bar.clone();
    let forward = progress_callback.clone();
    let on_progress: sitegraph_scanner::ProgressCallback =
        Arc::new(move |progress: CrawlProgress| {
            let message = format!(
                "Crawling... {} pages done, {} queued, {} in flight ({} failed)",
                progress.pages_done, progress.queued, progress.in_flight, progress.failures
            );
            if let Some(ref pb) = spinner {
                pb.set_message(message.clone());
            }
            if let Some(ref callback) = forward {
                callback(message);
            }
        });

    let crawler = Crawler::http(config, &options.http)?.with_progress_callback(on_progress);

    info!(
        "Crawling {} (depth {}, {} workers, {:?} budget)",
        options.url, options.max_depth, options.threads, options.time_limit
    );

    let outcome = crawler.crawl(&options.url).await;

    if let Some(pb) = progress_bar {
        match &outcome {
            Ok(outcome) => pb.finish_with_message(format!(
                "Crawl complete! {} pages in {:.1}s{}",
                outcome.pages().len(),
                outcome.elapsed().as_secs_f64(),
                if outcome.expired() { " (time limit reached)" } else { "" }
            )),
            Err(_) => pb.finish_and_clear(),
        }
    }

    outcome
}

/// Colored terminal summary, pages grouped by host.
pub fn generate_crawl_summary(outcome: &CrawlOutcome) -> String {
    let rule = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";
    let graph = outcome.graph();

    let mut report = String::new();
    report.push_str(rule);
    report.push_str("\n\n# Summary:\n");
    report.push_str(&format!("  Seed: {}\n", outcome.seed()));
    report.push_str(&format!("  Pages fetched: {}\n", outcome.pages().len()));
    report.push_str(&format!("  Failures: {}\n", outcome.failures()));
    report.push_str(&format!("  Nodes discovered: {}\n", graph.node_count()));
    report.push_str(&format!("  Links: {}\n", graph.edge_count()));
    if outcome.expired() {
        report.push_str(&format!("  {}\n", "Time limit reached".yellow()));
    }
    report.push('\n');
    report.push_str(rule);
    report.push_str("\n\n");

    let mut by_host: BTreeMap<String, Vec<&PageRecord>> = BTreeMap::new();
    for page in outcome.pages() {
        let host = Url::parse(&page.url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| "unknown".to_string());
        by_host.entry(host).or_default().push(page);
    }

    for (host, pages) in &by_host {
        report.push_str(&format!("## {}\n", host.bold()));
        report.push_str(&format!("  {} pages\n\n", pages.len()));

        let mut pages = pages.clone();
        pages.sort_by(|a, b| a.depth.cmp(&b.depth).then_with(|| a.url.cmp(&b.url)));

        for page in pages {
            let path = extract_url_path(&page.url);
            let status = match (page.status_code, page.is_failure()) {
                (Some(code @ 200..=299), _) => code.to_string().green(),
                (Some(code @ 300..=399), _) => code.to_string().cyan(),
                (Some(code @ 400..=499), _) => code.to_string().yellow(),
                (Some(code), _) => code.to_string().red(),
                (None, true) => "ERR".red(),
                (None, false) => "---".normal(),
            };

            let mut line = format!("  {} {} (depth {})", status, path, page.depth);
            if let Some(ref content_type) = page.content_type
                && !content_type.starts_with("text/html")
            {
                line.push_str(&format!(" {}", content_type.dimmed()));
            }
            if let Some(ref error) = page.error {
                line.push_str(&format!(" {}", error.red()));
            }

            report.push_str(&line);
            report.push('\n');
        }
        report.push('\n');
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_map_to_config() {
        let options = CrawlOptions {
            url: "http://example.com".to_string(),
            max_depth: 3,
            time_limit: Duration::from_secs(30),
            threads: 4,
            order: TraversalOrder::DepthFirst,
            fetch_timeout: Duration::from_secs(5),
            max_links: Some(10),
            follow_mode: FollowMode::SameHost,
            ..Default::default()
        };

        let config = options.to_config();
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.time_budget, Duration::from_secs(30));
        assert_eq!(config.max_workers, 4);
        assert_eq!(config.order, TraversalOrder::DepthFirst);
        assert_eq!(config.fetch_timeout, Duration::from_secs(5));
        assert_eq!(config.max_links_per_page, Some(10));
        assert!(config.same_host);
    }

    #[test]
    fn test_default_options_follow_everything() {
        let options = CrawlOptions::default();
        assert_eq!(options.follow_mode, FollowMode::Any);
        assert!(!options.to_config().same_host);
        assert!(options.to_config().validate().is_ok());
    }

    #[test]
    fn test_extract_url_path() {
        assert_eq!(extract_url_path("http://example.com"), "/");
        assert_eq!(extract_url_path("http://example.com/a/b"), "/a/b");
        assert_eq!(extract_url_path("http://example.com/s?q=1"), "/s?q=1");
        assert_eq!(extract_url_path("not a url"), "not a url");
    }
}
