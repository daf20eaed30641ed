use crate::budget::TimeBudget;
use crate::error::{FetchError, ParseError, Result, ScanError};
use crate::extract::{HtmlLinkExtractor, LinkExtractor};
use crate::fetch::{FetchedPage, Fetcher, HttpFetcher, HttpOptions};
use crate::frontier::{Frontier, FrontierEntry, TraversalOrder};
use crate::graph::SiteGraph;
use crate::normalize::{is_same_host, normalize, parse_seed};
use crate::result::{CrawlOutcome, CrawlProgress, PageRecord, TraversalState};
use crate::visited::VisitedSet;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::{self, JoinSet};
use tracing::{debug, info, trace, warn};
use url::Url;

pub type ProgressCallback = Arc<dyn Fn(CrawlProgress) + Send + Sync>;
pub type ResultCallback = Arc<dyn Fn(&PageRecord) + Send + Sync>;

/// Bounds and knobs for one traversal.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Entries deeper than this are never expanded.
    pub max_depth: usize,
    pub time_budget: Duration,
    pub max_workers: usize,
    pub order: TraversalOrder,
    /// Hard bound on a single fetch.
    pub fetch_timeout: Duration,
    pub max_links_per_page: Option<usize>,
    /// Only follow links on the seed's host and its subdomains.
    pub same_host: bool,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_depth: 2,
            time_budget: Duration::from_secs(60),
            max_workers: 10,
            order: TraversalOrder::BreadthFirst,
            fetch_timeout: Duration::from_secs(10),
            max_links_per_page: None,
            same_host: false,
        }
    }
}

impl CrawlConfig {
    pub fn new(max_depth: usize, time_budget: Duration) -> Self {
        Self {
            max_depth,
            time_budget,
            ..Default::default()
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.max_workers = workers;
        self
    }

    pub fn with_order(mut self, order: TraversalOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_max_links_per_page(mut self, limit: Option<usize>) -> Self {
        self.max_links_per_page = limit;
        self
    }

    pub fn with_same_host(mut self, same_host: bool) -> Self {
        self.same_host = same_host;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_workers == 0 {
            return Err(ScanError::InvalidConfig(
                "worker pool size must be at least 1".to_string(),
            ));
        }
        if self.time_budget.is_zero() {
            return Err(ScanError::InvalidConfig(
                "time budget must be positive".to_string(),
            ));
        }
        if self.fetch_timeout.is_zero() {
            return Err(ScanError::InvalidConfig(
                "fetch timeout must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// What a worker task hands back to the engine loop.
struct TaskReport {
    entry: FrontierEntry,
    outcome: std::result::Result<Expansion, FetchError>,
}

struct Expansion {
    page: FetchedPage,
    links: Vec<String>,
    text: String,
    parse_error: Option<ParseError>,
}

/// Mutable crawl state. Only the engine loop touches it.
struct Traversal {
    frontier: Frontier,
    visited: VisitedSet,
    graph: SiteGraph,
    pages: Vec<PageRecord>,
    failures: usize,
    scope: Option<String>,
}

impl Traversal {
    fn start(seed: &Url, order: TraversalOrder, scope: Option<String>) -> Self {
        let mut traversal = Self {
            frontier: Frontier::new(order),
            visited: VisitedSet::new(),
            graph: SiteGraph::new(),
            pages: Vec::new(),
            failures: 0,
            scope,
        };
        traversal.visited.try_claim(seed.as_str());
        traversal.graph.add_node(seed.as_str(), 0);
        traversal.frontier.push(FrontierEntry::new(seed.clone(), 0));
        traversal
    }

    /// Merge a finished task into the graph and frontier.
    fn record(&mut self, report: TaskReport) {
        let TaskReport { entry, outcome } = report;
        let parent = entry.url.as_str();

        let record = match outcome {
            Ok(expansion) => {
                if let Some(err) = &expansion.parse_error {
                    debug!("No links taken from {}: {}", parent, err);
                }
                let child_depth = entry.depth + 1;
                for raw in &expansion.links {
                    let link = match normalize(&expansion.page.final_url, raw) {
                        Ok(link) => link,
                        Err(reason) => {
                            trace!("Discarding '{}' on {}: {}", raw, parent, reason);
                            continue;
                        }
                    };
                    if let Some(host) = &self.scope
                        && !is_same_host(&link, host)
                    {
                        trace!("Out of scope: {}", link);
                        continue;
                    }
                    if self.visited.try_claim(link.as_str()) {
                        self.graph.add_edge(parent, link.as_str(), child_depth);
                        self.frontier.push(FrontierEntry::new(link, child_depth));
                    }
                }

                let mut record = PageRecord::new(parent.to_string(), entry.depth, expansion.text);
                record.status_code = Some(expansion.page.status_code);
                record.content_type = expansion.page.content_type;
                record.links_found = expansion.links.len();
                record.response_time = expansion.page.response_time;
                record
            }
            Err(err) => {
                warn!("Crawl error for {}: {}", parent, err);
                self.failures += 1;
                let mut record = PageRecord::with_error(parent.to_string(), entry.depth, err.to_string());
                if let FetchError::Status(code) = err {
                    record.status_code = Some(code);
                }
                record
            }
        };

        self.pages.push(record);
    }
}

/// Depth- and time-bounded site traversal over a bounded pool of fetch tasks.
///
/// The engine loop owns the frontier, the visited set and the graph. Worker
/// tasks only fetch and extract; everything they find is merged back on the
/// loop, so claim order decides which parent gets the edge to a shared child.
pub struct Crawler<F = HttpFetcher, E = HtmlLinkExtractor> {
    fetcher: Arc<F>,
    extractor: Arc<E>,
    config: CrawlConfig,
    deadline: Option<Instant>,
    progress_callback: Option<ProgressCallback>,
    result_callback: Option<ResultCallback>,
}

impl Crawler<HttpFetcher, HtmlLinkExtractor> {
    /// Crawler backed by reqwest and scraper.
    pub fn http(config: CrawlConfig, options: &HttpOptions) -> Result<Self> {
        let extractor = HtmlLinkExtractor::new().with_limit(config.max_links_per_page);
        Self::new(HttpFetcher::with_options(options)?, extractor, config)
    }
}

impl<F: Fetcher, E: LinkExtractor> Crawler<F, E> {
    pub fn new(fetcher: F, extractor: E, config: CrawlConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            fetcher: Arc::new(fetcher),
            extractor: Arc::new(extractor),
            config,
            deadline: None,
            progress_callback: None,
            result_callback: None,
        })
    }

    /// Use a fixed deadline instead of starting the budget when `crawl` runs.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn with_result_callback(mut self, callback: ResultCallback) -> Self {
        self.result_callback = Some(callback);
        self
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    pub async fn crawl(&self, seed: &str) -> Result<CrawlOutcome> {
        let seed_url = parse_seed(seed).ok_or_else(|| ScanError::InvalidUrl(seed.to_string()))?;
        let started = Instant::now();
        let budget = self
            .deadline
            .map(TimeBudget::until)
            .unwrap_or_else(|| TimeBudget::new(self.config.time_budget));
        let scope = if self.config.same_host {
            seed_url.host_str().map(|h| h.to_string())
        } else {
            None
        };

        info!(
            "Starting {} crawl of {} (max depth {}, {} workers, {:?} budget)",
            self.config.order.label(),
            seed_url,
            self.config.max_depth,
            self.config.max_workers,
            budget.remaining()
        );

        let mut state = TraversalState::Idle;
        let mut traversal = Traversal::start(&seed_url, self.config.order, scope);
        transition(&mut state, TraversalState::Running);

        let mut tasks: JoinSet<TaskReport> = JoinSet::new();
        let mut in_flight: HashMap<task::Id, FrontierEntry> = HashMap::new();
        let mut expired = false;
        let mut drained = false;

        loop {
            if state == TraversalState::Running && budget.is_expired() {
                expired = true;
                transition(&mut state, TraversalState::Expired);
            }

            if state == TraversalState::Running {
                self.fill_pool(&mut traversal.frontier, &mut tasks, &mut in_flight);
            }

            if tasks.is_empty() {
                break;
            }
            if state == TraversalState::Expired {
                transition(&mut state, TraversalState::Draining);
                drained = true;
            }

            let Some(joined) = tasks.join_next_with_id().await else {
                break;
            };
            let report = match joined {
                Ok((id, report)) => {
                    in_flight.remove(&id);
                    report
                }
                Err(err) => {
                    let Some(entry) = in_flight.remove(&err.id()) else {
                        warn!("Lost track of a crawl task: {}", err);
                        continue;
                    };
                    warn!("Crawl task for {} failed: {}", entry.url, err);
                    TaskReport {
                        entry,
                        outcome: Err(FetchError::Request(format!("task failed: {}", err))),
                    }
                }
            };

            traversal.record(report);
            let Some(record) = traversal.pages.last() else {
                continue;
            };
            if let Some(callback) = &self.result_callback {
                callback(record);
            }
            if let Some(callback) = &self.progress_callback {
                callback(CrawlProgress {
                    url: record.url.clone(),
                    pages_done: traversal.pages.len(),
                    failures: traversal.failures,
                    queued: traversal.frontier.len(),
                    in_flight: tasks.len(),
                    discovered: traversal.visited.len(),
                });
            }
        }

        transition(&mut state, TraversalState::Done);
        let elapsed = started.elapsed();
        info!(
            "Crawl complete. Fetched {} pages ({} failed), {} nodes, {} edges in {:.2?}{}",
            traversal.pages.len(),
            traversal.failures,
            traversal.graph.node_count(),
            traversal.graph.edge_count(),
            elapsed,
            if expired { " (time budget expired)" } else { "" }
        );

        Ok(CrawlOutcome::new(
            seed_url.to_string(),
            traversal.graph,
            traversal.pages,
            traversal.visited,
            state,
            expired,
            drained,
            elapsed,
        ))
    }

    /// Start tasks until the pool is full or the frontier runs dry.
    fn fill_pool(
        &self,
        frontier: &mut Frontier,
        tasks: &mut JoinSet<TaskReport>,
        in_flight: &mut HashMap<task::Id, FrontierEntry>,
    ) {
        while tasks.len() < self.config.max_workers {
            let Some(entry) = frontier.pop() else {
                break;
            };
            if entry.depth > self.config.max_depth {
                trace!("Skipping {} at depth {}", entry.url, entry.depth);
                continue;
            }

            let handle = tasks.spawn(expand(
                self.fetcher.clone(),
                self.extractor.clone(),
                entry.clone(),
                self.config.fetch_timeout,
                self.config.max_links_per_page,
            ));
            in_flight.insert(handle.id(), entry);
        }
    }
}

fn transition(state: &mut TraversalState, next: TraversalState) {
    debug!("Traversal {:?} -> {:?}", state, next);
    *state = next;
}

/// Fetch one entry and pull its links and text. Runs on a worker task.
async fn expand<F: Fetcher, E: LinkExtractor>(
    fetcher: Arc<F>,
    extractor: Arc<E>,
    entry: FrontierEntry,
    timeout: Duration,
    link_limit: Option<usize>,
) -> TaskReport {
    let fetched = tokio::time::timeout(timeout, fetcher.fetch(&entry.url, timeout))
        .await
        .unwrap_or(Err(FetchError::Timeout));

    let outcome = fetched.map(|page| {
        if !page.is_html() {
            let content_type = page.content_type.clone().unwrap_or_default();
            return Expansion {
                links: Vec::new(),
                text: page.body.clone(),
                parse_error: Some(ParseError::NotHtml(content_type)),
                page,
            };
        }

        let (mut links, parse_error) = match extractor.extract_links(&page.final_url, &page.body) {
            Ok(links) => (links, None),
            Err(err) => (Vec::new(), Some(err)),
        };
        if let Some(limit) = link_limit {
            links.truncate(limit);
        }
        let text = extractor.extract_text(&page.body);

        Expansion {
            page,
            links,
            text,
            parse_error,
        }
    });

    TaskReport { entry, outcome }
}
