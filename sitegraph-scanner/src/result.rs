use crate::graph::SiteGraph;
use crate::visited::VisitedSet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Outcome of expanding one URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRecord {
    pub url: String,
    pub depth: usize,
    /// Extracted page text; `None` when the fetch failed.
    pub raw_text: Option<String>,
    pub status_code: Option<u16>,
    pub content_type: Option<String>,
    pub links_found: usize,
    pub response_time: Duration,
    pub error: Option<String>,
}

impl PageRecord {
    pub fn new(url: String, depth: usize, raw_text: String) -> Self {
        Self {
            url,
            depth,
            raw_text: Some(raw_text),
            status_code: None,
            content_type: None,
            links_found: 0,
            response_time: Duration::from_secs(0),
            error: None,
        }
    }

    pub fn with_error(url: String, depth: usize, error: String) -> Self {
        Self {
            url,
            depth,
            raw_text: None,
            status_code: None,
            content_type: None,
            links_found: 0,
            response_time: Duration::from_secs(0),
            error: Some(error),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.raw_text.is_none()
    }
}

/// Engine lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraversalState {
    Idle,
    Running,
    /// Budget expired with fetches still in flight; their results are collected.
    Draining,
    /// Budget expired; no new fetches are started.
    Expired,
    Done,
}

/// Snapshot handed to progress callbacks after each completed page.
#[derive(Debug, Clone)]
pub struct CrawlProgress {
    pub url: String,
    pub pages_done: usize,
    pub failures: usize,
    pub queued: usize,
    pub in_flight: usize,
    pub discovered: usize,
}

/// Everything a finished traversal produced. Read-only.
#[derive(Debug)]
pub struct CrawlOutcome {
    seed: String,
    graph: SiteGraph,
    pages: Vec<PageRecord>,
    page_index: HashMap<String, usize>,
    visited: VisitedSet,
    state: TraversalState,
    expired: bool,
    drained: bool,
    elapsed: Duration,
}

impl CrawlOutcome {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        seed: String,
        graph: SiteGraph,
        pages: Vec<PageRecord>,
        visited: VisitedSet,
        state: TraversalState,
        expired: bool,
        drained: bool,
        elapsed: Duration,
    ) -> Self {
        let page_index = pages
            .iter()
            .enumerate()
            .map(|(i, page)| (page.url.clone(), i))
            .collect();
        Self {
            seed,
            graph,
            pages,
            page_index,
            visited,
            state,
            expired,
            drained,
            elapsed,
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    pub fn graph(&self) -> &SiteGraph {
        &self.graph
    }

    /// Page records in completion order.
    pub fn pages(&self) -> &[PageRecord] {
        &self.pages
    }

    pub fn page(&self, url: &str) -> Option<&PageRecord> {
        self.page_index.get(url).map(|&i| &self.pages[i])
    }

    pub fn visited(&self) -> &VisitedSet {
        &self.visited
    }

    pub fn state(&self) -> TraversalState {
        self.state
    }

    /// Whether the time budget ran out before the frontier was exhausted.
    pub fn expired(&self) -> bool {
        self.expired
    }

    /// Whether fetches were still in flight when the budget expired.
    pub fn drained(&self) -> bool {
        self.drained
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn failures(&self) -> usize {
        self.pages.iter().filter(|p| p.is_failure()).count()
    }
}
