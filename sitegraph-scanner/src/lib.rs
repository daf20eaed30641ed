pub mod budget;
pub mod crawler;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod frontier;
pub mod graph;
pub mod normalize;
pub mod result;
pub mod visited;

pub use budget::TimeBudget;
pub use crawler::{CrawlConfig, Crawler, ProgressCallback, ResultCallback};
pub use error::{FetchError, NormalizationReject, ParseError, ScanError};
pub use extract::{HtmlLinkExtractor, LinkExtractor};
pub use fetch::{FetchedPage, Fetcher, HttpFetcher, HttpOptions};
pub use frontier::{Frontier, FrontierEntry, TraversalOrder};
pub use graph::{SiteGraph, SiteNode};
pub use result::{CrawlOutcome, CrawlProgress, PageRecord, TraversalState};
pub use visited::VisitedSet;
