// Report generation from a finished crawl

use crate::error::ExportError;
use crate::export::{graph_to_dot, pages_to_csv_string};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sitegraph_scanner::{CrawlOutcome, PageRecord, SiteGraph, SiteNode};
use std::collections::HashSet;
use std::fs::File;
use std::io::Write;
use std::path::Path;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Csv,
    Dot,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "csv" => Some(ReportFormat::Csv),
            "dot" | "graphviz" => Some(ReportFormat::Dot),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
            ReportFormat::Dot => "dot",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportData {
    pub seed: String,
    pub generated_at: DateTime<Utc>,
    pub elapsed_ms: u128,
    pub expired: bool,
    pub summary: CrawlSummary,
    pub nodes: Vec<SiteNode>,
    pub edges: Vec<EdgeData>,
    pub pages: Vec<PageRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlSummary {
    pub pages_fetched: usize,
    pub failures: usize,
    pub nodes: usize,
    pub edges: usize,
    pub max_depth_reached: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeData {
    pub from: String,
    pub to: String,
}

pub fn gather_report_data(outcome: &CrawlOutcome) -> ReportData {
    let graph = outcome.graph();

    let summary = CrawlSummary {
        pages_fetched: outcome.pages().len(),
        failures: outcome.failures(),
        nodes: graph.node_count(),
        edges: graph.edge_count(),
        max_depth_reached: outcome.pages().iter().map(|p| p.depth).max().unwrap_or(0),
    };

    ReportData {
        seed: outcome.seed().to_string(),
        generated_at: Utc::now(),
        elapsed_ms: outcome.elapsed().as_millis(),
        expired: outcome.expired(),
        summary,
        nodes: graph.nodes().cloned().collect(),
        edges: graph
            .edges()
            .map(|(from, to)| EdgeData {
                from: from.to_string(),
                to: to.to_string(),
            })
            .collect(),
        pages: outcome.pages().to_vec(),
    }
}

pub fn generate_text_report(outcome: &CrawlOutcome) -> String {
    let data = gather_report_data(outcome);
    let mut report = String::new();

    report.push_str(RULE);
    report.push_str("                           SITEGRAPH CRAWL REPORT\n");
    report.push_str(RULE);
    report.push('\n');

    report.push_str(&format!("Seed:         {}\n", data.seed));
    report.push_str(&format!(
        "Generated:    {}\n",
        data.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    report.push_str(&format!(
        "Duration:     {:.2} seconds{}\n",
        data.elapsed_ms as f64 / 1000.0,
        if data.expired { " (time budget expired)" } else { "" }
    ));
    report.push_str(&format!("Pages:        {}\n", data.summary.pages_fetched));
    report.push_str(&format!("Failures:     {}\n", data.summary.failures));
    report.push_str(&format!("Nodes:        {}\n", data.summary.nodes));
    report.push_str(&format!("Links:        {}\n", data.summary.edges));
    report.push_str(&format!("Deepest page: {}\n", data.summary.max_depth_reached));
    report.push('\n');

    report.push_str(RULE);
    report.push_str("SITE MAP\n");
    report.push_str(RULE);
    report.push('\n');
    report.push_str(&generate_sitemap_tree(outcome));
    report.push('\n');

    let failed: Vec<&PageRecord> = data.pages.iter().filter(|p| p.is_failure()).collect();
    if !failed.is_empty() {
        report.push_str(RULE);
        report.push_str("FAILED PAGES\n");
        report.push_str(RULE);
        report.push('\n');
        for page in failed {
            report.push_str(&format!(
                "  ✗ {}  ({})\n",
                page.url,
                page.error.as_deref().unwrap_or("unknown error")
            ));
        }
        report.push('\n');
    }

    report.push_str(RULE);
    report.push_str("                              End of Report\n");
    report.push_str(RULE);

    report
}

pub fn generate_json_report(data: &ReportData) -> Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "sitegraph",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": data.generated_at.to_rfc3339(),
                "format": "json"
            },
            "crawl": {
                "seed": data.seed,
                "duration_ms": data.elapsed_ms,
                "expired": data.expired
            },
            "summary": data.summary,
            "graph": {
                "nodes": data.nodes,
                "edges": data.edges
            },
            "pages": data.pages
        }
    });

    serde_json::to_string_pretty(&json_report)
}

/// Render `outcome` in `format`.
pub fn render_report(outcome: &CrawlOutcome, format: ReportFormat) -> Result<String, ExportError> {
    let rendered = match format {
        ReportFormat::Text => generate_text_report(outcome),
        ReportFormat::Json => generate_json_report(&gather_report_data(outcome))?,
        ReportFormat::Csv => pages_to_csv_string(outcome.pages())?,
        ReportFormat::Dot => graph_to_dot(outcome.graph()),
    };
    Ok(rendered)
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

/// Discovery tree rooted at the seed. Each page is listed under the page
/// that first linked to it.
fn generate_sitemap_tree(outcome: &CrawlOutcome) -> String {
    let graph = outcome.graph();
    let seed = outcome.seed();

    let mut result = format!("{}{}\n", seed, status_suffix(outcome, seed));
    let mut seen = HashSet::from([seed.to_string()]);
    push_children(outcome, graph, seed, "", &mut seen, &mut result);
    result
}

fn push_children(
    outcome: &CrawlOutcome,
    graph: &SiteGraph,
    url: &str,
    prefix: &str,
    seen: &mut HashSet<String>,
    out: &mut String,
) {
    let children: Vec<&str> = graph
        .children(url)
        .into_iter()
        .filter(|child| !seen.contains(*child))
        .collect();

    for (i, child) in children.iter().enumerate() {
        seen.insert(child.to_string());
        let is_last = i == children.len() - 1;
        let branch = if is_last { "└── " } else { "├── " };
        out.push_str(&format!(
            "{}{}{}{}\n",
            prefix,
            branch,
            display_path(url, child),
            status_suffix(outcome, child)
        ));

        let next_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
        push_children(outcome, graph, child, &next_prefix, seen, out);
    }
}

/// Show only the path when the child stays on the parent's host.
fn display_path(parent: &str, child: &str) -> String {
    match (url::Url::parse(parent), url::Url::parse(child)) {
        (Ok(p), Ok(c)) if p.host_str() == c.host_str() => {
            let mut path = c.path().to_string();
            if let Some(query) = c.query() {
                path.push('?');
                path.push_str(query);
            }
            path
        }
        _ => child.to_string(),
    }
}

fn status_suffix(outcome: &CrawlOutcome, url: &str) -> String {
    match outcome.page(url) {
        None => "  [not expanded]".to_string(),
        Some(page) => {
            let indicator = match (page.is_failure(), page.status_code) {
                (true, _) => "✗",
                (false, Some(200..=299)) => "✓",
                (false, Some(300..=399)) => "→",
                _ => "?",
            };
            match page.status_code {
                Some(code) => format!("  [{} {}]", indicator, code),
                None => format!("  [{}]", indicator),
            }
        }
    }
}
