// Tests for report generation functionality

mod common;

use common::{HOST, crawl, small_site};
use sitegraph_core::report::{
    ReportFormat, gather_report_data, generate_json_report, generate_text_report, render_report,
    save_report,
};
use tempfile::TempDir;

// ============================================================================
// Report Format Tests
// ============================================================================

#[test]
fn test_report_format_from_str() {
    assert_eq!(ReportFormat::from_str("text"), Some(ReportFormat::Text));
    assert_eq!(ReportFormat::from_str("txt"), Some(ReportFormat::Text));
    assert_eq!(ReportFormat::from_str("json"), Some(ReportFormat::Json));
    assert_eq!(ReportFormat::from_str("csv"), Some(ReportFormat::Csv));
    assert_eq!(ReportFormat::from_str("dot"), Some(ReportFormat::Dot));
}

#[test]
fn test_report_format_from_str_case_insensitive() {
    assert_eq!(ReportFormat::from_str("TEXT"), Some(ReportFormat::Text));
    assert_eq!(ReportFormat::from_str("Json"), Some(ReportFormat::Json));
    assert_eq!(ReportFormat::from_str("DOT"), Some(ReportFormat::Dot));
}

#[test]
fn test_report_format_from_str_invalid() {
    assert!(ReportFormat::from_str("pdf").is_none());
    assert!(ReportFormat::from_str("").is_none());
}

#[test]
fn test_report_format_extension() {
    assert_eq!(ReportFormat::Text.extension(), "txt");
    assert_eq!(ReportFormat::Dot.extension(), "dot");
}

// ============================================================================
// Report Data Tests
// ============================================================================

#[tokio::test]
async fn test_gather_report_data() {
    let outcome = crawl(small_site(), 2).await;
    let data = gather_report_data(&outcome);

    assert_eq!(data.seed, format!("{}/", HOST));
    assert_eq!(data.summary.pages_fetched, 4);
    assert_eq!(data.summary.failures, 1);
    assert_eq!(data.summary.nodes, 4);
    assert_eq!(data.summary.edges, 3);
    assert_eq!(data.summary.max_depth_reached, 2);
    assert!(!data.expired);
    assert_eq!(data.edges[0].from, format!("{}/", HOST));
    assert_eq!(data.edges[0].to, format!("{}/a", HOST));
}

#[tokio::test]
async fn test_depth_limit_leaves_leaf_unexpanded() {
    let outcome = crawl(small_site(), 1).await;
    let data = gather_report_data(&outcome);

    assert_eq!(data.summary.nodes, 4);
    assert_eq!(data.summary.pages_fetched, 3);
    assert!(outcome.page(&format!("{}/c", HOST)).is_none());
}

// ============================================================================
// Text Report Tests
// ============================================================================

#[tokio::test]
async fn test_text_report_sections() {
    let outcome = crawl(small_site(), 2).await;
    let report = generate_text_report(&outcome);

    assert!(report.contains("SITEGRAPH CRAWL REPORT"));
    assert!(report.contains("SITE MAP"));
    assert!(report.contains("FAILED PAGES"));
    assert!(report.contains("End of Report"));
    assert!(report.contains("Pages:        4"));
    assert!(report.contains("Failures:     1"));
}

#[tokio::test]
async fn test_text_report_site_map_tree() {
    let outcome = crawl(small_site(), 2).await;
    let report = generate_text_report(&outcome);

    let expected = format!(
        "{}/  [✓ 200]\n├── /a  [✓ 200]\n│   └── /c  [✓ 200]\n└── /b  [✗ 404]\n",
        HOST
    );
    assert!(report.contains(&expected), "site map was:\n{}", report);
}

#[tokio::test]
async fn test_text_report_marks_unexpanded_nodes() {
    let outcome = crawl(small_site(), 1).await;
    let report = generate_text_report(&outcome);

    assert!(report.contains("│   └── /c  [not expanded]"));
}

// ============================================================================
// JSON Report Tests
// ============================================================================

#[tokio::test]
async fn test_json_report_structure() {
    let outcome = crawl(small_site(), 2).await;
    let json = generate_json_report(&gather_report_data(&outcome)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    let report = &value["report"];
    assert_eq!(report["metadata"]["generator"], "sitegraph");
    assert_eq!(report["metadata"]["format"], "json");
    assert_eq!(report["crawl"]["seed"], format!("{}/", HOST));
    assert_eq!(report["summary"]["pages_fetched"], 4);
    assert_eq!(report["graph"]["nodes"].as_array().unwrap().len(), 4);
    assert_eq!(report["graph"]["edges"].as_array().unwrap().len(), 3);
    assert_eq!(report["pages"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_json_report_keeps_failed_page_error() {
    let outcome = crawl(small_site(), 2).await;
    let json = render_report(&outcome, ReportFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    let failed = value["report"]["pages"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["url"] == format!("{}/b", HOST))
        .unwrap();
    assert!(failed["raw_text"].is_null());
    assert_eq!(failed["status_code"], 404);
}

// ============================================================================
// Rendering and Saving
// ============================================================================

#[tokio::test]
async fn test_render_report_all_formats() {
    let outcome = crawl(small_site(), 2).await;

    let csv = render_report(&outcome, ReportFormat::Csv).unwrap();
    assert!(csv.starts_with("\"URL\",\"ExtractedText\"\n"));

    let dot = render_report(&outcome, ReportFormat::Dot).unwrap();
    assert!(dot.contains("digraph"));

    let text = render_report(&outcome, ReportFormat::Text).unwrap();
    assert!(text.contains("SITE MAP"));
}

#[tokio::test]
async fn test_save_report() {
    let outcome = crawl(small_site(), 2).await;
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.txt");

    let text = generate_text_report(&outcome);
    save_report(&text, &path).unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), text);
}
