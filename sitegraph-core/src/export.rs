// CSV and graph exports of a finished crawl

use crate::error::ExportError;
use csv::{QuoteStyle, ReaderBuilder, WriterBuilder};
use sitegraph_scanner::{PageRecord, SiteGraph};
use std::io::{Read, Write};

pub const CSV_HEADER: [&str; 2] = ["URL", "ExtractedText"];

/// One quoted row per page. Pages whose fetch failed get an empty text cell.
pub fn write_pages_csv<W: Write>(pages: &[PageRecord], writer: W) -> Result<(), ExportError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(writer);

    writer.write_record(CSV_HEADER)?;
    for page in pages {
        writer.write_record([page.url.as_str(), page.raw_text.as_deref().unwrap_or("")])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn pages_to_csv_string(pages: &[PageRecord]) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_pages_csv(pages, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Read back `(url, text)` pairs written by [`write_pages_csv`].
pub fn read_pages_csv<R: Read>(reader: R) -> Result<Vec<(String, String)>, ExportError> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let url = record.get(0).unwrap_or_default().to_string();
        let text = record.get(1).unwrap_or_default().to_string();
        rows.push((url, text));
    }
    Ok(rows)
}

/// Graphviz view of the link graph, nodes labelled by URL.
pub fn graph_to_dot(graph: &SiteGraph) -> String {
    graph.to_dot()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_row_is_quoted() {
        let csv = pages_to_csv_string(&[]).unwrap();
        assert_eq!(csv, "\"URL\",\"ExtractedText\"\n");
    }

    #[test]
    fn test_every_field_is_quoted() {
        let page = PageRecord::new("http://a.test/".to_string(), 0, "plain".to_string());
        let csv = pages_to_csv_string(&[page]).unwrap();
        assert!(csv.ends_with("\"http://a.test/\",\"plain\"\n"));
    }
}
