// Corpus Search Annotation Export
// Writes matched entries as tab-separated rows for downstream labeling

use crate::search::SearchReport;
use std::io::Write;
use thiserror::Error;

/// Column header of exported files
pub const EXPORT_COLUMNS: [&str; 5] = ["source", "query", "entry", "text", "label"];

/// One exported row; `label` starts empty for annotators to fill in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationRow {
    pub source: String,
    pub query: String,
    pub entry: usize,
    pub text: String,
    pub label: String,
}

impl AnnotationRow {
    fn fields(&self) -> [String; 5] {
        [
            clean_field(&self.source),
            clean_field(&self.query),
            self.entry.to_string(),
            clean_field(&self.text),
            clean_field(&self.label),
        ]
    }
}

/// Rows for the displayed entries of a report, as plain text
pub fn annotation_rows(report: &SearchReport) -> Vec<AnnotationRow> {
    report
        .result
        .display_entries
        .iter()
        .map(|entry| AnnotationRow {
            source: report.source.clone(),
            query: report.query.clone(),
            entry: entry.index,
            text: entry.text.trim().to_string(),
            label: String::new(),
        })
        .collect()
}

/// Write a header and one line per row
pub fn write_rows<W: Write>(writer: &mut W, rows: &[AnnotationRow]) -> Result<(), ExportError> {
    writeln!(writer, "{}", EXPORT_COLUMNS.join("\t"))?;
    for row in rows {
        writeln!(writer, "{}", row.fields().join("\t"))?;
    }
    writer.flush()?;
    Ok(())
}

/// Tabs and line breaks would break the row layout
fn clean_field(value: &str) -> String {
    value
        .chars()
        .map(|c| if matches!(c, '\t' | '\n' | '\r') { ' ' } else { c })
        .collect()
}

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),
}
