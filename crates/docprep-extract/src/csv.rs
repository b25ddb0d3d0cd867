//! CSV extraction with multi-encoding support.
//!
//! The whole file becomes one page record; each row renders as a
//! ` | `-joined line, header row included. Encoding detection reuses the
//! plain-text decoder, so CP949 exports from Korean office tools work
//! without configuration.

use docprep_clean::TextCleaner;
use docprep_core::{ExtractMethod, PageRecord, PrepError, Result};
use std::path::Path;

use crate::text::decode_bytes;

/// Extract a CSV file as a single page.
///
/// # Errors
/// Returns `BackendError` when a row cannot be parsed after decoding.
pub fn extract_csv(path: &Path, cleaner: &TextCleaner) -> Result<Vec<PageRecord>> {
    let bytes = std::fs::read(path)?;
    let text = decode_bytes(&bytes);

    // flexible: real-world exports often have ragged row lengths
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows_text: Vec<String> = Vec::new();
    for record in reader.records() {
        let record =
            record.map_err(|e| PrepError::BackendError(format!("Failed to parse CSV row: {e}")))?;
        let row_text = record.iter().collect::<Vec<_>>().join(" | ");
        if !row_text.trim().is_empty() {
            rows_text.push(row_text);
        }
    }

    let csv_text = cleaner.clean_ocr_text(&rows_text.join("\n"));
    Ok(vec![PageRecord::new(1, csv_text, ExtractMethod::Structured)])
}
