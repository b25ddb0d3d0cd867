//! XLSX (Office Open XML spreadsheet) extraction.
//!
//! One page record per sheet. Rows render as ` | `-joined cell values
//! under a `[시트: name]` header so downstream stages can tell sheets
//! apart inside a chunk.

use calamine::{open_workbook, Reader, Xlsx};
use docprep_clean::TextCleaner;
use docprep_core::{ExtractMethod, PageRecord, PrepError, Result};
use std::path::Path;

/// Extract an XLSX workbook, one page record per sheet.
///
/// # Errors
/// Returns `BackendError` when the workbook or a sheet cannot be read.
pub fn extract_xlsx(path: &Path, cleaner: &TextCleaner) -> Result<Vec<PageRecord>> {
    let mut workbook: Xlsx<_> = open_workbook(path)
        .map_err(|e| PrepError::BackendError(format!("Failed to open XLSX workbook: {e}")))?;

    let sheet_names = workbook.sheet_names().to_owned();
    let mut pages = Vec::with_capacity(sheet_names.len());

    for (sheet_num, name) in sheet_names.iter().enumerate() {
        let range = workbook
            .worksheet_range(name)
            .map_err(|e| PrepError::BackendError(format!("Failed to read sheet {name}: {e}")))?;

        let mut rows_text: Vec<String> = Vec::new();
        for row in range.rows() {
            let row_text = row
                .iter()
                .map(std::string::ToString::to_string)
                .collect::<Vec<_>>()
                .join(" | ");
            if !row_text.trim().is_empty() {
                rows_text.push(row_text);
            }
        }

        let sheet_text = format!("[시트: {name}]\n{}", rows_text.join("\n"));
        let sheet_text = cleaner.clean_ocr_text(&sheet_text);

        pages.push(PageRecord::new(
            sheet_num + 1,
            sheet_text,
            ExtractMethod::Structured,
        ));
    }

    Ok(pages)
}
