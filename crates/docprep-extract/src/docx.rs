//! DOCX (Office Open XML word processing) extraction.
//!
//! DOCX files are ZIP archives; body text lives in `word/document.xml`.
//! Paragraph text is collected per `w:p`, table rows per `w:tr` with cells
//! joined by ` | `, and tables are appended after the paragraphs under a
//! `[표 데이터]` marker so the chunker can recognize tabular regions.

use docprep_clean::TextCleaner;
use docprep_core::{ExtractMethod, PageRecord, PrepError, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

/// Marker line inserted before extracted table rows
const TABLE_MARKER: &str = "[표 데이터]";

/// Extract a DOCX file as a single page.
///
/// # Errors
/// Returns `BackendError` when the archive or its document XML cannot be
/// parsed.
pub fn extract_docx(path: &Path, cleaner: &TextCleaner) -> Result<Vec<PageRecord>> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file)
        .map_err(|e| PrepError::BackendError(format!("Failed to open DOCX as ZIP: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| PrepError::BackendError(format!("DOCX missing word/document.xml: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| PrepError::BackendError(format!("Failed to read document XML: {e}")))?;

    let (paragraphs, table_rows) = parse_document_xml(&xml)?;

    let mut all_text = paragraphs.join("\n");
    if !table_rows.is_empty() {
        if !all_text.is_empty() {
            all_text.push_str("\n\n");
        }
        all_text.push_str(TABLE_MARKER);
        all_text.push('\n');
        all_text.push_str(&table_rows.join("\n"));
    }

    let all_text = cleaner.clean_ocr_text(&all_text);
    Ok(vec![PageRecord::new(1, all_text, ExtractMethod::Structured)])
}

/// Walk `word/document.xml`, returning paragraph texts and table row texts.
fn parse_document_xml(xml: &str) -> Result<(Vec<String>, Vec<String>)> {
    // No trim_text here: spaces inside `w:t` runs are significant and
    // adjacent runs must concatenate exactly.
    let mut reader = Reader::from_str(xml);

    let mut paragraphs: Vec<String> = Vec::new();
    let mut table_rows: Vec<String> = Vec::new();

    let mut table_depth = 0usize;
    let mut in_text_run = false;
    let mut paragraph = String::new();
    let mut cell = String::new();
    let mut row_cells: Vec<String> = Vec::new();

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:tbl" => table_depth += 1,
                b"w:tc" => cell.clear(),
                b"w:t" => in_text_run = true,
                _ => {}
            },
            Ok(Event::Text(e)) if in_text_run => {
                let text = e
                    .unescape()
                    .map_err(|e| PrepError::BackendError(format!("Bad XML text: {e}")))?;
                if table_depth > 0 {
                    cell.push_str(&text);
                } else {
                    paragraph.push_str(&text);
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:tbl" => table_depth = table_depth.saturating_sub(1),
                b"w:tc" => row_cells.push(cell.trim().to_string()),
                b"w:tr" => {
                    let row = row_cells.join(" | ");
                    if !row.trim().is_empty() {
                        table_rows.push(row);
                    }
                    row_cells.clear();
                }
                b"w:p" if table_depth == 0 => {
                    let text = paragraph.trim();
                    if !text.is_empty() {
                        paragraphs.push(text.to_string());
                    }
                    paragraph.clear();
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(PrepError::BackendError(format!(
                    "Failed to parse document XML: {e}"
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok((paragraphs, table_rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>회의록 제목입니다</w:t></w:r></w:p>
    <w:p><w:r><w:t>본문 </w:t></w:r><w:r><w:t>내용입니다</w:t></w:r></w:p>
    <w:tbl>
      <w:tr>
        <w:tc><w:p><w:r><w:t>이름</w:t></w:r></w:p></w:tc>
        <w:tc><w:p><w:r><w:t>부서</w:t></w:r></w:p></w:tc>
      </w:tr>
      <w:tr>
        <w:tc><w:p><w:r><w:t>김철수</w:t></w:r></w:p></w:tc>
        <w:tc><w:p><w:r><w:t>영업팀</w:t></w:r></w:p></w:tc>
      </w:tr>
    </w:tbl>
  </w:body>
</w:document>"#;

    #[test]
    fn test_paragraphs_and_tables_separated() {
        let (paragraphs, rows) = parse_document_xml(SAMPLE).unwrap();
        assert_eq!(paragraphs, vec!["회의록 제목입니다", "본문 내용입니다"]);
        assert_eq!(rows, vec!["이름 | 부서", "김철수 | 영업팀"]);
    }

    #[test]
    fn test_adjacent_runs_concatenate() {
        let (paragraphs, _) = parse_document_xml(SAMPLE).unwrap();
        assert_eq!(paragraphs[1], "본문 내용입니다");
    }

    #[test]
    fn test_empty_document() {
        let xml = r#"<w:document xmlns:w="ns"><w:body/></w:document>"#;
        let (paragraphs, rows) = parse_document_xml(xml).unwrap();
        assert!(paragraphs.is_empty());
        assert!(rows.is_empty());
    }
}
