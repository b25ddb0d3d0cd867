//! PPTX (Office Open XML presentation) extraction.
//!
//! Slides live at `ppt/slides/slideN.xml` inside the ZIP archive. Each
//! slide becomes one page record; text runs (`a:t`) concatenate within a
//! paragraph and paragraphs join with newlines.

use docprep_clean::TextCleaner;
use docprep_core::{ExtractMethod, PageRecord, PrepError, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

/// Extract a PPTX file, one page record per slide.
///
/// # Errors
/// Returns `BackendError` when the archive or a slide XML cannot be parsed.
pub fn extract_pptx(path: &Path, cleaner: &TextCleaner) -> Result<Vec<PageRecord>> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file)
        .map_err(|e| PrepError::BackendError(format!("Failed to open PPTX as ZIP: {e}")))?;

    let mut slide_names: Vec<(usize, String)> = archive
        .file_names()
        .filter_map(|name| slide_number(name).map(|n| (n, name.to_string())))
        .collect();
    slide_names.sort_unstable();

    let mut pages = Vec::with_capacity(slide_names.len());
    for (slide_num, name) in slide_names {
        let mut xml = String::new();
        archive
            .by_name(&name)
            .map_err(|e| PrepError::BackendError(format!("Missing slide {name}: {e}")))?
            .read_to_string(&mut xml)
            .map_err(|e| PrepError::BackendError(format!("Failed to read slide {name}: {e}")))?;

        let slide_text = parse_slide_xml(&xml)?;
        let slide_text = cleaner.clean_ocr_text(&slide_text);
        pages.push(PageRecord::new(slide_num, slide_text, ExtractMethod::Structured));
    }

    Ok(pages)
}

/// Parse `ppt/slides/slideN.xml` into its slide number, skipping rels.
fn slide_number(name: &str) -> Option<usize> {
    let rest = name.strip_prefix("ppt/slides/slide")?;
    let digits = rest.strip_suffix(".xml")?;
    digits.parse().ok()
}

/// Collect visible text from one slide's XML.
fn parse_slide_xml(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);

    let mut lines: Vec<String> = Vec::new();
    let mut paragraph = String::new();
    let mut in_text_run = false;

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.name().as_ref() == b"a:t" => in_text_run = true,
            Ok(Event::Text(e)) if in_text_run => {
                let text = e
                    .unescape()
                    .map_err(|e| PrepError::BackendError(format!("Bad XML text: {e}")))?;
                paragraph.push_str(&text);
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"a:t" => in_text_run = false,
                b"a:p" => {
                    let text = paragraph.trim();
                    if !text.is_empty() {
                        lines.push(text.to_string());
                    }
                    paragraph.clear();
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(PrepError::BackendError(format!(
                    "Failed to parse slide XML: {e}"
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slide_number_parsing() {
        assert_eq!(slide_number("ppt/slides/slide1.xml"), Some(1));
        assert_eq!(slide_number("ppt/slides/slide12.xml"), Some(12));
        assert_eq!(slide_number("ppt/slides/_rels/slide1.xml.rels"), None);
        assert_eq!(slide_number("ppt/notesSlides/notesSlide1.xml"), None);
    }

    #[test]
    fn test_parse_slide_collects_runs_per_paragraph() {
        let xml = r#"<p:sld xmlns:a="ns" xmlns:p="ns2">
  <p:txBody>
    <a:p><a:r><a:t>발표 </a:t></a:r><a:r><a:t>제목</a:t></a:r></a:p>
    <a:p><a:r><a:t>첫 번째 요점</a:t></a:r></a:p>
  </p:txBody>
</p:sld>"#;
        let text = parse_slide_xml(xml).unwrap();
        assert_eq!(text, "발표 제목\n첫 번째 요점");
    }

    #[test]
    fn test_parse_slide_skips_empty_paragraphs() {
        let xml = r#"<p:sld xmlns:a="ns"><a:p></a:p><a:p><a:r><a:t>내용</a:t></a:r></a:p></p:sld>"#;
        assert_eq!(parse_slide_xml(xml).unwrap(), "내용");
    }
}
