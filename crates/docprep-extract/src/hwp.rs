//! HWP / HWPX (Hancom Office) extraction.
//!
//! Binary `.hwp` files are CFB containers carrying a `PrvText` preview
//! stream in UTF-16LE. The preview covers only part of long documents, so
//! a size-based completeness check decides whether the preview is enough
//! or the document should go through the vision-parser tier instead.
//!
//! `.hwpx` files are ZIP archives with per-section XML under `Contents/`;
//! those parse directly.

use docprep_clean::TextCleaner;
use docprep_core::{ExtractMethod, PageRecord, PrepError, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

use crate::vlm::VisionParser;

/// Preview stream name inside the CFB container
const PRVTEXT_STREAM: &str = "PrvText";

/// Expected extracted characters per kilobyte of file size
const HWP_EXPECTED_CHARS_PER_KB: u64 = 100;

/// Floor for the completeness expectation, regardless of file size
const HWP_MIN_EXPECTED_CHARS: u64 = 1500;

/// Extract a binary `.hwp` file.
///
/// Preview text is used when it passes the completeness check; otherwise
/// the vision parser handles the whole document, with the preview kept as
/// a last resort when that tier is unavailable or fails.
///
/// # Errors
/// Returns `BackendError` when the container exists but cannot be opened.
pub fn extract_hwp(
    path: &Path,
    vlm: &dyn VisionParser,
    cleaner: &TextCleaner,
) -> Result<Vec<PageRecord>> {
    let preview = match read_preview_text(path, cleaner) {
        Ok(text) => text,
        Err(e) => {
            log::warn!("HWP preview extraction failed for {}: {e}", path.display());
            None
        }
    };

    let file_size_kb = std::fs::metadata(path)?.len() / 1024;
    let expected_min_chars =
        (file_size_kb * HWP_EXPECTED_CHARS_PER_KB).max(HWP_MIN_EXPECTED_CHARS) as usize;

    if let Some(text) = &preview {
        if text.chars().count() >= expected_min_chars {
            return Ok(vec![PageRecord::new(
                1,
                text.clone(),
                ExtractMethod::Native,
            )]);
        }
        log::info!(
            "HWP preview looks incomplete ({} chars, expected {}): {}",
            text.chars().count(),
            expected_min_chars,
            path.display()
        );
    }

    if vlm.is_available() {
        match vlm.parse_document(path) {
            Ok(pages) if !pages.is_empty() => return Ok(pages),
            Ok(_) => log::warn!("Vision parser returned no pages for {}", path.display()),
            Err(e) => log::warn!("Vision parser failed for {}: {e}", path.display()),
        }
    }

    // Partial preview beats nothing
    match preview {
        Some(text) => Ok(vec![PageRecord::new(1, text, ExtractMethod::Native)]),
        None => Ok(Vec::new()),
    }
}

/// Read and validate the `PrvText` preview stream. `Ok(None)` means the
/// stream is absent or its content fails the mojibake check.
fn read_preview_text(path: &Path, cleaner: &TextCleaner) -> Result<Option<String>> {
    let mut container = cfb::open(path)
        .map_err(|e| PrepError::BackendError(format!("Failed to open HWP container: {e}")))?;

    if !container.exists(PRVTEXT_STREAM) {
        return Ok(None);
    }

    let mut data = Vec::new();
    container
        .open_stream(PRVTEXT_STREAM)
        .map_err(|e| PrepError::BackendError(format!("Failed to open preview stream: {e}")))?
        .read_to_end(&mut data)
        .map_err(|e| PrepError::BackendError(format!("Failed to read preview stream: {e}")))?;

    let (decoded, _, _) = encoding_rs::UTF_16LE.decode(&data);
    let text: String = decoded.chars().filter(|&c| c != '\0').collect();

    if !is_valid_korean_text(&text) {
        return Ok(None);
    }

    Ok(Some(cleaner.clean_ocr_text(text.trim())))
}

/// Extract a `.hwpx` file by walking its section XML.
///
/// # Errors
/// Returns `BackendError` when the archive cannot be opened.
pub fn extract_hwpx(path: &Path, cleaner: &TextCleaner) -> Result<Vec<PageRecord>> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file)
        .map_err(|e| PrepError::BackendError(format!("Failed to open HWPX as ZIP: {e}")))?;

    let mut section_names: Vec<String> = archive
        .file_names()
        .filter(|name| name.starts_with("Contents/section") && name.ends_with(".xml"))
        .map(String::from)
        .collect();
    section_names.sort();

    let mut texts: Vec<String> = Vec::new();
    for name in section_names {
        let mut xml = String::new();
        let read = archive
            .by_name(&name)
            .map_err(|e| PrepError::BackendError(format!("Missing section {name}: {e}")))
            .and_then(|mut f| {
                f.read_to_string(&mut xml)
                    .map_err(|e| PrepError::BackendError(format!("Failed to read {name}: {e}")))
            });
        if let Err(e) = read {
            log::warn!("Skipping HWPX section {name}: {e}");
            continue;
        }

        match collect_xml_text(&xml) {
            Ok(section_text) if is_valid_korean_text(&section_text) => texts.push(section_text),
            Ok(_) => log::warn!("HWPX section {name} failed the text validity check"),
            Err(e) => log::warn!("Skipping HWPX section {name}: {e}"),
        }
    }

    if texts.is_empty() {
        return Ok(Vec::new());
    }

    let full_text = cleaner.clean_ocr_text(&texts.join("\n"));
    Ok(vec![PageRecord::new(1, full_text, ExtractMethod::Structured)])
}

/// Gather every text node in the XML, one line per node.
fn collect_xml_text(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut lines: Vec<String> = Vec::new();

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Text(e)) => {
                let text = e
                    .unescape()
                    .map_err(|e| PrepError::BackendError(format!("Bad XML text: {e}")))?;
                let text = text.trim();
                if !text.is_empty() {
                    lines.push(text.to_string());
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(PrepError::BackendError(format!(
                    "Failed to parse section XML: {e}"
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(lines.join("\n"))
}

/// Mojibake check for decoded HWP text.
///
/// A wrongly decoded preview stream turns into symbol soup; real content
/// satisfies at least one of these plausibility conditions.
fn is_valid_korean_text(text: &str) -> bool {
    const MIN_CHARS: usize = 10;
    const VALID_RATIO_MIN: f64 = 0.5;
    const KOREAN_RATIO_MIN: f64 = 0.05;
    const KOREAN_CHARS_MIN: usize = 3;
    const ALNUM_CHARS_MIN: usize = 10;
    const ALNUM_VALID_RATIO_MIN: f64 = 0.3;
    const BASIC_SPECIALS: &str = " \n\t.,!?-()[]{}:;@#%&*+=/<>\"'";

    if text.trim().chars().count() < MIN_CHARS {
        return false;
    }

    let total = text.chars().count() as f64;
    let valid = text
        .chars()
        .filter(|&c| {
            ('가'..='힣').contains(&c) || c.is_ascii_alphanumeric() || BASIC_SPECIALS.contains(c)
        })
        .count();
    if valid == 0 {
        return false;
    }

    let korean = text.chars().filter(|&c| ('가'..='힣').contains(&c)).count();
    let alnum = text.chars().filter(|c| c.is_alphanumeric()).count();

    let valid_ratio = (valid as f64) / total;
    let korean_ratio = (korean as f64) / total;

    valid_ratio >= VALID_RATIO_MIN
        || korean_ratio >= KOREAN_RATIO_MIN
        || korean >= KOREAN_CHARS_MIN
        || (alnum >= ALNUM_CHARS_MIN && valid_ratio >= ALNUM_VALID_RATIO_MIN)
}
