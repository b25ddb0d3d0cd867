//! Plain-text extraction with multi-encoding support.
//!
//! Korean text files arrive in UTF-8, CP949/EUC-KR, and occasionally
//! UTF-16. Decoding order: BOM, strict UTF-8, then statistical detection.

use chardetng::EncodingDetector;
use docprep_clean::TextCleaner;
use docprep_core::{ExtractMethod, PageRecord, Result};
use encoding_rs::{UTF_16BE, UTF_16LE};
use std::path::Path;

/// UTF-8 BOM: EF BB BF
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
/// UTF-16 LE BOM: FF FE
const UTF16_LE_BOM: &[u8] = &[0xFF, 0xFE];
/// UTF-16 BE BOM: FE FF
const UTF16_BE_BOM: &[u8] = &[0xFE, 0xFF];

/// Decode a byte buffer to a string.
///
/// Detection priority:
/// 1. BOM (most reliable)
/// 2. strict UTF-8 validation
/// 3. chardetng statistical detection (CP949/EUC-KR, Latin-1, ...)
///
/// Never fails; undecodable bytes become replacement characters.
#[must_use = "decoded text is returned, the input is not modified"]
pub fn decode_bytes(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return String::new();
    }

    if bytes.starts_with(UTF8_BOM) {
        return String::from_utf8_lossy(&bytes[UTF8_BOM.len()..]).into_owned();
    }
    if bytes.starts_with(UTF16_LE_BOM) {
        let (text, _, _) = UTF_16LE.decode(&bytes[UTF16_LE_BOM.len()..]);
        return text.into_owned();
    }
    if bytes.starts_with(UTF16_BE_BOM) {
        let (text, _, _) = UTF_16BE.decode(&bytes[UTF16_BE_BOM.len()..]);
        return text.into_owned();
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return text.to_string();
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);
    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}

/// Extract a plain-text file as a single page.
///
/// # Errors
/// Returns `IoError` when the file cannot be read.
pub fn extract_txt(path: &Path, cleaner: &TextCleaner) -> Result<Vec<PageRecord>> {
    let bytes = std::fs::read(path)?;
    let text = decode_bytes(&bytes);
    let text = cleaner.clean_ocr_text(&text);
    Ok(vec![PageRecord::new(1, text, ExtractMethod::Native)])
}
