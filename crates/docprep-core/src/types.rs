//! Shared data model for the ingestion pipeline.
//!
//! Three records flow between stages:
//!
//! 1. [`PageRecord`] holds one extracted logical unit (page, sheet, or slide)
//! 2. [`Detection`] holds one candidate privacy-sensitive span from one strategy
//! 3. [`Chunk`] holds one retrieval-sized span of text with provenance
//!
//! All offsets in [`Detection`] are byte offsets into the text buffer the
//! detection was produced against, half-open, and must fall on UTF-8
//! character boundaries. The buffer must not be mutated between detection
//! and masking.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How the text of a page was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractMethod {
    /// Embedded text read directly from the file
    Native,
    /// Optical character recognition over a rasterized page
    Ocr,
    /// Hosted vision-language document parser
    Vlm,
    /// Structured container walked cell-by-cell (sheets, tables, XML)
    Structured,
}

/// One extracted logical unit of a document.
///
/// Emitted one-per-page/sheet/slide by the extractor. A failing unit inside
/// an otherwise successful document is represented by an empty `text`, never
/// by a missing record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    /// 1-based page/sheet/slide number
    pub page_num: usize,
    /// Extracted text, already noise-filtered where the method warrants it
    pub text: String,
    /// How the text was obtained
    pub method: ExtractMethod,
}

impl PageRecord {
    /// Create a new page record
    #[inline]
    #[must_use = "page record is created but not used"]
    pub const fn new(page_num: usize, text: String, method: ExtractMethod) -> Self {
        Self {
            page_num,
            text,
            method,
        }
    }
}

/// One candidate privacy-sensitive span found by one detector strategy.
///
/// `start..end` are half-open byte offsets into the text the detector ran
/// over. Overlapping detections from different strategies are resolved by
/// the merge rule in `docprep-privacy`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
    /// The matched text, as seen by the detector
    pub matched_text: String,
    /// Canonical entity label, e.g. `PERSON`, `PHONE_NUMBER`
    pub entity_type: String,
    /// Detector confidence in `0.0..=1.0`
    pub confidence: f32,
}

impl Detection {
    /// Create a new detection
    #[inline]
    #[must_use = "detection is created but not used"]
    pub fn new(
        start: usize,
        end: usize,
        matched_text: impl Into<String>,
        entity_type: impl Into<String>,
        confidence: f32,
    ) -> Self {
        Self {
            start,
            end,
            matched_text: matched_text.into(),
            entity_type: entity_type.into(),
            confidence,
        }
    }

    /// Span length in bytes
    #[inline]
    #[must_use = "length is computed but not used"]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span is empty
    #[inline]
    #[must_use = "emptiness check result is returned but not used"]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// How a page's text was split into chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitMethod {
    /// Sentence-boundary-aware packing (the normal mode)
    Semantic,
    /// Fixed-size character windows; boundary quality is lower
    Window,
}

/// Structural line type detected inside a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureType {
    /// Numbered or bracketed heading line
    Heading,
    /// Tab- or pipe-delimited table row
    Table,
    /// Bulleted or numbered list item
    List,
}

/// Best-effort document annotations pulled from page text.
///
/// Decorative metadata only; absence of every field is normal and the core
/// algorithms never depend on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocMetadata {
    /// Short non-terminal first line, taken as a title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// First date literal found in the text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Department/team name (Korean organizational suffixes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    /// Author name with optional position title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Document category guessed from leading keywords
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
}

impl DocMetadata {
    /// True when no field was extracted
    #[inline]
    #[must_use = "emptiness check result is returned but not used"]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.date.is_none()
            && self.department.is_none()
            && self.author.is_none()
            && self.doc_type.is_none()
    }
}

/// A retrieval-sized span of text assembled from one page's sentences.
///
/// `chunk_id` is a dense 0-based sequence across the whole document,
/// assigned at creation and never reused. Chunks never merge across pages.
/// The privacy filter and the normalizer mutate `text` in place through
/// [`Chunk::set_text`], which keeps `char_count` consistent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Dense 0-based id, unique within the document
    pub chunk_id: usize,
    /// Source page number (1-based)
    pub page_num: usize,
    /// Chunk text
    pub text: String,
    /// `text` length in characters, recomputed on every mutation
    pub char_count: usize,
    /// How the page was split
    pub split_method: SplitMethod,
    /// Detected language code (`ko`, `en`, `ja`, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Page-level annotations, carried on every chunk of the page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<DocMetadata>,
    /// Structural line types found on the page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structure_types: Option<BTreeSet<StructureType>>,
    /// Marker for abnormal pages (`no_text` for an empty input page)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    /// Set when the privacy filter replaced at least one span
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub privacy_filtered: bool,
    /// Number of entity-type groups the privacy filter found in this chunk
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privacy_items: Option<usize>,
    /// Set by the normalizer: `true` on success, `false` when correction
    /// failed and the original text was kept
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalized: Option<bool>,
}

impl Chunk {
    /// Create a chunk, computing `char_count` from the text
    #[must_use = "chunk is created but not used"]
    pub fn new(chunk_id: usize, page_num: usize, text: String, split_method: SplitMethod) -> Self {
        let char_count = text.chars().count();
        Self {
            chunk_id,
            page_num,
            text,
            char_count,
            split_method,
            language: None,
            metadata: None,
            structure_types: None,
            warning: None,
            privacy_filtered: false,
            privacy_items: None,
            normalized: None,
        }
    }

    /// Replace the text, keeping `char_count` consistent
    #[inline]
    pub fn set_text(&mut self, text: String) {
        self.char_count = text.chars().count();
        self.text = text;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_record_roundtrip() {
        let record = PageRecord::new(3, "본문".to_string(), ExtractMethod::Native);
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"method\":\"native\""));
        let back: PageRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_detection_len() {
        let d = Detection::new(4, 10, "철수", "PERSON", 0.9);
        assert_eq!(d.len(), 6);
        assert!(!d.is_empty());
    }

    #[test]
    fn test_chunk_char_count_tracks_text() {
        let mut chunk = Chunk::new(0, 1, "가나다".to_string(), SplitMethod::Semantic);
        assert_eq!(chunk.char_count, 3);
        chunk.set_text("hello world".to_string());
        assert_eq!(chunk.char_count, 11);
    }

    #[test]
    fn test_chunk_serialization_skips_absent_fields() {
        let chunk = Chunk::new(0, 1, "text".to_string(), SplitMethod::Semantic);
        let json = serde_json::to_string(&chunk).unwrap();
        assert!(!json.contains("language"));
        assert!(!json.contains("privacy_filtered"));
        assert!(!json.contains("normalized"));
    }

    #[test]
    fn test_chunk_serialization_keeps_set_fields() {
        let mut chunk = Chunk::new(2, 1, "text".to_string(), SplitMethod::Window);
        chunk.language = Some("ko".to_string());
        chunk.privacy_filtered = true;
        chunk.normalized = Some(false);
        let json = serde_json::to_string(&chunk).unwrap();
        assert!(json.contains("\"split_method\":\"window\""));
        assert!(json.contains("\"language\":\"ko\""));
        assert!(json.contains("\"privacy_filtered\":true"));
        assert!(json.contains("\"normalized\":false"));
    }

    #[test]
    fn test_doc_metadata_is_empty() {
        assert!(DocMetadata::default().is_empty());
        let meta = DocMetadata {
            title: Some("보고서".to_string()),
            ..Default::default()
        };
        assert!(!meta.is_empty());
    }
}
