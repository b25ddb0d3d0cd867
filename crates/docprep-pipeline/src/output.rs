//! Persisted output records.
//!
//! One [`DocumentOutput`] per processed document, written as
//! `{stem}_{ext}_chunks.json`, plus an optional standalone
//! [`PrivacyReport`] written as `{stem}_{ext}_privacy_report.json`.
//! The JSON document is the hand-off boundary to the indexing side.

use docprep_core::{Chunk, ExtractMethod, SplitMethod};
use docprep_privacy::FoundItem;
use serde::{Deserialize, Serialize};

/// Privacy findings for one page, aggregated over its chunks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagePrivacyReport {
    /// 1-based page number
    pub page: usize,
    /// Per-entity-type findings from every chunk of the page
    pub findings: Vec<FoundItem>,
    /// Detection strategies that contributed on this page
    pub methods: Vec<String>,
}

/// Privacy-filter stage statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrivacyStats {
    /// Whether the stage ran
    pub enabled: bool,
    /// Strategy names that contributed at least one detection
    pub detection_methods: Vec<String>,
    /// Total entity-type groups masked across all chunks
    pub total_findings: usize,
    /// Number of chunks with at least one masked span
    pub chunks_affected: usize,
}

/// Normalizer stage statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizationStats {
    /// Whether the stage ran
    pub enabled: bool,
    /// Chunks whose text was successfully corrected
    pub chunks_normalized: usize,
}

/// How the document was processed, carried alongside the chunks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingInfo {
    /// Chunk size budget in characters
    pub chunk_size: usize,
    /// Chunk overlap in characters
    pub chunk_overlap: usize,
    /// Split mode used for every page
    pub split_method: SplitMethod,
    /// Extraction methods that produced at least one page
    pub methods_used: Vec<ExtractMethod>,
    /// Privacy-filter stage statistics
    pub privacy_filtering: PrivacyStats,
    /// Normalizer stage statistics
    pub normalization: NormalizationStats,
}

/// The persisted result of processing one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentOutput {
    /// Input file name (no directory)
    pub source_file: String,
    /// Input extension including the leading dot, e.g. `.pdf`
    pub file_type: String,
    /// ISO-8601 processing timestamp
    pub processed_at: String,
    /// Extracted page/sheet/slide count
    pub total_pages: usize,
    /// Chunk count, placeholder chunks included
    pub total_chunks: usize,
    /// Character total over all chunks
    pub total_characters: usize,
    /// Mean size of non-empty chunks, rounded to two decimals
    pub average_chunk_size: f64,
    /// The chunks, in `chunk_id` order
    pub chunks: Vec<Chunk>,
    /// Stage statistics
    pub processing_info: ProcessingInfo,
    /// Per-page privacy findings, present when anything was masked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privacy_report: Option<Vec<PagePrivacyReport>>,
}

/// Standalone privacy report, written next to the chunk output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrivacyReport {
    /// Input file name
    pub source_file: String,
    /// ISO-8601 processing timestamp
    pub processed_at: String,
    /// Strategy names that contributed
    pub detection_methods: Vec<String>,
    /// Total entity-type groups masked
    pub total_findings: usize,
    /// Per-page findings
    pub reports: Vec<PagePrivacyReport>,
}

/// Batch run tally over every discovered file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Files discovered in the input folder
    pub total_files: usize,
    /// Documents processed to a written output
    pub succeeded: usize,
    /// Documents that yielded no output
    pub failed: usize,
    /// Chunk total over succeeded documents
    pub total_chunks: usize,
    /// Character total over succeeded documents
    pub total_characters: usize,
    /// Privacy findings total over succeeded documents
    pub total_privacy_findings: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_output_roundtrip() {
        let output = DocumentOutput {
            source_file: "회의록.pdf".to_string(),
            file_type: ".pdf".to_string(),
            processed_at: "2026-08-25T10:00:00+09:00".to_string(),
            total_pages: 2,
            total_chunks: 3,
            total_characters: 1200,
            average_chunk_size: 400.0,
            chunks: Vec::new(),
            processing_info: ProcessingInfo {
                chunk_size: 500,
                chunk_overlap: 100,
                split_method: SplitMethod::Semantic,
                methods_used: vec![ExtractMethod::Native],
                privacy_filtering: PrivacyStats {
                    enabled: true,
                    detection_methods: vec!["regex_pii".to_string()],
                    total_findings: 4,
                    chunks_affected: 2,
                },
                normalization: NormalizationStats {
                    enabled: false,
                    chunks_normalized: 0,
                },
            },
            privacy_report: None,
        };

        let json = serde_json::to_string(&output).unwrap();
        assert!(json.contains("\"split_method\":\"semantic\""));
        assert!(json.contains("\"methods_used\":[\"native\"]"));
        // absent report is omitted, not null
        assert!(!json.contains("privacy_report"));

        let back: DocumentOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(back, output);
    }

    #[test]
    fn test_page_report_serializes_findings() {
        let report = PagePrivacyReport {
            page: 1,
            findings: vec![FoundItem {
                entity_type: "PERSON".to_string(),
                count: 2,
                examples: vec!["김철수".to_string()],
                avg_confidence: 0.75,
                method: "hybrid".to_string(),
            }],
            methods: vec!["ner".to_string()],
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"type\":\"PERSON\""));
        assert!(json.contains("\"page\":1"));
    }
}
