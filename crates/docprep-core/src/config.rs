//! Pipeline configuration.

use crate::error::{PrepError, Result};
use std::path::PathBuf;

/// Default chunk size in characters
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// Default chunk overlap in characters
pub const DEFAULT_CHUNK_OVERLAP: usize = 100;

/// Default rasterization DPI for OCR fallback
pub const DEFAULT_OCR_DPI: u32 = 300;

/// Default minimum confidence accepted from the NER strategy
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.6;

/// Default minimum confidence accepted from the open-vocabulary strategy
pub const DEFAULT_OPEN_VOCAB_CONFIDENCE: f32 = 0.5;

/// Configuration for the document-to-chunk pipeline.
///
/// Built with chained setters in the builder style:
///
/// ```
/// use docprep_core::PipelineConfig;
///
/// let config = PipelineConfig::default()
///     .with_chunk_size(800)
///     .with_chunk_overlap(150)
///     .with_privacy_filter(true);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Folder scanned for input documents
    pub raw_folder: PathBuf,
    /// Folder receiving `{stem}_{ext}_chunks.json` outputs
    pub output_folder: PathBuf,
    /// Maximum chunk size in characters
    pub chunk_size: usize,
    /// Overlap carried between consecutive chunks, in characters.
    /// Must be strictly smaller than `chunk_size`.
    pub chunk_overlap: usize,
    /// Rasterization DPI for the OCR fallback tiers
    pub ocr_dpi: u32,
    /// Run the privacy detector/masker stage
    pub use_privacy_filter: bool,
    /// Run the spelling normalizer stage
    pub use_normalization: bool,
    /// Minimum confidence accepted from the NER strategy
    pub confidence_threshold: f32,
    /// Minimum confidence accepted from the open-vocabulary strategy
    pub open_vocab_confidence: f32,
    /// Language assumed when detection is ambiguous or text is empty
    pub fallback_language: String,
    /// Credential for the hosted document-vision parser; absent means the
    /// VLM tier reports unavailable
    pub vision_api_key: Option<String>,
    /// Emit the per-document privacy report JSON next to the chunk output
    pub save_privacy_report: bool,
}

impl Default for PipelineConfig {
    #[inline]
    fn default() -> Self {
        Self {
            raw_folder: PathBuf::from("data/raw"),
            output_folder: PathBuf::from("data/chunks"),
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            ocr_dpi: DEFAULT_OCR_DPI,
            use_privacy_filter: true,
            use_normalization: false,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            open_vocab_confidence: DEFAULT_OPEN_VOCAB_CONFIDENCE,
            fallback_language: "ko".to_string(),
            vision_api_key: None,
            save_privacy_report: true,
        }
    }
}

impl PipelineConfig {
    /// Set the input folder
    #[inline]
    #[must_use = "returns config with the raw folder set"]
    pub fn with_raw_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.raw_folder = folder.into();
        self
    }

    /// Set the output folder
    #[inline]
    #[must_use = "returns config with the output folder set"]
    pub fn with_output_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.output_folder = folder.into();
        self
    }

    /// Set the chunk size in characters
    #[inline]
    #[must_use = "returns config with the chunk size set"]
    pub const fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    /// Set the chunk overlap in characters
    #[inline]
    #[must_use = "returns config with the chunk overlap set"]
    pub const fn with_chunk_overlap(mut self, overlap: usize) -> Self {
        self.chunk_overlap = overlap;
        self
    }

    /// Set the OCR rasterization DPI
    #[inline]
    #[must_use = "returns config with the OCR DPI set"]
    pub const fn with_ocr_dpi(mut self, dpi: u32) -> Self {
        self.ocr_dpi = dpi;
        self
    }

    /// Enable or disable the privacy filter stage
    #[inline]
    #[must_use = "returns config with the privacy filter toggled"]
    pub const fn with_privacy_filter(mut self, enable: bool) -> Self {
        self.use_privacy_filter = enable;
        self
    }

    /// Enable or disable the normalizer stage
    #[inline]
    #[must_use = "returns config with normalization toggled"]
    pub const fn with_normalization(mut self, enable: bool) -> Self {
        self.use_normalization = enable;
        self
    }

    /// Set the minimum NER confidence
    #[inline]
    #[must_use = "returns config with the NER threshold set"]
    pub const fn with_confidence_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    /// Set the minimum open-vocabulary confidence
    #[inline]
    #[must_use = "returns config with the open-vocabulary threshold set"]
    pub const fn with_open_vocab_confidence(mut self, threshold: f32) -> Self {
        self.open_vocab_confidence = threshold;
        self
    }

    /// Set the fallback language code
    #[inline]
    #[must_use = "returns config with the fallback language set"]
    pub fn with_fallback_language(mut self, language: impl Into<String>) -> Self {
        self.fallback_language = language.into();
        self
    }

    /// Set the hosted vision-parser credential
    #[inline]
    #[must_use = "returns config with the vision credential set"]
    pub fn with_vision_api_key(mut self, key: impl Into<String>) -> Self {
        self.vision_api_key = Some(key.into());
        self
    }

    /// Check internal consistency.
    ///
    /// # Errors
    /// Returns `FormatError` when `chunk_size` is zero or `chunk_overlap`
    /// is not strictly smaller than `chunk_size`.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(PrepError::FormatError(
                "chunk_size must be greater than zero".to_string(),
            ));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(PrepError::FormatError(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(config.chunk_overlap, DEFAULT_CHUNK_OVERLAP);
        assert_eq!(config.fallback_language, "ko");
    }

    #[test]
    fn test_overlap_must_be_smaller_than_size() {
        let config = PipelineConfig::default()
            .with_chunk_size(100)
            .with_chunk_overlap(100);
        assert!(config.validate().is_err());

        let config = PipelineConfig::default()
            .with_chunk_size(100)
            .with_chunk_overlap(99);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let config = PipelineConfig::default()
            .with_chunk_size(0)
            .with_chunk_overlap(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_builder_chaining() {
        let config = PipelineConfig::default()
            .with_raw_folder("in")
            .with_output_folder("out")
            .with_ocr_dpi(150)
            .with_privacy_filter(false)
            .with_normalization(true)
            .with_confidence_threshold(0.7)
            .with_open_vocab_confidence(0.65)
            .with_vision_api_key("key");
        assert_eq!(config.raw_folder, PathBuf::from("in"));
        assert_eq!(config.ocr_dpi, 150);
        assert!(!config.use_privacy_filter);
        assert!(config.use_normalization);
        assert!((config.confidence_threshold - 0.7).abs() < 1e-6);
        assert!((config.open_vocab_confidence - 0.65).abs() < 1e-6);
        assert_eq!(config.vision_api_key.as_deref(), Some("key"));
    }
}
