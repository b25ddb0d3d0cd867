//! Hosted vision-language document parsing capability.
//!
//! Used as tier 2 of the PDF fallback chain for scanned documents where
//! tables, stamps, and seals defeat plain OCR. The concrete client lives
//! outside this crate; [`UnconfiguredVisionParser`] stands in when no
//! credential is configured.

use docprep_core::{PageRecord, PrepError, Result};
use std::path::Path;

/// Whole-document parsing through a hosted vision-language model.
pub trait VisionParser: Send + Sync {
    /// Parser name for logs
    fn name(&self) -> &'static str;

    /// Whether the parser is configured and reachable
    fn is_available(&self) -> bool;

    /// Parse the document into per-page records.
    ///
    /// # Errors
    /// Returns `ModelError` when the parser is unconfigured or the remote
    /// call fails.
    fn parse_document(&self, path: &Path) -> Result<Vec<PageRecord>>;
}

/// Stand-in used when no vision credential is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredVisionParser;

impl VisionParser for UnconfiguredVisionParser {
    #[inline]
    fn name(&self) -> &'static str {
        "unconfigured"
    }

    #[inline]
    fn is_available(&self) -> bool {
        false
    }

    fn parse_document(&self, _path: &Path) -> Result<Vec<PageRecord>> {
        Err(PrepError::ModelError(
            "vision parser is not configured".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfigured_parser_unavailable() {
        let parser = UnconfiguredVisionParser;
        assert!(!parser.is_available());
        assert!(parser.parse_document(Path::new("a.pdf")).is_err());
    }
}
