//! Mask-preserving spelling normalization for chunks.
//!
//! A sequence-to-sequence correction model fixes spelling and spacing in
//! chunk text after masking. Three guarantees hold regardless of model:
//!
//! - privacy mask tags survive correction byte-for-byte (sentinel
//!   protection, [`sentinel`])
//! - text longer than the model window is corrected in overlapping token
//!   windows instead of being truncated
//! - a correction failure keeps the original text and marks the chunk
//!   `normalized: false`; it never fails the document
//!
//! The model is injected behind [`CorrectionModel`].

pub mod sentinel;

use docprep_core::{Chunk, Result};
use std::sync::Arc;

pub use sentinel::{protect_masks, restore_masks};

/// Token window fed to the model in one call, leaving headroom under a
/// typical 512-token encoder limit
const MAX_WINDOW_TOKENS: usize = 448;

/// Tokens shared between consecutive windows
const WINDOW_OVERLAP_TOKENS: usize = 64;

/// Sequence-to-sequence spelling correction model.
pub trait CorrectionModel: Send + Sync {
    /// Model name for logs
    fn name(&self) -> &'static str;

    /// Whether the model is loaded and ready
    fn is_available(&self) -> bool;

    /// Tokenize without special tokens.
    ///
    /// # Errors
    /// Returns `ModelError` when tokenization fails.
    fn encode(&self, text: &str) -> Result<Vec<u32>>;

    /// Detokenize a window back to text.
    ///
    /// # Errors
    /// Returns `ModelError` when detokenization fails.
    fn decode(&self, ids: &[u32]) -> Result<String>;

    /// Correct spelling and spacing in a window-sized text.
    ///
    /// # Errors
    /// Returns `ModelError` when inference fails.
    fn correct(&self, text: &str) -> Result<String>;
}

/// Identity model: tokens are characters, correction returns its input.
///
/// Useful in tests and as a stand-in that exercises the full windowing
/// and sentinel machinery without changing any text.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCorrection;

impl CorrectionModel for NoopCorrection {
    #[inline]
    fn name(&self) -> &'static str {
        "noop"
    }

    #[inline]
    fn is_available(&self) -> bool {
        true
    }

    fn encode(&self, text: &str) -> Result<Vec<u32>> {
        Ok(text.chars().map(u32::from).collect())
    }

    fn decode(&self, ids: &[u32]) -> Result<String> {
        Ok(ids.iter().filter_map(|&id| char::from_u32(id)).collect())
    }

    fn correct(&self, text: &str) -> Result<String> {
        Ok(text.to_string())
    }
}

/// Chunk normalizer wrapping an injected correction model.
pub struct Normalizer {
    model: Arc<dyn CorrectionModel>,
    max_window_tokens: usize,
    window_overlap: usize,
}

impl Normalizer {
    /// Normalizer with the default window budget.
    #[must_use = "normalizer is created but not used"]
    pub fn new(model: Arc<dyn CorrectionModel>) -> Self {
        Self {
            model,
            max_window_tokens: MAX_WINDOW_TOKENS,
            window_overlap: WINDOW_OVERLAP_TOKENS,
        }
    }

    /// Whether the underlying model can run
    #[inline]
    #[must_use = "availability is returned but not used"]
    pub fn is_available(&self) -> bool {
        self.model.is_available()
    }

    /// Normalize one chunk in place.
    ///
    /// On success the text is replaced and `normalized` set to `true`;
    /// on failure the original text is kept and `normalized` is `false`.
    /// Empty chunks are left untouched.
    pub fn normalize_chunk(&self, chunk: &mut Chunk) {
        if chunk.text.trim().is_empty() {
            return;
        }

        match self.normalize_text(&chunk.text) {
            Ok(normalized) => {
                chunk.set_text(normalized);
                chunk.normalized = Some(true);
            }
            Err(e) => {
                log::warn!("Normalization failed for chunk {}: {e}", chunk.chunk_id);
                chunk.normalized = Some(false);
            }
        }
    }

    /// Normalize every chunk, logging a success/failure tally.
    pub fn normalize_all(&self, chunks: &mut [Chunk]) {
        let mut succeeded = 0usize;
        let mut failed = 0usize;

        for chunk in chunks.iter_mut() {
            if chunk.text.trim().is_empty() {
                continue;
            }
            self.normalize_chunk(chunk);
            match chunk.normalized {
                Some(true) => succeeded += 1,
                _ => failed += 1,
            }
        }

        log::info!("Normalization: {succeeded} succeeded, {failed} failed");
    }

    /// Normalize a text, windowing when it exceeds the token budget.
    ///
    /// # Errors
    /// Returns `ModelError` from the underlying model.
    pub fn normalize_text(&self, text: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        let ids = self.model.encode(text)?;
        if ids.len() > self.max_window_tokens {
            return self.correct_windowed(&ids);
        }

        self.correct_protected(text)
    }

    /// Correct window by window over the token sequence. Consecutive
    /// windows share an overlap so corrections near a cut see context
    /// from both sides.
    fn correct_windowed(&self, ids: &[u32]) -> Result<String> {
        let mut out = String::new();
        let mut start = 0usize;

        loop {
            let end = (start + self.max_window_tokens).min(ids.len());
            let window_text = self.model.decode(&ids[start..end])?;
            out.push_str(&self.correct_protected(&window_text)?);

            if end == ids.len() {
                break;
            }
            start = end.saturating_sub(self.window_overlap);
        }

        Ok(out)
    }

    /// Sentinel-protect mask tags, correct, restore.
    fn correct_protected(&self, text: &str) -> Result<String> {
        let (protected, mapping) = protect_masks(text);
        let corrected = self.model.correct(&protected)?;
        Ok(restore_masks(&corrected, &mapping))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docprep_core::{PrepError, SplitMethod};

    fn chunk(text: &str) -> Chunk {
        Chunk::new(0, 1, text.to_string(), SplitMethod::Semantic)
    }

    #[test]
    fn test_noop_roundtrip_preserves_text() {
        let normalizer = Normalizer::new(Arc::new(NoopCorrection));
        let text = "맞춤법 교정 대상 텍스트입니다.";
        assert_eq!(normalizer.normalize_text(text).unwrap(), text);
    }

    #[test]
    fn test_mask_tags_survive_normalization() {
        struct Mangler;
        impl CorrectionModel for Mangler {
            fn name(&self) -> &'static str {
                "mangler"
            }
            fn is_available(&self) -> bool {
                true
            }
            fn encode(&self, text: &str) -> Result<Vec<u32>> {
                Ok(text.chars().map(u32::from).collect())
            }
            fn decode(&self, ids: &[u32]) -> Result<String> {
                Ok(ids.iter().filter_map(|&id| char::from_u32(id)).collect())
            }
            fn correct(&self, text: &str) -> Result<String> {
                // would destroy bracket tags if they were exposed
                Ok(text.replace('[', "(").replace(']', ")"))
            }
        }

        let normalizer = Normalizer::new(Arc::new(Mangler));
        let out = normalizer
            .normalize_text("[PERSON] 팀장이 [직급] 명단을 검토했다")
            .unwrap();
        assert!(out.contains("[PERSON]"));
        assert!(out.contains("[직급]"));
    }

    #[test]
    fn test_long_text_windows_cover_everything() {
        let normalizer = Normalizer::new(Arc::new(NoopCorrection));
        // well past the 448-token window with character tokens
        let text = "가나다라마바사아자차 ".repeat(100);
        let out = normalizer.normalize_text(&text).unwrap();
        // overlapping windows re-emit the shared region
        assert!(out.len() >= text.len());
        assert!(out.starts_with("가나다라마바사아자차"));
        assert!(out.trim_end().ends_with("가나다라마바사아자차"));
    }

    #[test]
    fn test_failed_correction_keeps_original_text() {
        struct Broken;
        impl CorrectionModel for Broken {
            fn name(&self) -> &'static str {
                "broken"
            }
            fn is_available(&self) -> bool {
                true
            }
            fn encode(&self, text: &str) -> Result<Vec<u32>> {
                Ok(text.chars().map(u32::from).collect())
            }
            fn decode(&self, _ids: &[u32]) -> Result<String> {
                Err(PrepError::ModelError("decode failed".to_string()))
            }
            fn correct(&self, _text: &str) -> Result<String> {
                Err(PrepError::ModelError("inference failed".to_string()))
            }
        }

        let normalizer = Normalizer::new(Arc::new(Broken));
        let mut c = chunk("원본 텍스트");
        normalizer.normalize_chunk(&mut c);
        assert_eq!(c.text, "원본 텍스트");
        assert_eq!(c.normalized, Some(false));
    }

    #[test]
    fn test_empty_chunk_left_untouched() {
        let normalizer = Normalizer::new(Arc::new(NoopCorrection));
        let mut c = chunk("");
        normalizer.normalize_chunk(&mut c);
        assert!(c.normalized.is_none());
    }

    #[test]
    fn test_successful_chunk_marked_normalized() {
        let normalizer = Normalizer::new(Arc::new(NoopCorrection));
        let mut c = chunk("교정할 문장.");
        normalizer.normalize_chunk(&mut c);
        assert_eq!(c.normalized, Some(true));
        assert_eq!(c.char_count, c.text.chars().count());
    }
}
