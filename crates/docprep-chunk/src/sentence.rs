//! Sentence splitting with an injectable model and a regex fallback.
//!
//! A language-aware sentence model (when one is registered and available)
//! gets first claim; otherwise sentences split on Korean/English/Japanese
//! terminal punctuation followed by whitespace, keeping the terminator
//! with its sentence.

use docprep_core::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

/// Language-aware sentence boundary model.
pub trait SentenceModel: Send + Sync {
    /// Model name for logs
    fn name(&self) -> &'static str;

    /// Whether the model supports the language and is loaded
    fn is_available(&self, language: &str) -> bool;

    /// Split the text into sentences.
    ///
    /// # Errors
    /// Returns `ModelError` when the model fails.
    fn split(&self, text: &str, language: &str) -> Result<Vec<String>>;
}

// Terminal punctuation run followed by whitespace ends a sentence
static SENTENCE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?。！？]+\s+").expect("Invalid sentence-end regex"));

/// Sentence splitter with optional model injection.
#[derive(Default)]
pub struct SentenceSplitter {
    model: Option<Arc<dyn SentenceModel>>,
}

impl SentenceSplitter {
    /// Splitter using only the regex fallback
    #[must_use = "splitter is created but not used"]
    pub fn new() -> Self {
        Self { model: None }
    }

    /// Register a sentence model
    #[must_use = "returns splitter with the model set"]
    pub fn with_model(mut self, model: Arc<dyn SentenceModel>) -> Self {
        self.model = Some(model);
        self
    }

    /// Split text into trimmed, non-empty sentences.
    #[must_use = "sentences are returned, the input is not modified"]
    pub fn split(&self, text: &str, language: &str) -> Vec<String> {
        if let Some(model) = &self.model {
            if model.is_available(language) {
                match model.split(text, language) {
                    Ok(sentences) => {
                        return sentences
                            .into_iter()
                            .map(|s| s.trim().to_string())
                            .filter(|s| !s.is_empty())
                            .collect();
                    }
                    Err(e) => {
                        log::warn!("Sentence model '{}' failed: {e}", model.name());
                    }
                }
            }
        }

        fallback_split(text)
    }
}

/// Regex fallback: split after terminal punctuation, keep the terminator.
fn fallback_split(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut last = 0usize;

    for m in SENTENCE_END.find_iter(text) {
        let sentence = text[last..m.end()].trim();
        if !sentence.is_empty() {
            sentences.push(sentence.to_string());
        }
        last = m.end();
    }

    let rest = text[last..].trim();
    if !rest.is_empty() {
        sentences.push(rest.to_string());
    }

    sentences
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_keeps_terminators() {
        let sentences = fallback_split("첫 문장입니다. 둘째 문장입니다! 셋째");
        assert_eq!(
            sentences,
            vec!["첫 문장입니다.", "둘째 문장입니다!", "셋째"]
        );
    }

    #[test]
    fn test_fallback_cjk_terminators() {
        let sentences = fallback_split("これは文です。 次の文です。 終わり");
        assert_eq!(sentences.len(), 3);
        assert_eq!(sentences[0], "これは文です。");
    }

    #[test]
    fn test_no_terminator_is_one_sentence() {
        assert_eq!(fallback_split("마침표 없는 한 덩어리"), vec!["마침표 없는 한 덩어리"]);
    }

    #[test]
    fn test_empty_text() {
        assert!(fallback_split("").is_empty());
        assert!(fallback_split("   ").is_empty());
    }

    #[test]
    fn test_decimal_point_inside_number_not_split() {
        // no whitespace after the period, so "3.5" stays intact
        let sentences = fallback_split("성장률은 3.5퍼센트입니다. 다음 안건.");
        assert_eq!(sentences[0], "성장률은 3.5퍼센트입니다.");
    }

    #[test]
    fn test_model_takes_precedence() {
        struct Halver;
        impl SentenceModel for Halver {
            fn name(&self) -> &'static str {
                "halver"
            }
            fn is_available(&self, language: &str) -> bool {
                language == "ko"
            }
            fn split(&self, text: &str, _language: &str) -> Result<Vec<String>> {
                Ok(text.split('/').map(String::from).collect())
            }
        }

        let splitter = SentenceSplitter::new().with_model(Arc::new(Halver));
        assert_eq!(splitter.split("앞/뒤", "ko"), vec!["앞", "뒤"]);
        // unsupported language falls back to the regex
        assert_eq!(splitter.split("문장 하나.", "en"), vec!["문장 하나."]);
    }
}
