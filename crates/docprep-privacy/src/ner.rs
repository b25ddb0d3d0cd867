//! Named-entity detection strategy.
//!
//! The model itself is injected behind [`NerModel`]; the strategy layer
//! owns label canonicalization, the confidence threshold, and the
//! small-number suppression rule. [`HonorificNerModel`] is a bundled
//! pattern model that finds Korean names by their honorific or job-title
//! suffix, so person masking works without an external model.

use docprep_core::{Detection, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

use crate::filter::Detector;

/// Bare digit strings at most this long are suppressed for QUANTITY
const SIMPLE_NUMBER_MAX_LEN: usize = 2;

/// Confidence of honorific-pattern person matches
const HONORIFIC_CONFIDENCE: f32 = 0.75;

/// One entity span as produced by a NER model, before canonicalization.
#[derive(Debug, Clone, PartialEq)]
pub struct NerEntity {
    /// Start byte offset
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
    /// Matched surface text
    pub word: String,
    /// Raw model label (`PS`, `PER`, `DAT`, ...)
    pub label: String,
    /// Model confidence in `0.0..=1.0`
    pub score: f32,
}

/// Token-classification model for Korean named entities.
pub trait NerModel: Send + Sync {
    /// Model name for logs
    fn name(&self) -> &'static str;

    /// Whether the model is loaded and ready
    fn is_available(&self) -> bool;

    /// Predict entity spans over the text.
    ///
    /// # Errors
    /// Returns `ModelError` when inference fails.
    fn predict(&self, text: &str) -> Result<Vec<NerEntity>>;
}

/// Map raw model labels onto the canonical entity vocabulary.
///
/// Unknown labels pass through unchanged so custom models can introduce
/// their own types.
#[must_use = "canonical label is returned but not used"]
pub fn canonical_label(label: &str) -> String {
    match label.to_uppercase().as_str() {
        "PER" | "PERSON" | "PS" => "PERSON".to_string(),
        "LOC" | "LOCATION" | "LC" => "LOCATION".to_string(),
        "ORG" | "ORGANIZATION" | "OG" => "ORGANIZATION".to_string(),
        "DAT" | "DATE" | "DT" => "DATE".to_string(),
        "TIM" | "TIME" | "TI" => "TIME".to_string(),
        "QT" | "QUANTITY" => "QUANTITY".to_string(),
        other => other.to_string(),
    }
}

/// NER detection strategy wrapping an injected model.
pub struct NerStrategy {
    model: Arc<dyn NerModel>,
    threshold: f32,
    filter_simple_numbers: bool,
}

impl NerStrategy {
    /// Strategy with the given model and confidence threshold.
    ///
    /// Short bare numbers labeled QUANTITY are suppressed by default;
    /// page numbers and list indices are not privacy-sensitive.
    #[must_use = "strategy is created but not used"]
    pub fn new(model: Arc<dyn NerModel>, threshold: f32) -> Self {
        Self {
            model,
            threshold,
            filter_simple_numbers: false,
        }
    }

    /// Also mask short bare numbers labeled QUANTITY
    #[must_use = "returns strategy with number filtering toggled"]
    pub fn with_simple_number_filtering(mut self, enable: bool) -> Self {
        self.filter_simple_numbers = enable;
        self
    }
}

impl Detector for NerStrategy {
    #[inline]
    fn name(&self) -> &'static str {
        "ner_model"
    }

    #[inline]
    fn is_available(&self) -> bool {
        self.model.is_available()
    }

    fn detect(&self, text: &str) -> Result<Vec<Detection>> {
        let entities = self.model.predict(text)?;
        let mut detections = Vec::new();

        for entity in entities {
            if entity.score < self.threshold {
                continue;
            }

            let entity_type = canonical_label(&entity.label);
            let word = entity.word.trim();

            if entity_type == "QUANTITY"
                && !self.filter_simple_numbers
                && word.chars().all(|c| c.is_ascii_digit())
                && word.len() <= SIMPLE_NUMBER_MAX_LEN
            {
                continue;
            }

            detections.push(Detection::new(
                entity.start,
                entity.end,
                entity.word,
                entity_type,
                entity.score,
            ));
        }

        Ok(detections)
    }
}

// 2-4 syllable Hangul name directly followed by an honorific or job title.
// The title is matched so the name boundary is anchored, but only the name
// group is reported.
static HONORIFIC_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([가-힣]{2,4})\s*(씨|님|팀장|부장|과장|차장|대리|사원|이사|대표)")
        .expect("Invalid honorific-name regex")
});

/// Pattern model that finds person names by honorific suffix.
///
/// Precision-oriented stand-in for a real NER model: it only fires on
/// `이름 + 호칭` sequences, which in office documents are almost always
/// personal names.
#[derive(Debug, Default, Clone, Copy)]
pub struct HonorificNerModel;

impl HonorificNerModel {
    /// Create the pattern model
    #[inline]
    #[must_use = "model is created but not used"]
    pub const fn new() -> Self {
        Self
    }
}

impl NerModel for HonorificNerModel {
    #[inline]
    fn name(&self) -> &'static str {
        "honorific_pattern"
    }

    #[inline]
    fn is_available(&self) -> bool {
        true
    }

    fn predict(&self, text: &str) -> Result<Vec<NerEntity>> {
        let mut entities = Vec::new();
        for caps in HONORIFIC_NAME.captures_iter(text) {
            if let Some(name) = caps.get(1) {
                entities.push(NerEntity {
                    start: name.start(),
                    end: name.end(),
                    word: name.as_str().to_string(),
                    label: "PS".to_string(),
                    score: HONORIFIC_CONFIDENCE,
                });
            }
        }
        Ok(entities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_label_mapping() {
        assert_eq!(canonical_label("PS"), "PERSON");
        assert_eq!(canonical_label("per"), "PERSON");
        assert_eq!(canonical_label("DT"), "DATE");
        assert_eq!(canonical_label("OG"), "ORGANIZATION");
        assert_eq!(canonical_label("연봉"), "연봉");
    }

    #[test]
    fn test_honorific_model_masks_name_only() {
        let model = HonorificNerModel::new();
        let text = "김철수 팀장님께 보고드립니다";
        let entities = model.predict(text).unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].word, "김철수");
        assert_eq!(&text[entities[0].start..entities[0].end], "김철수");
    }

    #[test]
    fn test_honorific_model_requires_suffix() {
        let model = HonorificNerModel::new();
        assert!(model.predict("철수가 출근했다").unwrap().is_empty());
        assert_eq!(model.predict("박영희 씨가 발표한다").unwrap().len(), 1);
    }

    #[test]
    fn test_strategy_applies_threshold() {
        struct Fixed(Vec<NerEntity>);
        impl NerModel for Fixed {
            fn name(&self) -> &'static str {
                "fixed"
            }
            fn is_available(&self) -> bool {
                true
            }
            fn predict(&self, _text: &str) -> Result<Vec<NerEntity>> {
                Ok(self.0.clone())
            }
        }

        let model = Arc::new(Fixed(vec![
            NerEntity {
                start: 0,
                end: 9,
                word: "김철수".to_string(),
                label: "PS".to_string(),
                score: 0.9,
            },
            NerEntity {
                start: 10,
                end: 19,
                word: "박영희".to_string(),
                label: "PS".to_string(),
                score: 0.4,
            },
        ]));

        let strategy = NerStrategy::new(model, 0.6);
        let detections = strategy.detect("김철수 박영희").unwrap();
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].matched_text, "김철수");
        assert_eq!(detections[0].entity_type, "PERSON");
    }

    #[test]
    fn test_strategy_suppresses_short_bare_numbers() {
        struct Quantities;
        impl NerModel for Quantities {
            fn name(&self) -> &'static str {
                "quantities"
            }
            fn is_available(&self) -> bool {
                true
            }
            fn predict(&self, _text: &str) -> Result<Vec<NerEntity>> {
                Ok(vec![
                    NerEntity {
                        start: 0,
                        end: 1,
                        word: "3".to_string(),
                        label: "QT".to_string(),
                        score: 0.9,
                    },
                    NerEntity {
                        start: 2,
                        end: 6,
                        word: "5000".to_string(),
                        label: "QT".to_string(),
                        score: 0.9,
                    },
                ])
            }
        }

        let strategy = NerStrategy::new(Arc::new(Quantities), 0.6);
        let detections = strategy.detect("3 5000").unwrap();
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].matched_text, "5000");

        let strategy = NerStrategy::new(Arc::new(Quantities), 0.6)
            .with_simple_number_filtering(true);
        assert_eq!(strategy.detect("3 5000").unwrap().len(), 2);
    }
}
