//! Open-vocabulary detection strategy for workplace-sensitive labels.
//!
//! Zero-shot span labeling against a configurable Korean label set: job
//! titles, departments, salaries, evaluation grades, employee numbers,
//! phone numbers, account numbers. The model is injected behind
//! [`OpenVocabModel`].

use docprep_core::{Detection, Result};
use std::sync::Arc;

use crate::filter::Detector;

/// Employee-number candidates shorter than this are noise
const EMPLOYEE_NO_MIN_LEN: usize = 3;

/// One labeled span from an open-vocabulary model.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledSpan {
    /// Start byte offset
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
    /// Matched surface text
    pub text: String,
    /// The label the span was matched against
    pub label: String,
    /// Model confidence in `0.0..=1.0`
    pub score: f32,
}

/// Zero-shot span labeling against caller-supplied labels.
pub trait OpenVocabModel: Send + Sync {
    /// Model name for logs
    fn name(&self) -> &'static str;

    /// Whether the model is loaded and ready
    fn is_available(&self) -> bool;

    /// Predict spans matching any of the labels, at or above the threshold.
    ///
    /// # Errors
    /// Returns `ModelError` when inference fails.
    fn predict(&self, text: &str, labels: &[String], threshold: f32) -> Result<Vec<LabeledSpan>>;
}

/// Default label set for Korean office documents.
#[must_use = "label list is returned but not used"]
pub fn default_labels() -> Vec<String> {
    ["직급", "직함", "부서", "연봉", "평가등급", "사번", "전화번호", "계좌번호"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Open-vocabulary detection strategy wrapping an injected model.
pub struct OpenVocabStrategy {
    model: Arc<dyn OpenVocabModel>,
    labels: Vec<String>,
    threshold: f32,
}

impl OpenVocabStrategy {
    /// Strategy with the default workplace label set.
    #[must_use = "strategy is created but not used"]
    pub fn new(model: Arc<dyn OpenVocabModel>, threshold: f32) -> Self {
        Self {
            model,
            labels: default_labels(),
            threshold,
        }
    }

    /// Replace the label set
    #[must_use = "returns strategy with the labels set"]
    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }
}

impl Detector for OpenVocabStrategy {
    #[inline]
    fn name(&self) -> &'static str {
        "open_vocab"
    }

    #[inline]
    fn is_available(&self) -> bool {
        self.model.is_available()
    }

    fn detect(&self, text: &str) -> Result<Vec<Detection>> {
        let spans = self.model.predict(text, &self.labels, self.threshold)?;
        let mut detections = Vec::new();

        for span in spans {
            let trimmed = span.text.trim();

            // Employee numbers: bare digits are page numbers and indices
            // far more often than real IDs
            if span.label == "사번"
                && (trimmed.chars().all(|c| c.is_ascii_digit())
                    || trimmed.chars().count() < EMPLOYEE_NO_MIN_LEN)
            {
                continue;
            }

            // Job title and job position collapse to one type
            let label = if span.label == "직함" {
                "직급".to_string()
            } else {
                span.label
            };

            detections.push(Detection::new(span.start, span.end, span.text, label, span.score));
        }

        Ok(detections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<LabeledSpan>);

    impl OpenVocabModel for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }
        fn is_available(&self) -> bool {
            true
        }
        fn predict(
            &self,
            _text: &str,
            _labels: &[String],
            threshold: f32,
        ) -> Result<Vec<LabeledSpan>> {
            Ok(self.0.iter().filter(|s| s.score >= threshold).cloned().collect())
        }
    }

    fn span(start: usize, end: usize, text: &str, label: &str, score: f32) -> LabeledSpan {
        LabeledSpan {
            start,
            end,
            text: text.to_string(),
            label: label.to_string(),
            score,
        }
    }

    #[test]
    fn test_employee_number_noise_dropped() {
        let model = Arc::new(Fixed(vec![
            span(0, 2, "12", "사번", 0.9),
            span(3, 9, "123456", "사번", 0.9),
            span(10, 18, "EMP-4821", "사번", 0.9),
        ]));
        let strategy = OpenVocabStrategy::new(model, 0.5);
        let detections = strategy.detect("...").unwrap();
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].matched_text, "EMP-4821");
    }

    #[test]
    fn test_job_title_labels_unified() {
        let model = Arc::new(Fixed(vec![
            span(0, 6, "팀장", "직함", 0.8),
            span(7, 13, "부장", "직급", 0.8),
        ]));
        let strategy = OpenVocabStrategy::new(model, 0.5);
        let detections = strategy.detect("...").unwrap();
        assert!(detections.iter().all(|d| d.entity_type == "직급"));
    }

    #[test]
    fn test_threshold_forwarded_to_model() {
        let model = Arc::new(Fixed(vec![
            span(0, 6, "영업팀", "부서", 0.45),
            span(7, 13, "개발팀", "부서", 0.85),
        ]));
        let strategy = OpenVocabStrategy::new(model, 0.5);
        let detections = strategy.detect("...").unwrap();
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].matched_text, "개발팀");
    }
}
