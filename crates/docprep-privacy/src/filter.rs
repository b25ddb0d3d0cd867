//! The privacy filter: run detectors, merge, mask, report.
//!
//! Masking is replacement-only: detected spans become `[TYPE]` tags and
//! nothing else in the text is touched. A failing strategy contributes
//! zero detections and a log line; it never fails the document.

use docprep_core::{Detection, Result};
use serde::{Deserialize, Serialize};

use crate::merge::merge_detections;

/// Examples retained per entity type in the findings report
const MAX_EXAMPLES: usize = 5;

/// A privacy detection strategy.
pub trait Detector: Send + Sync {
    /// Strategy name, reported in `detection_methods`
    fn name(&self) -> &'static str;

    /// Whether the strategy can run; unavailable strategies are skipped
    fn is_available(&self) -> bool;

    /// Find candidate spans in the text.
    ///
    /// # Errors
    /// Returns `ModelError` when the underlying model fails.
    fn detect(&self, text: &str) -> Result<Vec<Detection>>;
}

/// Per-entity-type findings summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoundItem {
    /// Canonical entity type
    #[serde(rename = "type")]
    pub entity_type: String,
    /// Number of masked spans of this type
    pub count: usize,
    /// Up to five example surface forms
    pub examples: Vec<String>,
    /// Mean detector confidence, rounded to three decimals
    pub avg_confidence: f32,
    /// Detection method tag
    pub method: String,
}

/// Result of filtering one text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterResult {
    /// Text with every winning span replaced by its `[TYPE]` tag
    pub filtered_text: String,
    /// Findings grouped by entity type
    pub found_items: Vec<FoundItem>,
    /// Whether any span was masked
    pub changes_made: bool,
    /// Names of strategies that contributed at least one detection
    pub detection_methods: Vec<String>,
}

impl FilterResult {
    fn unchanged(text: &str) -> Self {
        Self {
            filtered_text: text.to_string(),
            found_items: Vec::new(),
            changes_made: false,
            detection_methods: Vec::new(),
        }
    }
}

/// Multi-strategy privacy filter.
pub struct PrivacyFilter {
    detectors: Vec<Box<dyn Detector>>,
}

impl PrivacyFilter {
    /// Filter with no strategies; add them with [`with_detector`](Self::with_detector).
    #[must_use = "filter is created but not used"]
    pub fn new() -> Self {
        Self {
            detectors: Vec::new(),
        }
    }

    /// Add a detection strategy
    #[must_use = "returns filter with the detector added"]
    pub fn with_detector(mut self, detector: Box<dyn Detector>) -> Self {
        self.detectors.push(detector);
        self
    }

    /// Number of registered strategies
    #[inline]
    #[must_use = "detector count is returned but not used"]
    pub fn detector_count(&self) -> usize {
        self.detectors.len()
    }

    /// Detect, merge, and mask privacy entities in the text.
    #[must_use = "filter result is returned, the input is not modified"]
    pub fn filter_text(&self, text: &str) -> FilterResult {
        if text.is_empty() {
            return FilterResult::unchanged(text);
        }

        let mut all_detections: Vec<Detection> = Vec::new();
        let mut methods_used: Vec<String> = Vec::new();

        for detector in &self.detectors {
            if !detector.is_available() {
                log::debug!("Privacy strategy '{}' unavailable, skipping", detector.name());
                continue;
            }
            match detector.detect(text) {
                Ok(detections) => {
                    if !detections.is_empty() {
                        methods_used.push(detector.name().to_string());
                        all_detections.extend(detections);
                    }
                }
                Err(e) => {
                    log::warn!("Privacy strategy '{}' failed: {e}", detector.name());
                }
            }
        }

        let merged = merge_detections(all_detections);
        let changes_made = !merged.is_empty();
        let filtered_text = mask_detections(text, &merged);
        let found_items = format_findings(&merged);

        FilterResult {
            filtered_text,
            found_items,
            changes_made,
            detection_methods: methods_used,
        }
    }
}

impl Default for PrivacyFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// Replace each span with its `[TYPE]` tag, descending by start offset so
/// earlier offsets stay valid while later ones are rewritten.
fn mask_detections(text: &str, detections: &[Detection]) -> String {
    let mut sorted: Vec<&Detection> = detections.iter().collect();
    sorted.sort_by(|a, b| b.start.cmp(&a.start));

    let mut masked = text.to_string();
    for detection in sorted {
        if detection.end > masked.len()
            || !masked.is_char_boundary(detection.start)
            || !masked.is_char_boundary(detection.end)
        {
            log::warn!(
                "Skipping detection with invalid span {}..{}",
                detection.start,
                detection.end
            );
            continue;
        }
        let mask = format!("[{}]", detection.entity_type);
        masked.replace_range(detection.start..detection.end, &mask);
    }
    masked
}

/// Group winning detections by type for the findings report.
fn format_findings(detections: &[Detection]) -> Vec<FoundItem> {
    let mut order: Vec<String> = Vec::new();
    let mut by_type: std::collections::HashMap<String, (Vec<String>, Vec<f32>)> =
        std::collections::HashMap::new();

    for detection in detections {
        let entry = by_type
            .entry(detection.entity_type.clone())
            .or_insert_with(|| {
                order.push(detection.entity_type.clone());
                (Vec::new(), Vec::new())
            });
        entry.0.push(detection.matched_text.clone());
        entry.1.push(detection.confidence);
    }

    order
        .into_iter()
        .filter_map(|entity_type| {
            let (items, scores) = by_type.remove(&entity_type)?;
            let avg = scores.iter().sum::<f32>() / scores.len() as f32;
            Some(FoundItem {
                entity_type,
                count: items.len(),
                examples: items.into_iter().take(MAX_EXAMPLES).collect(),
                avg_confidence: (avg * 1000.0).round() / 1000.0,
                method: "hybrid".to_string(),
            })
        })
        .collect()
}
