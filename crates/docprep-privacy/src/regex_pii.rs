//! Pattern-based detection of emails and Korean phone numbers.

use docprep_core::{Detection, Result};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::filter::Detector;

/// Confidence assigned to email matches
const EMAIL_CONFIDENCE: f32 = 1.0;

/// Confidence assigned to phone-number matches
const PHONE_CONFIDENCE: f32 = 0.75;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}").expect("Invalid email regex")
});

// Mobile (010/011/...) and area-code landlines, with -, ., or space
// separators, optionally none
static PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"0\d{1,2}[-. ]?\d{3,4}[-. ]?\d{4}").expect("Invalid phone regex")
});

/// Email and phone-number detector.
///
/// Always available; regex matching has no external dependency.
#[derive(Debug, Default, Clone, Copy)]
pub struct RegexPiiDetector;

impl RegexPiiDetector {
    /// Create the detector
    #[inline]
    #[must_use = "detector is created but not used"]
    pub const fn new() -> Self {
        Self
    }
}

impl Detector for RegexPiiDetector {
    #[inline]
    fn name(&self) -> &'static str {
        "regex_pii"
    }

    #[inline]
    fn is_available(&self) -> bool {
        true
    }

    fn detect(&self, text: &str) -> Result<Vec<Detection>> {
        let mut detections = Vec::new();

        for m in EMAIL.find_iter(text) {
            detections.push(Detection::new(
                m.start(),
                m.end(),
                m.as_str(),
                "EMAIL_ADDRESS",
                EMAIL_CONFIDENCE,
            ));
        }

        for m in PHONE.find_iter(text) {
            detections.push(Detection::new(
                m.start(),
                m.end(),
                m.as_str(),
                "PHONE_NUMBER",
                PHONE_CONFIDENCE,
            ));
        }

        Ok(detections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_email() {
        let detector = RegexPiiDetector::new();
        let found = detector.detect("문의: hong.gildong@example.co.kr 로 주세요").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].entity_type, "EMAIL_ADDRESS");
        assert_eq!(found[0].matched_text, "hong.gildong@example.co.kr");
    }

    #[test]
    fn test_detects_mobile_phone_variants() {
        let detector = RegexPiiDetector::new();
        for sample in ["010-1234-5678", "010 1234 5678", "01012345678", "02-123-4567"] {
            let text = format!("연락처 {sample} 입니다");
            let found = detector.detect(&text).unwrap();
            assert_eq!(found.len(), 1, "missed: {sample}");
            assert_eq!(found[0].entity_type, "PHONE_NUMBER");
        }
    }

    #[test]
    fn test_offsets_are_byte_positions() {
        let detector = RegexPiiDetector::new();
        let text = "전화 010-1234-5678";
        let found = detector.detect(text).unwrap();
        assert_eq!(&text[found[0].start..found[0].end], "010-1234-5678");
    }

    #[test]
    fn test_clean_text_has_no_detections() {
        let detector = RegexPiiDetector::new();
        assert!(detector.detect("개인정보가 없는 평범한 문장").unwrap().is_empty());
    }
}
