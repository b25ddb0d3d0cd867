//! Sentinel protection for privacy mask tags.
//!
//! A correction model will happily "fix" `[PERSON]` into something else,
//! destroying the masking contract. Before correction every mask tag is
//! swapped for an opaque sentinel the model has no reason to touch, and
//! restored afterwards. Restoration is exact: a corrupted sentinel stays
//! corrupted rather than guessing.

use once_cell::sync::Lazy;
use regex::Regex;

const SENTINEL_PREFIX: &str = "<KEEP_";
const SENTINEL_SUFFIX: &str = ">";

// `[PERSON]`, `[직급]`, `[EMAIL_ADDRESS]`, ...
static MASK_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[A-Z가-힣_]+\]").expect("Invalid mask-tag regex"));

/// Replace every mask tag with a numbered sentinel.
///
/// Returns the protected text and the sentinel-to-tag mapping. Sentinel
/// numbering skips values whose literal form already appears in the text,
/// so pathological input cannot alias a real sentinel.
#[must_use = "protected text and mapping are returned, the input is not modified"]
pub fn protect_masks(text: &str) -> (String, Vec<(String, String)>) {
    let mut mapping: Vec<(String, String)> = Vec::new();
    let mut next_index = 0usize;

    let protected = MASK_PATTERN.replace_all(text, |caps: &regex::Captures<'_>| {
        let mut sentinel = format!("{SENTINEL_PREFIX}{next_index}{SENTINEL_SUFFIX}");
        while text.contains(&sentinel) {
            next_index += 1;
            sentinel = format!("{SENTINEL_PREFIX}{next_index}{SENTINEL_SUFFIX}");
        }
        next_index += 1;
        mapping.push((sentinel.clone(), caps[0].to_string()));
        sentinel
    });

    (protected.into_owned(), mapping)
}

/// Swap sentinels back for their original mask tags.
#[must_use = "restored text is returned, the input is not modified"]
pub fn restore_masks(text: &str, mapping: &[(String, String)]) -> String {
    let mut restored = text.to_string();
    for (sentinel, original) in mapping {
        restored = restored.replace(sentinel, original);
    }
    restored
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let text = "[PERSON] 팀장이 [PHONE_NUMBER]로 연락했다";
        let (protected, mapping) = protect_masks(text);
        assert!(!protected.contains("[PERSON]"));
        assert!(protected.contains("<KEEP_0>"));
        assert_eq!(restore_masks(&protected, &mapping), text);
    }

    #[test]
    fn test_korean_mask_tags_protected() {
        let (protected, mapping) = protect_masks("[직급] 승진 대상자 [사번]");
        assert_eq!(mapping.len(), 2);
        assert!(!protected.contains('['));
    }

    #[test]
    fn test_no_masks_is_identity() {
        let text = "마스크 없는 본문";
        let (protected, mapping) = protect_masks(text);
        assert_eq!(protected, text);
        assert!(mapping.is_empty());
    }

    #[test]
    fn test_preexisting_sentinel_text_not_aliased() {
        // the literal "<KEEP_0>" already appears; numbering must skip it
        let text = "<KEEP_0> 그대로 두고 [PERSON] 보호";
        let (protected, mapping) = protect_masks(text);
        assert_eq!(mapping.len(), 1);
        assert_ne!(mapping[0].0, "<KEEP_0>");
        assert_eq!(restore_masks(&protected, &mapping), text);
    }

    #[test]
    fn test_lowercase_brackets_not_masks() {
        let text = "배열 표기 [index] 는 보호하지 않는다";
        let (protected, mapping) = protect_masks(text);
        assert_eq!(protected, text);
        assert!(mapping.is_empty());
    }
}
