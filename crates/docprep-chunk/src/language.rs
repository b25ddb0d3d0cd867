//! Script-ratio language detection.
//!
//! The pipeline only needs to distinguish Korean, Japanese, and English to
//! pick a sentence model, so detection counts scripts instead of calling a
//! statistical detector. Ambiguous or empty text falls back to the
//! configured default language.

/// Minimum Hangul share among letters for Korean
const HANGUL_RATIO_MIN: f64 = 0.30;

/// Minimum kana share among letters for Japanese
const KANA_RATIO_MIN: f64 = 0.10;

/// Minimum Latin share among letters for English
const LATIN_RATIO_MIN: f64 = 0.50;

/// Detect the dominant language of the text.
///
/// Returns `ko`, `ja`, or `en`; anything else resolves to `fallback`.
#[must_use = "language code is returned but not used"]
pub fn detect_language(text: &str, fallback: &str) -> String {
    let mut hangul = 0usize;
    let mut kana = 0usize;
    let mut latin = 0usize;
    let mut letters = 0usize;

    for c in text.chars() {
        if !c.is_alphabetic() {
            continue;
        }
        letters += 1;
        match c {
            '가'..='힣' => hangul += 1,
            '\u{3040}'..='\u{30FF}' => kana += 1,
            'a'..='z' | 'A'..='Z' => latin += 1,
            _ => {}
        }
    }

    if letters == 0 {
        return fallback.to_string();
    }

    let total = letters as f64;
    if (hangul as f64) / total >= HANGUL_RATIO_MIN {
        "ko".to_string()
    } else if (kana as f64) / total >= KANA_RATIO_MIN {
        "ja".to_string()
    } else if (latin as f64) / total >= LATIN_RATIO_MIN {
        "en".to_string()
    } else {
        fallback.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_korean() {
        assert_eq!(detect_language("이 문서는 회의록입니다", "ko"), "ko");
    }

    #[test]
    fn test_english() {
        assert_eq!(detect_language("Quarterly sales report for review", "ko"), "en");
    }

    #[test]
    fn test_japanese() {
        assert_eq!(detect_language("これはテスト文書です", "ko"), "ja");
    }

    #[test]
    fn test_mixed_korean_english_prefers_korean() {
        assert_eq!(detect_language("회의록 meeting notes 정리", "ko"), "ko");
    }

    #[test]
    fn test_empty_and_symbols_use_fallback() {
        assert_eq!(detect_language("", "ko"), "ko");
        assert_eq!(detect_language("123 --- !!", "en"), "en");
    }
}
