//! Best-effort document metadata extraction from page text.
//!
//! All fields are optional annotations; extraction failure is the normal
//! case for body pages and never an error.

use docprep_core::DocMetadata;
use once_cell::sync::Lazy;
use regex::Regex;

/// First lines longer than this are body text, not titles
const TITLE_MAX_CHARS: usize = 100;

/// Document-type keywords are only searched in this leading window
const DOC_TYPE_WINDOW_CHARS: usize = 200;

static DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // 2025-01-15, 2025년 1월 15일
        r"\d{4}[-년./]\s*\d{1,2}[-월./]\s*\d{1,2}",
        // 2025. 1. 15
        r"\d{4}\.\s*\d{1,2}\.\s*\d{1,2}",
        // 2025/01/15
        r"\d{4}/\d{1,2}/\d{1,2}",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid date regex"))
    .collect()
});

static DEPT_LABELED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(소속|부서|팀)\s*[:：]?\s*([가-힣]+(?:팀|부|과|센터))")
        .expect("Invalid labeled department regex")
});

static DEPT_BARE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[가-힣]+(?:팀|부|과|센터)").expect("Invalid department regex"));

static AUTHOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(작성자|기안자|담당자)\s*[:：]?\s*([가-힣]{2,4})\s*(팀원|대리|과장|차장|부장|이사)?")
        .expect("Invalid author regex")
});

/// Document categories and the keywords that indicate them, in priority
/// order.
const DOC_TYPE_KEYWORDS: &[(&str, &[&str])] = &[
    ("회의록", &["회의록", "미팅", "회의"]),
    ("요청서", &["요청서", "신청서", "의뢰서"]),
    ("보고서", &["보고서", "결과 보고", "진행 보고"]),
    ("계획서", &["계획서", "기획서", "제안서"]),
    ("승인문서", &["승인", "결재", "기안"]),
];

/// Extract metadata annotations from a page's text.
#[must_use = "extracted metadata is returned but not used"]
pub fn extract_metadata(text: &str) -> DocMetadata {
    let mut metadata = DocMetadata::default();

    // Title: a short, non-terminal first line
    if let Some(first_line) = text.lines().next() {
        let candidate = first_line.trim();
        if !candidate.is_empty()
            && candidate.chars().count() < TITLE_MAX_CHARS
            && !candidate.ends_with(['.', '。', '?', '!'])
        {
            metadata.title = Some(candidate.to_string());
        }
    }

    for pattern in DATE_PATTERNS.iter() {
        if let Some(m) = pattern.find(text) {
            metadata.date = Some(m.as_str().to_string());
            break;
        }
    }

    if let Some(caps) = DEPT_LABELED.captures(text) {
        metadata.department = caps.get(2).map(|m| m.as_str().to_string());
    } else if let Some(m) = DEPT_BARE.find(text) {
        metadata.department = Some(m.as_str().to_string());
    }

    if let Some(caps) = AUTHOR.captures(text) {
        if let Some(name) = caps.get(2) {
            let author = match caps.get(3) {
                Some(position) => format!("{} {}", name.as_str(), position.as_str()),
                None => name.as_str().to_string(),
            };
            metadata.author = Some(author);
        }
    }

    let head: String = text.chars().take(DOC_TYPE_WINDOW_CHARS).collect();
    for (doc_type, keywords) in DOC_TYPE_KEYWORDS {
        if keywords.iter().any(|keyword| head.contains(keyword)) {
            metadata.doc_type = Some((*doc_type).to_string());
            break;
        }
    }

    metadata
}
