//! Line-level document structure detection.

use docprep_core::StructureType;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

/// Lines at least this long are never headings
const HEADING_MAX_CHARS: usize = 100;

// "1. 제목", "가. 제목", "1) 제목"
static NUMBERED_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\d가-힣]+[.)]\s*[가-힣]").expect("Invalid heading regex"));

// "[제목]"
static BRACKETED_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[.+\]$").expect("Invalid bracketed heading regex"));

// "- 항목", "* 항목", "• 항목"
static BULLET_LIST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[-*•]\s").expect("Invalid bullet regex"));

// "1. 항목", "2) 항목"
static NUMBERED_LIST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\d+[.)]\s").expect("Invalid numbered list regex"));

/// Detect the structural line types present in a page.
#[must_use = "detected structure set is returned but not used"]
pub fn detect_structure(text: &str) -> BTreeSet<StructureType> {
    let mut types = BTreeSet::new();

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        if line.chars().count() < HEADING_MAX_CHARS
            && (NUMBERED_HEADING.is_match(line) || BRACKETED_HEADING.is_match(line))
        {
            types.insert(StructureType::Heading);
        }

        if line.contains('\t') || line.contains('|') || line.contains('│') {
            types.insert(StructureType::Table);
        }

        if BULLET_LIST.is_match(line) || NUMBERED_LIST.is_match(line) {
            types.insert(StructureType::List);
        }
    }

    types
}
