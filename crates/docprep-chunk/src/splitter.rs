//! Chunk assembly.
//!
//! [`SemanticSplitter`] packs whole sentences into chunks up to the size
//! limit and carries a whole-sentence overlap suffix into the next chunk.
//! [`CharWindowSplitter`] is the degraded mode: fixed-size character
//! windows with character overlap, used when sentence packing is not
//! wanted. Both assign dense document-wide chunk ids and never merge text
//! across page boundaries.

use docprep_core::{Chunk, PageRecord, SplitMethod};

use crate::language::detect_language;
use crate::metadata::extract_metadata;
use crate::sentence::SentenceSplitter;
use crate::structure::detect_structure;

/// Warning recorded on the placeholder chunk of an empty page
const WARNING_NO_TEXT: &str = "no_text";

/// Sentence-boundary-aware splitter.
pub struct SemanticSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    fallback_language: String,
    sentences: SentenceSplitter,
}

impl SemanticSplitter {
    /// Splitter with the given size/overlap budget (in characters).
    #[must_use = "splitter is created but not used"]
    pub fn new(chunk_size: usize, chunk_overlap: usize, fallback_language: impl Into<String>) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
            fallback_language: fallback_language.into(),
            sentences: SentenceSplitter::new(),
        }
    }

    /// Replace the sentence splitter (to register a sentence model)
    #[must_use = "returns splitter with the sentence splitter set"]
    pub fn with_sentence_splitter(mut self, sentences: SentenceSplitter) -> Self {
        self.sentences = sentences;
        self
    }

    /// Split extracted pages into chunks.
    ///
    /// Every page contributes at least one chunk: an empty page yields a
    /// placeholder chunk carrying the `no_text` warning, keeping page
    /// coverage visible in the output.
    #[must_use = "chunks are returned, the input is not modified"]
    pub fn split(&self, pages: &[PageRecord]) -> Vec<Chunk> {
        let mut chunks: Vec<Chunk> = Vec::new();
        let mut chunk_id = 0usize;

        for page in pages {
            let text = page.text.trim();
            if text.is_empty() {
                let mut chunk =
                    Chunk::new(chunk_id, page.page_num, String::new(), SplitMethod::Semantic);
                chunk.warning = Some(WARNING_NO_TEXT.to_string());
                chunks.push(chunk);
                chunk_id += 1;
                continue;
            }

            let language = detect_language(text, &self.fallback_language);
            let metadata = extract_metadata(text);
            let structures = detect_structure(text);
            let sentences = self.sentences.split(text, &language);
            let chunk_texts = self.pack_sentences(&sentences);

            for chunk_text in chunk_texts {
                let mut chunk =
                    Chunk::new(chunk_id, page.page_num, chunk_text, SplitMethod::Semantic);
                chunk.language = Some(language.clone());
                if !metadata.is_empty() {
                    chunk.metadata = Some(metadata.clone());
                }
                if !structures.is_empty() {
                    chunk.structure_types = Some(structures.clone());
                }
                chunks.push(chunk);
                chunk_id += 1;
            }
        }

        log::debug!("Assembled {} chunks from {} pages", chunks.len(), pages.len());
        chunks
    }

    /// Pack sentences into chunks, carrying a whole-sentence overlap
    /// suffix into each new chunk.
    ///
    /// A sentence longer than the chunk size becomes its own chunk rather
    /// than being cut mid-sentence. The overlap suffix is assembled by
    /// walking the finished chunk backwards and taking whole sentences
    /// while they fit the overlap budget; when even the last sentence is
    /// too long the overlap is empty.
    fn pack_sentences(&self, sentences: &[String]) -> Vec<String> {
        let mut chunks: Vec<String> = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        let mut current_size = 0usize;

        for sentence in sentences {
            let sentence_size = sentence.chars().count();

            if current_size + sentence_size > self.chunk_size && !current.is_empty() {
                chunks.push(current.join(" "));

                let mut overlap: Vec<&str> = Vec::new();
                let mut overlap_size = 0usize;
                for kept in current.iter().rev() {
                    let kept_size = kept.chars().count();
                    if overlap_size + kept_size <= self.chunk_overlap {
                        overlap.insert(0, kept);
                        overlap_size += kept_size;
                    } else {
                        break;
                    }
                }

                current = overlap;
                current_size = overlap_size;
            }

            current.push(sentence);
            current_size += sentence_size;
        }

        if !current.is_empty() {
            chunks.push(current.join(" "));
        }

        chunks
    }
}

/// Fixed-window character splitter (degraded mode).
pub struct CharWindowSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl CharWindowSplitter {
    /// Splitter with the given window size and overlap (in characters).
    ///
    /// A zero size is raised to one character, and the overlap is clamped
    /// below the window size, so every window advances.
    #[must_use = "splitter is created but not used"]
    pub const fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = if chunk_size == 0 { 1 } else { chunk_size };
        let chunk_overlap = if chunk_overlap >= chunk_size {
            chunk_size - 1
        } else {
            chunk_overlap
        };
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    /// Split pages into fixed-size character windows.
    #[must_use = "chunks are returned, the input is not modified"]
    pub fn split(&self, pages: &[PageRecord]) -> Vec<Chunk> {
        let mut chunks: Vec<Chunk> = Vec::new();
        let mut chunk_id = 0usize;

        for page in pages {
            let text = page.text.trim();
            if text.is_empty() {
                let mut chunk =
                    Chunk::new(chunk_id, page.page_num, String::new(), SplitMethod::Window);
                chunk.warning = Some(WARNING_NO_TEXT.to_string());
                chunks.push(chunk);
                chunk_id += 1;
                continue;
            }

            let chars: Vec<char> = text.chars().collect();
            let mut start = 0usize;
            loop {
                let end = (start + self.chunk_size).min(chars.len());
                let window: String = chars[start..end].iter().collect();
                chunks.push(Chunk::new(chunk_id, page.page_num, window, SplitMethod::Window));
                chunk_id += 1;

                if end >= chars.len() {
                    break;
                }
                start = end - self.chunk_overlap;
            }
        }

        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docprep_core::ExtractMethod;
    use proptest::prelude::*;

    fn page(page_num: usize, text: &str) -> PageRecord {
        PageRecord::new(page_num, text.to_string(), ExtractMethod::Native)
    }

    #[test]
    fn test_empty_page_yields_warning_chunk() {
        let splitter = SemanticSplitter::new(500, 100, "ko");
        let chunks = splitter.split(&[page(1, ""), page(2, "내용이 있다.")]);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].warning.as_deref(), Some("no_text"));
        assert_eq!(chunks[0].char_count, 0);
        assert!(chunks[1].warning.is_none());
    }

    #[test]
    fn test_chunk_ids_are_dense_across_pages() {
        let splitter = SemanticSplitter::new(500, 100, "ko");
        let chunks = splitter.split(&[page(1, "한 문장."), page(2, ""), page(3, "다른 문장.")]);
        let ids: Vec<usize> = chunks.iter().map(|c| c.chunk_id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_sentences_packed_up_to_size() {
        // 21-char sentences with size 50: two fit, the third overflows
        let splitter = SemanticSplitter::new(50, 10, "ko");
        let s = "가나다라마바사아자차카타파하고노도로모보스.";
        assert_eq!(s.chars().count(), 22);
        let text = format!("{s} {s} {s}");
        let chunks = splitter.split(&[page(1, &text)]);
        assert_eq!(chunks.len(), 2);
        // overlap budget 10 < 22, so no sentence carries over
        assert_eq!(chunks[1].text, s);
    }

    #[test]
    fn test_overlap_carries_whole_sentences() {
        // short closing sentence fits the overlap budget and reappears
        let splitter = SemanticSplitter::new(30, 15, "ko");
        let text = "첫 번째 문장은 조금 길게 씁니다. 짧은 문장. 마지막 문장입니다.";
        let chunks = splitter.split(&[page(1, text)]);
        assert!(chunks.len() >= 2);
        assert!(chunks[1].text.starts_with("짧은 문장."));
    }

    #[test]
    fn test_oversized_sentence_becomes_own_chunk() {
        let splitter = SemanticSplitter::new(10, 3, "ko");
        let long = "끊어지지 않는 아주 긴 단일 문장이 이어집니다";
        let chunks = splitter.split(&[page(1, long)]);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, long);
    }

    #[test]
    fn test_language_and_metadata_attached() {
        let splitter = SemanticSplitter::new(500, 100, "ko");
        let chunks = splitter.split(&[page(1, "주간 회의록\n작성자: 김철수 과장\n안건을 논의했다.")]);
        assert_eq!(chunks[0].language.as_deref(), Some("ko"));
        let meta = chunks[0].metadata.as_ref().unwrap();
        assert_eq!(meta.title.as_deref(), Some("주간 회의록"));
        assert_eq!(meta.doc_type.as_deref(), Some("회의록"));
    }

    #[test]
    fn test_structure_types_attached() {
        let splitter = SemanticSplitter::new(500, 100, "ko");
        let chunks = splitter.split(&[page(1, "이름 | 부서\n- 항목 하나")]);
        let types = chunks[0].structure_types.as_ref().unwrap();
        assert_eq!(types.len(), 2);
    }

    #[test]
    fn test_window_splitter_fixed_steps() {
        let splitter = CharWindowSplitter::new(10, 3);
        let text = "가나다라마바사아자차카타파하".repeat(2); // 28 chars
        let chunks = splitter.split(&[page(1, &text)]);
        // windows advance by size - overlap = 7 chars
        assert_eq!(chunks[0].char_count, 10);
        assert_eq!(chunks[1].char_count, 10);
        for pair in chunks.windows(2) {
            let a: Vec<char> = pair[0].text.chars().collect();
            let b: Vec<char> = pair[1].text.chars().collect();
            assert_eq!(&a[a.len() - 3..], &b[..3]);
        }
        assert!(chunks.iter().all(|c| c.split_method == SplitMethod::Window));
    }

    #[test]
    fn test_window_splitter_clamps_overlap_below_size() {
        // overlap equal to the size would otherwise never advance past
        // the first window
        let splitter = CharWindowSplitter::new(10, 10);
        let text = "가나다라마바사아자차카타파하".repeat(2); // 28 chars
        let chunks = splitter.split(&[page(1, &text)]);

        assert!(chunks.len() >= 2);
        assert!(chunks.iter().all(|c| c.char_count <= 10));
        // clamped to overlap 9, so consecutive windows advance by one char
        let a: Vec<char> = chunks[0].text.chars().collect();
        let b: Vec<char> = chunks[1].text.chars().collect();
        assert_eq!(&a[1..], &b[..9]);
        // the walk reaches the end of the page
        let last: String = text.chars().skip(18).collect();
        assert_eq!(chunks.last().unwrap().text, last);
    }

    #[test]
    fn test_window_splitter_zero_size_still_terminates() {
        let splitter = CharWindowSplitter::new(0, 0);
        let chunks = splitter.split(&[page(1, "가나다")]);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.char_count == 1));
    }

    #[test]
    fn test_window_splitter_short_page_single_chunk() {
        let splitter = CharWindowSplitter::new(100, 10);
        let chunks = splitter.split(&[page(1, "짧은 본문")]);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "짧은 본문");
    }

    proptest! {
        #[test]
        fn prop_semantic_chunks_have_consistent_char_count(
            text in "[가나다라 .!?]{0,300}",
        ) {
            let splitter = SemanticSplitter::new(50, 10, "ko");
            let chunks = splitter.split(&[page(1, &text)]);
            for chunk in &chunks {
                prop_assert_eq!(chunk.char_count, chunk.text.chars().count());
            }
        }

        #[test]
        fn prop_every_page_contributes_a_chunk(
            texts in proptest::collection::vec("[가나다 .]{0,80}", 1..5),
        ) {
            let pages: Vec<PageRecord> = texts
                .iter()
                .enumerate()
                .map(|(i, t)| page(i + 1, t))
                .collect();
            let splitter = SemanticSplitter::new(40, 10, "ko");
            let chunks = splitter.split(&pages);
            for p in &pages {
                prop_assert!(chunks.iter().any(|c| c.page_num == p.page_num));
            }
        }
    }
}
