//! Sentence-boundary-aware chunk assembly.
//!
//! Pages flow in as [`docprep_core::PageRecord`]s and come out as
//! [`docprep_core::Chunk`]s annotated with language, metadata, and
//! structure hints. The main path is [`SemanticSplitter`]; the fixed
//! character-window mode is [`CharWindowSplitter`].

pub mod language;
pub mod metadata;
pub mod sentence;
pub mod splitter;
pub mod structure;

pub use language::detect_language;
pub use metadata::extract_metadata;
pub use sentence::{SentenceModel, SentenceSplitter};
pub use splitter::{CharWindowSplitter, SemanticSplitter};
pub use structure::detect_structure;
