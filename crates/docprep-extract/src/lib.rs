//! Multi-format text extraction with tiered fallback.
//!
//! One entry point, [`Extractor::extract`], dispatches on file extension to
//! a per-format strategy. Every strategy returns `Vec<PageRecord>` and the
//! registry never propagates a failure: a document that cannot be parsed
//! yields an empty vector and a log line, so a bad file never aborts a
//! batch run.
//!
//! The PDF strategy carries a three-tier fallback chain:
//!
//! 1. native embedded text (typed documents)
//! 2. hosted vision-language parsing (scanned documents, tables/stamps)
//! 3. local OCR over rasterized pages
//!
//! External capabilities (OCR engine, vision parser, legacy-Office host
//! automation) are injected as trait objects. Each reports availability,
//! and an absent capability degrades the affected tier instead of failing
//! the pipeline.

pub mod csv;
pub mod docx;
pub mod host;
pub mod hwp;
pub mod image;
pub mod ocr;
pub mod pdf;
pub mod pptx;
pub mod registry;
pub mod text;
pub mod vlm;
pub mod xlsx;

pub use host::{HostAutomation, NoHostAutomation};
pub use ocr::{preprocess_for_tables, NoOcr, OcrEngine};
pub use registry::Extractor;
pub use vlm::{UnconfiguredVisionParser, VisionParser};

#[cfg(feature = "tesseract")]
pub use ocr::TesseractOcr;
