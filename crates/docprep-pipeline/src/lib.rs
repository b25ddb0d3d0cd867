//! Pipeline orchestration: compose extraction, cleaning, chunking,
//! privacy filtering, and normalization into per-document and batch runs,
//! and persist the resulting chunk documents as JSON.
//!
//! ```no_run
//! use docprep_core::PipelineConfig;
//! use docprep_pipeline::Pipeline;
//!
//! # fn main() -> docprep_core::Result<()> {
//! let config = PipelineConfig::default()
//!     .with_raw_folder("data/raw")
//!     .with_output_folder("data/chunks");
//! let pipeline = Pipeline::new(config)?;
//! let summary = pipeline.process_all()?;
//! println!("{} of {} documents processed", summary.succeeded, summary.total_files);
//! # Ok(())
//! # }
//! ```

pub mod output;
pub mod pipeline;

pub use output::{
    BatchSummary, DocumentOutput, NormalizationStats, PagePrivacyReport, PrivacyReport,
    PrivacyStats, ProcessingInfo,
};
pub use pipeline::Pipeline;
