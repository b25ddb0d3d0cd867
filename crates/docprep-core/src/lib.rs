//! Core data model, errors, and configuration for the docprep pipeline.
//!
//! Every other docprep crate depends on this one. It defines:
//!
//! - [`PrepError`] and [`Result`], the shared error surface
//! - [`PageRecord`], [`Detection`], and [`Chunk`], the records that flow
//!   between pipeline stages
//! - [`PipelineConfig`], the tuning knobs for the whole pipeline

pub mod config;
pub mod error;
pub mod types;

pub use config::PipelineConfig;
pub use error::{PrepError, Result};
pub use types::{
    Chunk, Detection, DocMetadata, ExtractMethod, PageRecord, SplitMethod, StructureType,
};
