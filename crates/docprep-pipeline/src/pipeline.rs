//! The document-to-chunk pipeline.
//!
//! Stage order per document: extract → clean → split → privacy filter →
//! normalize → persist. Batch processing isolates failures per document;
//! one bad file never stops the run.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use docprep_chunk::SemanticSplitter;
use docprep_clean::{is_valid_text_chunk, TextCleaner};
use docprep_core::{Chunk, ExtractMethod, PipelineConfig, PrepError, Result, SplitMethod};
use docprep_extract::{Extractor, VisionParser};
use docprep_normalize::{CorrectionModel, Normalizer};
use docprep_privacy::{
    HonorificNerModel, NerStrategy, OpenVocabModel, OpenVocabStrategy, PrivacyFilter,
    RegexPiiDetector,
};

use crate::output::{
    BatchSummary, DocumentOutput, NormalizationStats, PagePrivacyReport, PrivacyReport,
    PrivacyStats, ProcessingInfo,
};

/// Extensions the batch scanner picks up from the input folder
const SUPPORTED_EXTENSIONS: &[&str] = &[
    "pdf", "txt", "docx", "doc", "pptx", "ppt", "xlsx", "xls", "csv", "hwp", "hwpx", "jpg",
    "jpeg", "png", "bmp", "tiff",
];

/// Document-to-chunk ingestion pipeline.
///
/// Capabilities (OCR, vision parsing, host automation, detection and
/// correction models) are injected at construction; every absent
/// capability degrades its stage instead of failing the document.
pub struct Pipeline {
    config: PipelineConfig,
    extractor: Extractor,
    cleaner: TextCleaner,
    privacy: Option<PrivacyFilter>,
    splitter: SemanticSplitter,
    normalizer: Option<Normalizer>,
}

impl Pipeline {
    /// Pipeline with the built-in strategies: regex PII plus the
    /// honorific-pattern person detector. Model-backed strategies and
    /// extraction capabilities are added with the `with_*` methods.
    ///
    /// # Errors
    /// Returns `FormatError` when the configuration is inconsistent.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;

        let privacy = config.use_privacy_filter.then(|| {
            PrivacyFilter::new()
                .with_detector(Box::new(RegexPiiDetector::new()))
                .with_detector(Box::new(NerStrategy::new(
                    Arc::new(HonorificNerModel::new()),
                    config.confidence_threshold,
                )))
        });

        let extractor = Extractor::new(&config);
        let splitter = SemanticSplitter::new(
            config.chunk_size,
            config.chunk_overlap,
            config.fallback_language.clone(),
        );

        Ok(Self {
            config,
            extractor,
            cleaner: TextCleaner::new(),
            privacy,
            splitter,
            normalizer: None,
        })
    }

    /// Replace the extractor (to inject OCR, vision, or host capabilities)
    #[must_use = "returns pipeline with the extractor set"]
    pub fn with_extractor(mut self, extractor: Extractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Replace the privacy filter (to register model-backed strategies)
    #[must_use = "returns pipeline with the privacy filter set"]
    pub fn with_privacy_filter(mut self, filter: PrivacyFilter) -> Self {
        self.privacy = Some(filter);
        self
    }

    /// Register a hosted vision-parser client for the VLM extraction tier.
    ///
    /// The client is installed only when a vision credential is
    /// configured; without one the tier stays unavailable and a warning
    /// is logged.
    #[must_use = "returns pipeline with the vision parser set"]
    pub fn with_vision_parser(mut self, vlm: Arc<dyn VisionParser>) -> Self {
        if self.config.vision_api_key.is_none() {
            log::warn!(
                "Vision parser '{}' registered without a credential; tier stays unavailable",
                vlm.name()
            );
            return self;
        }
        self.extractor = self.extractor.with_vision_parser(vlm);
        self
    }

    /// Register an open-vocabulary model as an additional privacy
    /// strategy, thresholded at the configured open-vocabulary
    /// confidence. Ignored when the privacy filter is disabled.
    #[must_use = "returns pipeline with the model registered"]
    pub fn with_open_vocab_model(mut self, model: Arc<dyn OpenVocabModel>) -> Self {
        match self.privacy.take() {
            Some(filter) => {
                self.privacy = Some(filter.with_detector(Box::new(OpenVocabStrategy::new(
                    model,
                    self.config.open_vocab_confidence,
                ))));
            }
            None => log::warn!(
                "Open-vocabulary model '{}' registered while the privacy filter is disabled",
                model.name()
            ),
        }
        self
    }

    /// Register a spelling-correction model for the normalizer stage
    #[must_use = "returns pipeline with the correction model set"]
    pub fn with_correction_model(mut self, model: Arc<dyn CorrectionModel>) -> Self {
        self.normalizer = Some(Normalizer::new(model));
        self
    }

    /// Process one document and persist its chunk output.
    ///
    /// # Errors
    /// Returns `FormatError` when extraction yields no pages, or an I/O
    /// error when the output cannot be written.
    pub fn process_document(&self, path: &Path) -> Result<DocumentOutput> {
        log::info!("Processing {}", path.display());

        let pages = self.extractor.extract(path);
        if pages.is_empty() {
            return Err(PrepError::FormatError(format!(
                "no text extracted from {}",
                path.display()
            )));
        }

        let pages: Vec<_> = pages
            .into_iter()
            .map(|mut page| {
                page.text = self.cleaner.clean(&page.text);
                page
            })
            .collect();

        let mut chunks = self.splitter.split(&pages);
        drop_garbled_chunks(&mut chunks);

        let (privacy_reports, methods_used, total_findings) = match &self.privacy {
            Some(filter) => self.apply_privacy_filter(filter, &mut chunks),
            None => (Vec::new(), Vec::new(), 0),
        };

        let normalization_enabled = self.config.use_normalization && self.normalizer.is_some();
        if self.config.use_normalization {
            match &self.normalizer {
                Some(normalizer) => normalizer.normalize_all(&mut chunks),
                None => log::warn!("Normalization enabled but no correction model registered"),
            }
        }

        let output = self.assemble_output(path, &pages, chunks, PipelineStats {
            privacy_reports,
            methods_used,
            total_findings,
            normalization_enabled,
        });

        self.write_output(path, &output)?;
        Ok(output)
    }

    /// Process every supported document in the input folder.
    ///
    /// Per-document failures are logged and counted; the batch always
    /// attempts every discovered file.
    ///
    /// # Errors
    /// Returns an I/O error when the input folder cannot be read.
    pub fn process_all(&self) -> Result<BatchSummary> {
        let files = self.discover_files()?;
        let mut summary = BatchSummary {
            total_files: files.len(),
            ..BatchSummary::default()
        };

        if files.is_empty() {
            log::warn!("No documents found in {}", self.config.raw_folder.display());
            return Ok(summary);
        }

        for (idx, file) in files.iter().enumerate() {
            log::info!("[{}/{}] {}", idx + 1, files.len(), file.display());
            match self.process_document(file) {
                Ok(output) => {
                    summary.succeeded += 1;
                    summary.total_chunks += output.total_chunks;
                    summary.total_characters += output.total_characters;
                    summary.total_privacy_findings +=
                        output.processing_info.privacy_filtering.total_findings;
                }
                Err(e) => {
                    summary.failed += 1;
                    log::error!("Failed to process {}: {e}", file.display());
                }
            }
        }

        log::info!(
            "Batch complete: {} succeeded, {} failed, {} chunks",
            summary.succeeded,
            summary.failed,
            summary.total_chunks
        );
        Ok(summary)
    }

    fn discover_files(&self) -> Result<Vec<PathBuf>> {
        let mut files: Vec<PathBuf> = Vec::new();
        for entry in fs::read_dir(&self.config.raw_folder)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let supported = path
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_lowercase)
                .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()));
            if supported {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Mask privacy entities chunk by chunk, aggregating findings per page.
    fn apply_privacy_filter(
        &self,
        filter: &PrivacyFilter,
        chunks: &mut [Chunk],
    ) -> (Vec<PagePrivacyReport>, Vec<String>, usize) {
        let mut reports: Vec<PagePrivacyReport> = Vec::new();
        let mut methods_used: Vec<String> = Vec::new();
        let mut total_findings = 0usize;

        for chunk in chunks.iter_mut() {
            if chunk.text.is_empty() {
                continue;
            }

            let result = filter.filter_text(&chunk.text);
            if !result.changes_made {
                continue;
            }

            chunk.set_text(result.filtered_text);
            chunk.privacy_filtered = true;
            chunk.privacy_items = Some(result.found_items.len());
            total_findings += result.found_items.len();

            for method in &result.detection_methods {
                if !methods_used.contains(method) {
                    methods_used.push(method.clone());
                }
            }

            match reports.iter_mut().find(|r| r.page == chunk.page_num) {
                Some(report) => report.findings.extend(result.found_items),
                None => reports.push(PagePrivacyReport {
                    page: chunk.page_num,
                    findings: result.found_items,
                    methods: result.detection_methods,
                }),
            }
        }

        (reports, methods_used, total_findings)
    }

    fn assemble_output(
        &self,
        path: &Path,
        pages: &[docprep_core::PageRecord],
        chunks: Vec<Chunk>,
        stats: PipelineStats,
    ) -> DocumentOutput {
        let total_characters: usize = chunks.iter().map(|c| c.char_count).sum();
        let non_empty = chunks.iter().filter(|c| !c.text.is_empty()).count();
        let average = if non_empty > 0 {
            let avg = total_characters as f64 / non_empty as f64;
            (avg * 100.0).round() / 100.0
        } else {
            0.0
        };

        let mut methods_used: Vec<ExtractMethod> = Vec::new();
        for page in pages {
            if !methods_used.contains(&page.method) {
                methods_used.push(page.method);
            }
        }

        let chunks_affected = chunks.iter().filter(|c| c.privacy_filtered).count();
        let chunks_normalized = chunks
            .iter()
            .filter(|c| c.normalized == Some(true))
            .count();

        DocumentOutput {
            source_file: file_name(path),
            file_type: path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| format!(".{}", e.to_lowercase()))
                .unwrap_or_default(),
            processed_at: chrono::Local::now().to_rfc3339(),
            total_pages: pages.len(),
            total_chunks: chunks.len(),
            total_characters,
            average_chunk_size: average,
            chunks,
            processing_info: ProcessingInfo {
                chunk_size: self.config.chunk_size,
                chunk_overlap: self.config.chunk_overlap,
                split_method: SplitMethod::Semantic,
                methods_used,
                privacy_filtering: PrivacyStats {
                    enabled: self.privacy.is_some(),
                    detection_methods: stats.methods_used,
                    total_findings: stats.total_findings,
                    chunks_affected,
                },
                normalization: NormalizationStats {
                    enabled: stats.normalization_enabled,
                    chunks_normalized,
                },
            },
            privacy_report: (!stats.privacy_reports.is_empty()).then_some(stats.privacy_reports),
        }
    }

    /// Write `{stem}_{ext}_chunks.json` and, when findings exist, the
    /// standalone privacy report. The extension in the name keeps
    /// same-stem files of different formats from colliding.
    fn write_output(&self, path: &Path, output: &DocumentOutput) -> Result<()> {
        fs::create_dir_all(&self.config.output_folder)?;

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("document");
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        let chunks_path = self
            .config
            .output_folder
            .join(format!("{stem}_{ext}_chunks.json"));
        let writer = BufWriter::new(File::create(&chunks_path)?);
        serde_json::to_writer_pretty(writer, output)?;
        log::info!("Wrote {}", chunks_path.display());

        if self.config.save_privacy_report {
            if let Some(reports) = &output.privacy_report {
                let report = PrivacyReport {
                    source_file: output.source_file.clone(),
                    processed_at: output.processed_at.clone(),
                    detection_methods: output
                        .processing_info
                        .privacy_filtering
                        .detection_methods
                        .clone(),
                    total_findings: output.processing_info.privacy_filtering.total_findings,
                    reports: reports.clone(),
                };
                let report_path = self
                    .config
                    .output_folder
                    .join(format!("{stem}_{ext}_privacy_report.json"));
                let writer = BufWriter::new(File::create(&report_path)?);
                serde_json::to_writer_pretty(writer, &report)?;
                log::info!("Wrote {}", report_path.display());
            }
        }

        Ok(())
    }
}

/// Per-document aggregates carried from the filter stages into the output.
struct PipelineStats {
    privacy_reports: Vec<PagePrivacyReport>,
    methods_used: Vec<String>,
    total_findings: usize,
    normalization_enabled: bool,
}

/// Drop chunks whose text is garbled beyond use (mojibake from partial
/// binary extraction), keeping empty placeholder chunks, then reassign
/// dense ids.
fn drop_garbled_chunks(chunks: &mut Vec<Chunk>) {
    let before = chunks.len();
    chunks.retain(|c| c.text.is_empty() || is_valid_text_chunk(&c.text));
    let dropped = before - chunks.len();
    if dropped > 0 {
        log::warn!("Dropped {dropped} garbled chunks");
        for (id, chunk) in chunks.iter_mut().enumerate() {
            chunk.chunk_id = id;
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string()
}
