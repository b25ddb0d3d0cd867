//! Extension-based dispatch to the per-format strategies.

use docprep_clean::TextCleaner;
use docprep_core::{PageRecord, PipelineConfig, Result};
use std::path::Path;
use std::sync::Arc;

use crate::host::{HostAutomation, NoHostAutomation};
use crate::ocr::OcrEngine;
use crate::vlm::{UnconfiguredVisionParser, VisionParser};
use crate::{csv, docx, hwp, image, pdf, pptx, text, xlsx};

/// Multi-format document extractor.
///
/// Holds the injected capabilities and dispatches on file extension. The
/// public [`extract`](Extractor::extract) never fails: parse errors are
/// logged and reported as an empty page list so one bad file cannot stop
/// a batch run.
pub struct Extractor {
    ocr: Arc<dyn OcrEngine>,
    vlm: Arc<dyn VisionParser>,
    host: Arc<dyn HostAutomation>,
    cleaner: TextCleaner,
    ocr_dpi: u32,
}

impl Extractor {
    /// Extractor with default capabilities.
    ///
    /// OCR defaults to Tesseract when the `tesseract` feature is enabled,
    /// otherwise to the unavailable placeholder. Vision parsing and host
    /// automation start unavailable and are injected via the `with_*`
    /// methods.
    #[must_use = "extractor is created but not used"]
    pub fn new(config: &PipelineConfig) -> Self {
        #[cfg(feature = "tesseract")]
        let ocr: Arc<dyn OcrEngine> = Arc::new(crate::ocr::TesseractOcr::new());
        #[cfg(not(feature = "tesseract"))]
        let ocr: Arc<dyn OcrEngine> = Arc::new(crate::ocr::NoOcr);

        Self {
            ocr,
            vlm: Arc::new(UnconfiguredVisionParser),
            host: Arc::new(NoHostAutomation),
            cleaner: TextCleaner::new(),
            ocr_dpi: config.ocr_dpi,
        }
    }

    /// Replace the OCR engine
    #[must_use = "returns extractor with the OCR engine set"]
    pub fn with_ocr(mut self, ocr: Arc<dyn OcrEngine>) -> Self {
        self.ocr = ocr;
        self
    }

    /// Replace the vision parser
    #[must_use = "returns extractor with the vision parser set"]
    pub fn with_vision_parser(mut self, vlm: Arc<dyn VisionParser>) -> Self {
        self.vlm = vlm;
        self
    }

    /// Replace the host-automation capability
    #[must_use = "returns extractor with host automation set"]
    pub fn with_host_automation(mut self, host: Arc<dyn HostAutomation>) -> Self {
        self.host = host;
        self
    }

    /// Extract a document into page records.
    ///
    /// Unknown extensions and failed parses return an empty vector; the
    /// cause is logged. Callers treat "no pages" as "document yielded no
    /// text".
    #[must_use = "extracted pages are returned but not used"]
    pub fn extract(&self, path: &Path) -> Vec<PageRecord> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        let result = self.dispatch(path, &extension);
        match result {
            Ok(pages) => pages,
            Err(e) => {
                log::error!("Extraction failed for {}: {e}", path.display());
                Vec::new()
            }
        }
    }

    fn dispatch(&self, path: &Path, extension: &str) -> Result<Vec<PageRecord>> {
        match extension {
            "pdf" => pdf::extract_pdf(
                path,
                self.ocr_dpi,
                self.ocr.as_ref(),
                self.vlm.as_ref(),
                &self.cleaner,
            ),
            "txt" => text::extract_txt(path, &self.cleaner),
            "docx" => docx::extract_docx(path, &self.cleaner),
            "pptx" => pptx::extract_pptx(path, &self.cleaner),
            "xlsx" => xlsx::extract_xlsx(path, &self.cleaner),
            "csv" => csv::extract_csv(path, &self.cleaner),
            "hwp" => hwp::extract_hwp(path, self.vlm.as_ref(), &self.cleaner),
            "hwpx" => hwp::extract_hwpx(path, &self.cleaner),
            "jpg" | "jpeg" | "png" | "bmp" | "tiff" => {
                image::extract_image(path, self.ocr.as_ref(), &self.cleaner)
            }
            "doc" | "ppt" | "xls" => self.extract_legacy(path, extension),
            other => {
                log::warn!("Unsupported format: .{other} ({})", path.display());
                Ok(Vec::new())
            }
        }
    }

    /// Legacy binary Office formats need the host application.
    fn extract_legacy(&self, path: &Path, extension: &str) -> Result<Vec<PageRecord>> {
        if !self.host.is_available() {
            log::warn!(
                ".{extension} requires host application automation, which is unavailable: {}",
                path.display()
            );
            return Ok(Vec::new());
        }

        let pages = self.host.extract(path)?;
        Ok(pages
            .into_iter()
            .map(|mut page| {
                page.text = self.cleaner.clean_ocr_text(&page.text);
                page
            })
            .collect())
    }
}
