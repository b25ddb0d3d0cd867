//! PDF extraction with a three-tier fallback chain.
//!
//! Tier 1 is native embedded text. Whether the document is "typed" is
//! decided from the first page only: enough text there means the whole
//! document is treated as typed, with a nested per-page OCR fallback for
//! individual short pages (cover sheets, inserted scans).
//!
//! Documents that fail the first-page check are treated as scanned and go
//! through the vision parser (tier 2) and finally full OCR (tier 3).

use docprep_clean::TextCleaner;
use docprep_core::{ExtractMethod, PageRecord, PrepError, Result};
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::Path;

use crate::ocr::{preprocess_for_tables, OcrEngine};
use crate::vlm::VisionParser;

/// Minimum characters of native text for a page to count as typed
const TYPED_TEXT_MIN_CHARS: usize = 50;

/// PDF points per inch
const PDF_POINTS_PER_INCH: f32 = 72.0;

/// Extract a PDF through the tiered fallback chain.
///
/// # Errors
/// Returns `BackendError` when the pdfium library cannot be bound or the
/// document cannot be opened.
pub fn extract_pdf(
    path: &Path,
    dpi: u32,
    ocr: &dyn OcrEngine,
    vlm: &dyn VisionParser,
    cleaner: &TextCleaner,
) -> Result<Vec<PageRecord>> {
    let pdfium = bind_pdfium()?;
    let document = pdfium
        .load_pdf_from_file(path, None)
        .map_err(|e| PrepError::BackendError(format!("Failed to load PDF: {e}")))?;

    let pages = document.pages();
    if pages.is_empty() {
        return Ok(Vec::new());
    }

    let first_text = native_page_text(&pages.get(0).map_err(pdfium_err)?);
    log::debug!(
        "PDF {}: {} pages, first page {} native chars",
        path.display(),
        pages.len(),
        first_text.chars().count()
    );

    if first_text.chars().count() >= TYPED_TEXT_MIN_CHARS {
        return extract_typed(&pages, dpi, ocr, cleaner);
    }

    // Scanned or captured document
    if vlm.is_available() {
        match vlm.parse_document(path) {
            Ok(result) if !result.is_empty() => return Ok(result),
            Ok(_) => log::warn!("Vision parser returned no pages for {}", path.display()),
            Err(e) => log::warn!("Vision parser failed for {}: {e}", path.display()),
        }
    }

    extract_via_ocr(&pages, dpi, ocr, cleaner, path)
}

/// Tier 1: per-page native text, with OCR rescue for short pages.
fn extract_typed(
    pages: &PdfPages<'_>,
    dpi: u32,
    ocr: &dyn OcrEngine,
    cleaner: &TextCleaner,
) -> Result<Vec<PageRecord>> {
    let mut records = Vec::with_capacity(pages.len() as usize);

    for (index, page) in pages.iter().enumerate() {
        let page_num = index + 1;
        let native = native_page_text(&page);

        if native.chars().count() < TYPED_TEXT_MIN_CHARS && ocr.is_available() {
            log::debug!("Page {page_num}: native text too short, applying OCR");
            let text = match ocr_page(&page, dpi, ocr) {
                Ok(text) => cleaner.clean_ocr_text(&text),
                Err(e) => {
                    log::warn!("OCR failed for page {page_num}: {e}");
                    String::new()
                }
            };
            records.push(PageRecord::new(page_num, text, ExtractMethod::Ocr));
        } else {
            let text = cleaner.clean(&native);
            records.push(PageRecord::new(page_num, text, ExtractMethod::Native));
        }
    }

    Ok(records)
}

/// Tier 3: rasterize and OCR every page. A failing page yields an empty
/// record rather than aborting the document.
fn extract_via_ocr(
    pages: &PdfPages<'_>,
    dpi: u32,
    ocr: &dyn OcrEngine,
    cleaner: &TextCleaner,
    path: &Path,
) -> Result<Vec<PageRecord>> {
    if !ocr.is_available() {
        log::warn!(
            "Scanned PDF {} but OCR engine '{}' is unavailable",
            path.display(),
            ocr.name()
        );
        return Ok(Vec::new());
    }

    let mut records = Vec::with_capacity(pages.len() as usize);
    for (index, page) in pages.iter().enumerate() {
        let page_num = index + 1;
        match ocr_page(&page, dpi, ocr) {
            Ok(text) => {
                let text = cleaner.clean_ocr_text(&text);
                records.push(PageRecord::new(page_num, text, ExtractMethod::Ocr));
            }
            Err(e) => {
                log::warn!("OCR failed for page {page_num} of {}: {e}", path.display());
                records.push(PageRecord::new(page_num, String::new(), ExtractMethod::Ocr));
            }
        }
    }

    Ok(records)
}

/// Render a page at the configured DPI and recognize it.
fn ocr_page(page: &PdfPage<'_>, dpi: u32, ocr: &dyn OcrEngine) -> Result<String> {
    let scale = dpi as f32 / PDF_POINTS_PER_INCH;
    let pixel_width = (page.width().value * scale) as i32;
    let pixel_height = (page.height().value * scale) as i32;

    let bitmap = page
        .render_with_config(
            &PdfRenderConfig::new()
                .set_target_width(pixel_width)
                .set_target_height(pixel_height)
                .render_form_data(true)
                .render_annotations(true),
        )
        .map_err(|e| PrepError::BackendError(format!("Failed to render PDF page: {e}")))?;

    let image = DynamicImage::ImageLuma8(preprocess_for_tables(&bitmap.as_image()));
    ocr.recognize(&image)
}

/// Trimmed embedded text of a page; empty when the text layer is absent.
fn native_page_text(page: &PdfPage<'_>) -> String {
    page.text()
        .map(|t| t.all().trim().to_string())
        .unwrap_or_default()
}

fn bind_pdfium() -> Result<Pdfium> {
    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|e| PrepError::BackendError(format!("Failed to bind pdfium library: {e}")))?;
    Ok(Pdfium::new(bindings))
}

fn pdfium_err(e: PdfiumError) -> PrepError {
    PrepError::BackendError(format!("pdfium error: {e}"))
}
