//! Standalone image extraction via OCR.

use docprep_clean::TextCleaner;
use docprep_core::{ExtractMethod, PageRecord, PrepError, Result};
use image::DynamicImage;
use std::path::Path;

use crate::ocr::{preprocess_for_tables, OcrEngine};

/// OCR a single image file into one page record.
///
/// # Errors
/// Returns `BackendError` when the image cannot be decoded, `OcrError`
/// when recognition fails.
pub fn extract_image(
    path: &Path,
    ocr: &dyn OcrEngine,
    cleaner: &TextCleaner,
) -> Result<Vec<PageRecord>> {
    if !ocr.is_available() {
        return Err(PrepError::OcrError(format!(
            "OCR engine '{}' is not available for image input",
            ocr.name()
        )));
    }

    let image = image::open(path)
        .map_err(|e| PrepError::BackendError(format!("Failed to decode image: {e}")))?;

    let processed = DynamicImage::ImageLuma8(preprocess_for_tables(&image));
    let text = ocr.recognize(&processed)?;
    let text = cleaner.clean_ocr_text(&text);

    Ok(vec![PageRecord::new(1, text, ExtractMethod::Ocr)])
}
