//! OCR capability and table-aware image preprocessing.
//!
//! The engine itself is injected behind [`OcrEngine`]; the default build
//! ships [`NoOcr`], and the `tesseract` feature adds [`TesseractOcr`] on
//! top of a system Tesseract install with `kor+eng` traineddata.

use docprep_core::{PrepError, Result};
use image::{DynamicImage, GrayImage, Luma};

/// Contrast multiplier applied around the midpoint before binarization
const CONTRAST_FACTOR: f32 = 2.5;

/// Midpoint used both as the contrast pivot and the binarization cut
const LUMA_MIDPOINT: f32 = 128.0;

/// Pixels above this become white, the rest black
const BINARIZE_THRESHOLD: u8 = 128;

/// Text recognition over a single page image.
///
/// `recognize` receives an already preprocessed image; callers apply
/// [`preprocess_for_tables`] first so every engine sees the same input.
pub trait OcrEngine: Send + Sync {
    /// Engine name for logs
    fn name(&self) -> &'static str;

    /// Whether the engine can actually run in this environment
    fn is_available(&self) -> bool;

    /// Recognize text in the image.
    ///
    /// # Errors
    /// Returns `OcrError` when the engine is missing or recognition fails.
    fn recognize(&self, image: &DynamicImage) -> Result<String>;
}

/// Placeholder engine for builds without OCR support.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOcr;

impl OcrEngine for NoOcr {
    #[inline]
    fn name(&self) -> &'static str {
        "none"
    }

    #[inline]
    fn is_available(&self) -> bool {
        false
    }

    fn recognize(&self, _image: &DynamicImage) -> Result<String> {
        Err(PrepError::OcrError(
            "no OCR engine configured".to_string(),
        ))
    }
}

/// Sharpen table borders and text edges before recognition.
///
/// Grayscale, contrast stretch around the midpoint, 3x3 sharpen, then a
/// fixed-threshold binarization. Tuned for scanned Korean office documents
/// where faint table rules otherwise merge with cell content.
#[must_use = "preprocessed image is returned, the input is not modified"]
pub fn preprocess_for_tables(image: &DynamicImage) -> GrayImage {
    let gray = image.to_luma8();

    let contrasted = GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        let p = f32::from(gray.get_pixel(x, y)[0]);
        let stretched = (p - LUMA_MIDPOINT) * CONTRAST_FACTOR + LUMA_MIDPOINT;
        Luma([stretched.clamp(0.0, 255.0) as u8])
    });

    let sharpened = imageproc::filter::sharpen3x3(&contrasted);

    GrayImage::from_fn(sharpened.width(), sharpened.height(), |x, y| {
        if sharpened.get_pixel(x, y)[0] > BINARIZE_THRESHOLD {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}

/// Tesseract-backed engine (`tesseract` feature).
///
/// Initializes a fresh Tesseract handle per call; the handle is not `Sync`
/// and page-level init cost is negligible next to recognition itself.
#[cfg(feature = "tesseract")]
pub struct TesseractOcr {
    lang: String,
}

#[cfg(feature = "tesseract")]
impl TesseractOcr {
    /// Engine for mixed Korean/English documents
    #[must_use = "engine is created but not used"]
    pub fn new() -> Self {
        Self::with_language("kor+eng")
    }

    /// Engine with an explicit Tesseract language string
    #[must_use = "engine is created but not used"]
    pub fn with_language(lang: impl Into<String>) -> Self {
        Self { lang: lang.into() }
    }
}

#[cfg(feature = "tesseract")]
impl Default for TesseractOcr {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "tesseract")]
impl OcrEngine for TesseractOcr {
    #[inline]
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn is_available(&self) -> bool {
        leptess::LepTess::new(None, &self.lang).is_ok()
    }

    fn recognize(&self, image: &DynamicImage) -> Result<String> {
        let mut png = Vec::new();
        image
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .map_err(|e| PrepError::OcrError(format!("Failed to encode page image: {e}")))?;

        let mut engine = leptess::LepTess::new(None, &self.lang)
            .map_err(|e| PrepError::OcrError(format!("Failed to init Tesseract: {e}")))?;

        // PSM 6: assume a single uniform block of text
        if let Err(e) = engine.set_variable(leptess::Variable::TesseditPagesegMode, "6") {
            log::warn!("Failed to set Tesseract page segmentation mode: {e}");
        }

        engine
            .set_image_from_mem(&png)
            .map_err(|e| PrepError::OcrError(format!("Failed to load page image: {e}")))?;

        let text = engine
            .get_utf8_text()
            .map_err(|e| PrepError::OcrError(format!("Recognition failed: {e}")))?;

        Ok(text.trim().to_string())
    }
}
