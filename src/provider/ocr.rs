//! Injected OCR interfaces and their subprocess defaults.
//!
//! The pipeline never talks to an OCR binary directly; it goes through
//! the [`PageRenderer`] and [`OcrEngine`] traits so tests can substitute
//! fakes and deployments can swap engines. The default implementations
//! shell out to `pdftoppm` (poppler-utils) and `tesseract`, the same
//! pair of tools the drawings this crate targets are usually processed
//! with.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Error, Result};

/// Renders one PDF page to an image for OCR.
pub trait PageRenderer: Send + Sync {
    /// Render `page` (1-based) of `pdf` at `dpi` into `scratch`,
    /// returning the image path.
    fn render_page(&self, pdf: &Path, page: u32, dpi: u32, scratch: &Path) -> Result<PathBuf>;
}

/// Recognizes text in a rendered page image.
pub trait OcrEngine: Send + Sync {
    /// Run recognition over the image and return best-effort text.
    fn recognize(&self, image: &Path) -> Result<String>;
}

/// Page renderer backed by the `pdftoppm` binary.
#[derive(Debug, Clone, Default)]
pub struct PdftoppmRenderer;

impl PdftoppmRenderer {
    /// Create a renderer.
    pub fn new() -> Self {
        Self
    }

    /// Check whether `pdftoppm` can be invoked.
    pub fn is_available() -> bool {
        let found = Command::new("pdftoppm").arg("-v").output().is_ok();
        if !found {
            log::debug!("pdftoppm not found - install poppler-utils for OCR support");
        }
        found
    }
}

impl PageRenderer for PdftoppmRenderer {
    fn render_page(&self, pdf: &Path, page: u32, dpi: u32, scratch: &Path) -> Result<PathBuf> {
        let prefix = scratch.join(format!("page-{}", page));
        let page_arg = page.to_string();

        let output = Command::new("pdftoppm")
            .args(["-png", "-r"])
            .arg(dpi.to_string())
            .args(["-f", &page_arg, "-l", &page_arg])
            .arg(pdf)
            .arg(&prefix)
            .output()
            .map_err(|e| Error::PageRender(format!("failed to run pdftoppm: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::PageRender(format!(
                "pdftoppm failed on page {}: {}",
                page,
                stderr.trim()
            )));
        }

        // pdftoppm appends its own zero-padded page suffix; the scratch
        // directory is per call, so the single matching png is ours
        let image = std::fs::read_dir(scratch)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .find(|path| path.extension().is_some_and(|ext| ext == "png"));

        image.ok_or_else(|| {
            Error::PageRender(format!("pdftoppm produced no image for page {}", page))
        })
    }
}

/// OCR engine backed by the `tesseract` binary.
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    lang: String,
    psm: u8,
}

impl TesseractOcr {
    /// Create an engine for the given language code.
    ///
    /// Page segmentation mode defaults to 6 (uniform block of text),
    /// which handles schedule tables on drawings better than automatic
    /// segmentation.
    pub fn new(lang: impl Into<String>) -> Self {
        Self {
            lang: lang.into(),
            psm: 6,
        }
    }

    /// Override the tesseract page segmentation mode.
    pub fn with_psm(mut self, psm: u8) -> Self {
        self.psm = psm;
        self
    }

    /// Check whether `tesseract` can be invoked.
    pub fn is_available() -> bool {
        let found = Command::new("tesseract").arg("--version").output().is_ok();
        if !found {
            log::debug!("tesseract not found - install tesseract-ocr for OCR support");
        }
        found
    }
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self::new("eng")
    }
}

impl OcrEngine for TesseractOcr {
    fn recognize(&self, image: &Path) -> Result<String> {
        let output = Command::new("tesseract")
            .arg(image)
            .arg("stdout")
            .args(["-l", &self.lang])
            .args(["--psm", &self.psm.to_string()])
            .output()
            .map_err(|e| Error::Ocr(format!("failed to run tesseract: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Ocr(format!("tesseract failed: {}", stderr.trim())));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}
