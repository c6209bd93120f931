//! Page text provider: native extraction with OCR fallback.
//!
//! For each page the provider tries the embedded text layer first and
//! falls back to rendering plus OCR when the layer is missing or
//! unusable. A page where both routes fail contributes an empty text
//! string and a warning; it never aborts the document.

mod document;
mod ocr;

pub use document::SourceDocument;
pub use ocr::{OcrEngine, PageRenderer, PdftoppmRenderer, TesseractOcr};

use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::model::{PageWarning, TextSource};
use crate::options::{CancelToken, ExtractOptions};
use crate::pattern::OcrCleaner;

/// Text produced for one page, tagged with its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    /// 1-based page number
    pub number: u32,

    /// Page text; empty when both extraction routes failed
    pub text: String,

    /// Where the text came from
    pub source: TextSource,
}

/// Produces per-page text for a document.
pub struct PageTextProvider {
    options: ExtractOptions,
    renderer: Arc<dyn PageRenderer>,
    ocr: Arc<dyn OcrEngine>,
    cleaner: OcrCleaner,
    cancel: CancelToken,
}

impl PageTextProvider {
    /// Create a provider with the default subprocess OCR stack.
    pub fn new(options: ExtractOptions) -> Self {
        let ocr = TesseractOcr::new(options.lang.clone());
        Self::with_engines(options, Arc::new(PdftoppmRenderer::new()), Arc::new(ocr))
    }

    /// Create a provider with injected rendering and OCR engines.
    pub fn with_engines(
        options: ExtractOptions,
        renderer: Arc<dyn PageRenderer>,
        ocr: Arc<dyn OcrEngine>,
    ) -> Self {
        Self {
            options,
            renderer,
            ocr,
            cleaner: OcrCleaner::new(),
            cancel: CancelToken::new(),
        }
    }

    /// Attach a cancellation token, checked at page boundaries.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Produce text for every page, in page order.
    ///
    /// Never fails as a whole: per-page problems become warnings and an
    /// empty text entry. OCR pages may be processed in parallel, but
    /// the returned vector is always in page order and its content does
    /// not depend on worker completion order.
    pub fn provide(&self, doc: &SourceDocument) -> (Vec<PageText>, Vec<PageWarning>) {
        let numbers = doc.page_numbers();
        let mut pages: Vec<PageText> = Vec::with_capacity(numbers.len());
        let mut warnings = Vec::new();

        // index into `pages` for every page that needs the OCR fallback
        let mut pending: Vec<(usize, u32)> = Vec::new();

        for &number in &numbers {
            if self.cancel.is_cancelled() {
                warnings.push(PageWarning::new(number, "cancelled before page was processed"));
                pages.push(PageText {
                    number,
                    text: String::new(),
                    source: TextSource::Native,
                });
                continue;
            }

            match doc.native_text(number) {
                Ok(text) if is_usable(&text) => pages.push(PageText {
                    number,
                    text,
                    source: TextSource::Native,
                }),
                Ok(_) => {
                    pending.push((pages.len(), number));
                    pages.push(placeholder(number));
                }
                Err(e) => {
                    log::debug!("native extraction failed on page {}: {}", number, e);
                    pending.push((pages.len(), number));
                    pages.push(placeholder(number));
                }
            }
        }

        if pending.is_empty() {
            return (pages, warnings);
        }

        log::info!(
            "{} of {} pages have no usable text layer, running OCR at {} dpi",
            pending.len(),
            numbers.len(),
            self.options.dpi
        );

        let outcomes: Vec<(usize, u32, Result<String>)> = if self.options.parallel {
            pending
                .par_iter()
                .map(|&(index, number)| (index, number, self.ocr_page(doc.path(), number)))
                .collect()
        } else {
            pending
                .iter()
                .map(|&(index, number)| (index, number, self.ocr_page(doc.path(), number)))
                .collect()
        };

        for (index, number, outcome) in outcomes {
            match outcome {
                Ok(text) => {
                    pages[index].text = self.cleaner.clean(&text);
                }
                Err(e) => {
                    log::warn!("page {} degraded to empty text: {}", number, e);
                    warnings.push(PageWarning::new(number, e.to_string()));
                }
            }
        }

        (pages, warnings)
    }

    /// OCR one page under the configured timeout.
    ///
    /// The render/recognize work runs on a detached worker thread; on
    /// timeout the worker is left to finish on its own and the page
    /// degrades to an error here.
    fn ocr_page(&self, pdf: &Path, page: u32) -> Result<String> {
        if self.cancel.is_cancelled() {
            return Err(Error::Ocr("cancelled before OCR was started".to_string()));
        }

        let (tx, rx) = crossbeam_channel::bounded(1);
        let renderer = Arc::clone(&self.renderer);
        let engine = Arc::clone(&self.ocr);
        let pdf = pdf.to_path_buf();
        let dpi = self.options.dpi;

        std::thread::spawn(move || {
            let result = render_and_recognize(renderer.as_ref(), engine.as_ref(), &pdf, page, dpi);
            let _ = tx.send(result);
        });

        match rx.recv_timeout(self.options.ocr_timeout) {
            Ok(result) => result,
            Err(_) => Err(Error::Ocr(format!(
                "OCR timed out after {}s",
                self.options.ocr_timeout.as_secs()
            ))),
        }
    }
}

fn render_and_recognize(
    renderer: &dyn PageRenderer,
    engine: &dyn OcrEngine,
    pdf: &Path,
    page: u32,
    dpi: u32,
) -> Result<String> {
    let scratch = tempfile::tempdir()?;
    let image = renderer.render_page(pdf, page, dpi, scratch.path())?;
    engine.recognize(&image)
}

fn placeholder(number: u32) -> PageText {
    PageText {
        number,
        text: String::new(),
        source: TextSource::Ocr,
    }
}

/// A page's native text is usable if it contains at least one
/// alphanumeric character once whitespace is ignored.
fn is_usable(text: &str) -> bool {
    text.chars().any(char::is_alphanumeric)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usable_text() {
        assert!(is_usable("P1 12Rfi8/10cm"));
        assert!(is_usable("  7  "));
    }

    #[test]
    fn test_unusable_text() {
        assert!(!is_usable(""));
        assert!(!is_usable("   \n\t  "));
        assert!(!is_usable(" -- ~~ "));
    }
}
