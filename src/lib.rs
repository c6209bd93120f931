//! # rebarex
//!
//! Extraction of rebar material schedules from engineering PDF
//! drawings.
//!
//! A drawing labels groups of related bar specs with short *circle
//! codes* (`P1`, `T3`, `UT7a`); each group lists *material codes* like
//! `39Rfi12/15cm,L=2.5m`. This library reads a PDF page by page —
//! straight from the embedded text layer when there is one, through
//! OCR when there is not — and pairs the two token kinds into an
//! association set that tolerates OCR noise and formatting variation.
//!
//! ## Quick Start
//!
//! ```no_run
//! use rebarex::{extract_file, CircleCodeSet};
//!
//! fn main() -> rebarex::Result<()> {
//!     let result = extract_file("drawings.pdf")?;
//!
//!     let requested = CircleCodeSet::parse("P1,T3");
//!     for assoc in result.filter_by_circle_codes(&requested) {
//!         for material in &assoc.materials {
//!             println!("{}: {} (page {})",
//!                 assoc.circle.as_ref().unwrap(), material, assoc.page);
//!         }
//!     }
//!
//!     for warning in &result.warnings {
//!         eprintln!("page {}: {}", warning.page, warning.reason);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Native text first**: OCR only runs for pages with no usable
//!   embedded text
//! - **Tolerant recognizers**: OCR digit confusions, loose whitespace
//!   and decimal commas are handled in one pattern library
//! - **Graceful degradation**: a page where both routes fail becomes a
//!   warning, never an aborted document
//! - **Parallel OCR**: pages render and recognize on a Rayon pool,
//!   reassembled in page order
//! - **Injectable OCR stack**: `pdftoppm`/`tesseract` by default,
//!   swappable for fakes in tests

pub mod detect;
pub mod engine;
pub mod error;
pub mod model;
pub mod options;
pub mod pattern;
pub mod provider;

// Re-export commonly used types
pub use engine::{AssociationEngine, EngineOutput};
pub use error::{Error, Result};
pub use model::{
    Association, CircleCode, CircleCodeSet, ExportRow, ExtractStats, ExtractionResult,
    MaterialCode, MaterialRecord, PageSummary, PageWarning, TextSource,
};
pub use options::{CancelToken, DedupScope, ExtractOptions};
pub use pattern::{CircleMatch, MaterialMatch, OcrCleaner, PatternLibrary, SegmentMatches};
pub use provider::{
    OcrEngine, PageRenderer, PageText, PageTextProvider, PdftoppmRenderer, SourceDocument,
    TesseractOcr,
};

use std::path::Path;
use std::sync::Arc;

/// Extract a PDF file with default options.
///
/// # Example
///
/// ```no_run
/// use rebarex::extract_file;
///
/// let result = extract_file("drawings.pdf").unwrap();
/// println!("{} associations", result.associations.len());
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<ExtractionResult> {
    Extractor::new().extract(path)
}

/// Extract a PDF file with custom options.
pub fn extract_file_with_options<P: AsRef<Path>>(
    path: P,
    options: ExtractOptions,
) -> Result<ExtractionResult> {
    Extractor::with_options(options).extract(path)
}

/// Extract a PDF from bytes with default options.
pub fn extract_bytes(data: &[u8]) -> Result<ExtractionResult> {
    Extractor::new().extract_bytes(data)
}

/// Extract a PDF from bytes with custom options.
pub fn extract_bytes_with_options(data: &[u8], options: ExtractOptions) -> Result<ExtractionResult> {
    Extractor::with_options(options).extract_bytes(data)
}

/// Builder for extraction runs.
///
/// # Example
///
/// ```no_run
/// use rebarex::Extractor;
///
/// let result = Extractor::new()
///     .with_dpi(500)
///     .with_lookahead(3)
///     .sequential()
///     .extract("scanned.pdf")?;
/// # Ok::<(), rebarex::Error>(())
/// ```
pub struct Extractor {
    options: ExtractOptions,
    renderer: Option<Arc<dyn PageRenderer>>,
    ocr: Option<Arc<dyn OcrEngine>>,
    cancel: CancelToken,
}

impl Extractor {
    /// Create an extractor with default options.
    pub fn new() -> Self {
        Self::with_options(ExtractOptions::default())
    }

    /// Create an extractor from prepared options.
    pub fn with_options(options: ExtractOptions) -> Self {
        Self {
            options,
            renderer: None,
            ocr: None,
            cancel: CancelToken::new(),
        }
    }

    /// Set the OCR rendering resolution.
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.options.dpi = dpi;
        self
    }

    /// Set the OCR language code.
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.options.lang = lang.into();
        self
    }

    /// Set the proximity lookahead window, in segments.
    pub fn with_lookahead(mut self, segments: usize) -> Self {
        self.options.lookahead = segments;
        self
    }

    /// Disable parallel OCR.
    pub fn sequential(mut self) -> Self {
        self.options.parallel = false;
        self
    }

    /// Set the per-page OCR timeout.
    pub fn with_ocr_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.options.ocr_timeout = timeout;
        self
    }

    /// Collapse identical pairs across the whole document.
    pub fn document_dedup(mut self) -> Self {
        self.options.dedup = DedupScope::Document;
        self
    }

    /// Inject a page renderer (replaces the `pdftoppm` default).
    pub fn with_renderer(mut self, renderer: Arc<dyn PageRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Inject an OCR engine (replaces the `tesseract` default).
    pub fn with_ocr_engine(mut self, engine: Arc<dyn OcrEngine>) -> Self {
        self.ocr = Some(engine);
        self
    }

    /// Attach a cancellation token, checked at page boundaries.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Extract a PDF file.
    pub fn extract<P: AsRef<Path>>(&self, path: P) -> Result<ExtractionResult> {
        let doc = SourceDocument::open(path)?;
        self.run(&doc)
    }

    /// Extract a PDF from bytes.
    pub fn extract_bytes(&self, data: &[u8]) -> Result<ExtractionResult> {
        let doc = SourceDocument::from_bytes(data)?;
        self.run(&doc)
    }

    /// Run the pipeline over an opened document.
    pub fn run(&self, doc: &SourceDocument) -> Result<ExtractionResult> {
        let provider = self.build_provider().with_cancel_token(self.cancel.clone());
        let (pages, warnings) = provider.provide(doc);

        let engine = AssociationEngine::new(&self.options);
        let output = engine.run(&pages);

        let summaries: Vec<PageSummary> = pages
            .iter()
            .map(|p| PageSummary {
                number: p.number,
                source: p.source,
            })
            .collect();

        let stats = ExtractStats {
            native_pages: summaries
                .iter()
                .filter(|s| s.source == TextSource::Native)
                .count(),
            ocr_pages: summaries
                .iter()
                .filter(|s| s.source == TextSource::Ocr)
                .count(),
            rejected_tokens: output.rejected_tokens,
        };

        log::info!(
            "extracted {} associations, {} materials ({} orphans), {} warnings",
            output.associations.len(),
            output.materials.len(),
            output.materials.iter().filter(|m| m.is_orphan()).count(),
            warnings.len()
        );

        Ok(ExtractionResult {
            pages: summaries,
            associations: output.associations,
            materials: output.materials,
            warnings,
            stats,
        })
    }

    fn build_provider(&self) -> PageTextProvider {
        match (self.renderer.as_ref(), self.ocr.as_ref()) {
            (Some(renderer), Some(ocr)) => PageTextProvider::with_engines(
                self.options.clone(),
                Arc::clone(renderer),
                Arc::clone(ocr),
            ),
            (Some(renderer), None) => PageTextProvider::with_engines(
                self.options.clone(),
                Arc::clone(renderer),
                Arc::new(TesseractOcr::new(self.options.lang.clone())),
            ),
            (None, Some(ocr)) => PageTextProvider::with_engines(
                self.options.clone(),
                Arc::new(PdftoppmRenderer::new()),
                Arc::clone(ocr),
            ),
            (None, None) => PageTextProvider::new(self.options.clone()),
        }
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extractor_builder() {
        let extractor = Extractor::new()
            .with_dpi(500)
            .with_lookahead(3)
            .sequential()
            .document_dedup();

        assert_eq!(extractor.options.dpi, 500);
        assert_eq!(extractor.options.lookahead, 3);
        assert!(!extractor.options.parallel);
        assert_eq!(extractor.options.dedup, DedupScope::Document);
    }

    #[test]
    fn test_extract_bytes_empty_data() {
        let data: [u8; 0] = [];
        let result = extract_bytes(&data);
        assert!(result.is_err());
    }

    #[test]
    fn test_extract_bytes_unknown_magic() {
        let result = extract_bytes(b"Not a PDF file at all");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_extract_missing_file() {
        let result = extract_file("/nonexistent/drawing.pdf");
        assert!(result.is_err());
    }
}
