//! Extraction options and cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Options for a single extraction run.
///
/// Replaces the original tool's process-wide path and resolution globals:
/// everything tunable is carried here and handed to the pipeline at
/// construction time.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Rendering resolution for the OCR fallback, in DPI
    pub dpi: u32,

    /// OCR language code passed to the engine (tesseract `-l`)
    pub lang: String,

    /// How many segments after a circle code's own segment are still
    /// inside its proximity window
    pub lookahead: usize,

    /// Whether pages may be OCR'd in parallel
    pub parallel: bool,

    /// Per-page OCR budget; a page that exceeds it degrades to an
    /// empty-text warning
    pub ocr_timeout: Duration,

    /// Scope for collapsing identical (circle, material) pairs
    pub dedup: DedupScope,
}

impl ExtractOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the OCR rendering resolution.
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Set the OCR language code.
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    /// Set the proximity lookahead window, in segments.
    pub fn with_lookahead(mut self, segments: usize) -> Self {
        self.lookahead = segments;
        self
    }

    /// Disable parallel OCR.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set the per-page OCR timeout.
    pub fn with_ocr_timeout(mut self, timeout: Duration) -> Self {
        self.ocr_timeout = timeout;
        self
    }

    /// Collapse identical pairs across the whole document instead of
    /// per page.
    pub fn document_dedup(mut self) -> Self {
        self.dedup = DedupScope::Document;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            dpi: 300,
            lang: "eng".to_string(),
            lookahead: 2,
            parallel: true,
            ocr_timeout: Duration::from_secs(120),
            dedup: DedupScope::Page,
        }
    }
}

/// Scope for deduplicating identical (circle, material) pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DedupScope {
    /// Collapse duplicates within one page; the same pair on another
    /// page stays distinct
    #[default]
    Page,
    /// Collapse duplicates across the whole document
    Document,
}

/// Cooperative cancellation flag, checked at page boundaries.
///
/// Cancelling never interrupts a page already being processed; it only
/// prevents further pages from starting.
///
/// # Example
///
/// ```
/// use rebarex::CancelToken;
///
/// let token = CancelToken::new();
/// let handle = token.clone();
/// // hand `handle` to the pipeline, keep `token` to cancel from elsewhere
/// token.cancel();
/// assert!(handle.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a new, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Check whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
