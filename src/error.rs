//! Error types for the rebarex library.

use std::io;
use thiserror::Error;

/// Result type alias for rebarex operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during extraction.
///
/// Only document-open failures are fatal to a run. Per-page extraction
/// problems (failed rendering, unavailable OCR, timeouts) degrade to
/// [`PageWarning`](crate::model::PageWarning) records on the result and
/// never surface through this enum.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading the document or writing scratch files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// Error parsing the PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted and cannot be read.
    #[error("Document is encrypted")]
    Encrypted,

    /// Page rendering (PDF page to image) failed.
    #[error("Page render error: {0}")]
    PageRender(String),

    /// The OCR engine failed or is not installed.
    #[error("OCR error: {0}")]
    Ocr(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Encrypted;
        assert_eq!(err.to_string(), "Document is encrypted");

        let err = Error::Ocr("tesseract not found".to_string());
        assert_eq!(err.to_string(), "OCR error: tesseract not found");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
