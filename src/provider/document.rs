//! Loaded source document.

use std::io::Write;
use std::path::{Path, PathBuf};

use lopdf::Document as LopdfDocument;

use crate::detect;
use crate::error::{Error, Result};

/// A PDF document opened for one extraction run.
///
/// Wraps the parsed `lopdf` document together with an on-disk path the
/// page renderer can address. Byte input is spilled to a temp file that
/// lives as long as this value. Immutable once loaded.
pub struct SourceDocument {
    doc: LopdfDocument,
    path: PathBuf,
    _spill: Option<tempfile::NamedTempFile>,
}

impl SourceDocument {
    /// Open a PDF file.
    ///
    /// This is the only fatal failure point of the pipeline: a file
    /// that cannot be opened or parsed yields an error and no partial
    /// result.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        detect::ensure_pdf_file(path)?;

        let doc = LopdfDocument::load(path).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;

        Ok(Self {
            doc,
            path: path.to_path_buf(),
            _spill: None,
        })
    }

    /// Open a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        detect::ensure_pdf_bytes(data)?;

        let doc = LopdfDocument::load_mem(data).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;

        let mut spill = tempfile::Builder::new()
            .prefix("rebarex-")
            .suffix(".pdf")
            .tempfile()?;
        spill.write_all(data)?;
        spill.flush()?;

        Ok(Self {
            doc,
            path: spill.path().to_path_buf(),
            _spill: Some(spill),
        })
    }

    /// 1-based page numbers, in document order.
    pub fn page_numbers(&self) -> Vec<u32> {
        self.doc.get_pages().keys().copied().collect()
    }

    /// Number of pages.
    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Extract the embedded text layer of one page.
    pub fn native_text(&self, page: u32) -> Result<String> {
        self.doc
            .extract_text(&[page])
            .map_err(|e| Error::PdfParse(format!("page {}: {}", page, e)))
    }

    /// On-disk location the page renderer can address.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the document is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.doc.is_encrypted()
    }
}
