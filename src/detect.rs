//! PDF format detection.
//!
//! A cheap header check performed before handing the input to `lopdf`,
//! so that an arbitrary non-PDF file fails fast with
//! [`Error::UnknownFormat`] instead of a parser error deep inside loading.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Validate that a file starts with a PDF header.
///
/// # Arguments
/// * `path` - Path to the candidate file
///
/// # Returns
/// * `Ok(())` if the file begins with `%PDF-`
/// * `Err(Error::UnknownFormat)` otherwise
pub fn ensure_pdf_file<P: AsRef<Path>>(path: P) -> Result<()> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut header = [0u8; 8];
    let read = reader.read(&mut header)?;
    ensure_pdf_bytes(&header[..read])
}

/// Validate that a byte slice starts with a PDF header.
pub fn ensure_pdf_bytes(data: &[u8]) -> Result<()> {
    if data.len() < PDF_MAGIC.len() || !data.starts_with(PDF_MAGIC) {
        return Err(Error::UnknownFormat);
    }
    Ok(())
}

/// Check whether bytes look like a PDF without producing an error.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    ensure_pdf_bytes(data).is_ok()
}
