//! Error types for the pdfstruct library.

use std::io;
use thiserror::Error;

/// Result type alias for pdfstruct operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during structured extraction.
///
/// Only document-level failures (open, format, serialization, output I/O)
/// surface to callers. Strategy-level failures are caught at the owning
/// extractor and collapse to empty results for that page.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading the document or writing artifacts.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version header is malformed.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure. Fatal when raised at document open.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Error extracting text content from a page.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// A table-detection strategy failed internally.
    #[error("Table extraction error: {0}")]
    TableExtract(String),

    /// Error decoding or persisting an embedded image.
    #[error("Image extraction error: {0}")]
    ImageExtract(String),

    /// Error serializing the structured record.
    #[error("Serialization error: {0}")]
    Serialize(String),
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

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialize(err.to_string())
    }
}
