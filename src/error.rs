//! Error types for resume parsing.

use std::io;
use thiserror::Error;

/// Result type alias for resume-parser operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced at the parse boundary.
///
/// Extractors never fail; only decoding and input validation do.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading input files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The declared media type is neither PDF nor plain text.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Decoding succeeded but produced no usable text.
    #[error("No text content found in document")]
    NoTextContent,

    /// The PDF decoder rejected the byte stream.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// A vocabulary pattern or configuration file is invalid.
    #[error("Invalid vocabulary: {0}")]
    InvalidVocabulary(String),

    /// Error during rendering (JSON, text).
    #[error("Rendering error: {0}")]
    Render(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            // Decoding works on in-memory bytes; stream failures are decode failures.
            lopdf::Error::IO(e) => Error::Decode(e.to_string()),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::Decode(err.to_string()),
        }
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error::InvalidVocabulary(err.to_string())
    }
}
