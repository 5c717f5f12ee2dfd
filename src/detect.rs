//! Media type resolution and PDF format detection.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Input formats the engine can tokenize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    /// `application/pdf`
    Pdf,
    /// `text/plain`
    PlainText,
}

impl MediaType {
    /// Canonical MIME string.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Pdf => "application/pdf",
            MediaType::PlainText => "text/plain",
        }
    }

    /// Resolve a declared media type string.
    ///
    /// Matching is case-insensitive and ignores parameters such as
    /// `; charset=utf-8`.
    pub fn from_declared(declared: &str) -> Result<Self> {
        let essence = declared
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            "application/pdf" | "application/x-pdf" => Ok(MediaType::Pdf),
            "text/plain" => Ok(MediaType::PlainText),
            _ => Err(Error::UnsupportedFormat(declared.to_string())),
        }
    }

    /// Resolve a media type from a file extension (without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(MediaType::Pdf),
            "txt" | "text" => Some(MediaType::PlainText),
            _ => None,
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MediaType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_declared(s)
    }
}

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const PDF_MAGIC_LEN: usize = 5;
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Check if bytes start with a valid PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    if data.len() < PDF_MAGIC_LEN + VERSION_LEN || !data.starts_with(PDF_MAGIC) {
        return false;
    }
    let version = &data[PDF_MAGIC_LEN..PDF_MAGIC_LEN + VERSION_LEN];
    version[0].is_ascii_digit() && version[1] == b'.' && version[2].is_ascii_digit()
}

/// Sniff the media type from content.
///
/// Anything that is not a PDF and decodes as UTF-8 is treated as plain text.
pub fn sniff_media_type(data: &[u8]) -> Result<MediaType> {
    if is_pdf_bytes(data) {
        return Ok(MediaType::Pdf);
    }
    match std::str::from_utf8(data) {
        Ok(_) => Ok(MediaType::PlainText),
        // A header cut in the middle of a multi-byte character is still text.
        Err(e) if e.error_len().is_none() => Ok(MediaType::PlainText),
        Err(_) => Err(Error::UnsupportedFormat(
            "unrecognized binary content".to_string(),
        )),
    }
}

/// Determine the media type of a file from its extension, falling back
/// to sniffing its first bytes.
pub fn detect_media_type_from_path<P: AsRef<Path>>(path: P) -> Result<MediaType> {
    let path = path.as_ref();
    if let Some(media_type) = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(MediaType::from_extension)
    {
        return Ok(media_type);
    }

    let mut header = Vec::with_capacity(512);
    File::open(path)?.take(512).read_to_end(&mut header)?;
    sniff_media_type(&header)
}
