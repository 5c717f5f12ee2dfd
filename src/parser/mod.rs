//! Tokenizers: turn input bytes into an ordered sequence of lines.
//!
//! Two producers share one [`Tokenizer`] interface so the segmenter and
//! the extractors never care where a line came from.

mod backend;
mod glyph;
mod layout;
mod lines;
mod options;
mod text;

pub use backend::{
    decode_text_simple, BackendFontInfo, ContentOp, LopdfBackend, PageId, PdfBackend, PdfValue,
};
pub use glyph::{GlyphReader, GlyphRun};
pub use layout::{blocks_from_runs, LayoutTokenizer};
pub use lines::LineReconstructor;
pub use options::{ErrorMode, ParseOptions};
pub use text::PlainTextTokenizer;

use std::collections::HashMap;
use std::sync::Arc;

use crate::detect::MediaType;
use crate::error::{Error, Result};
use crate::model::{Block, Line};

/// Which tokenizer produced a document's lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Positioned blocks from a PDF
    Layout,
    /// Newline-delimited text without geometry
    PlainText,
}

/// The line sequence of one document.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenizedDocument {
    origin: Origin,
    lines: Vec<Line>,
}

impl TokenizedDocument {
    pub fn new(origin: Origin, lines: Vec<Line>) -> Self {
        Self { origin, lines }
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// All blocks in line order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.lines.iter().flat_map(|l| l.blocks().iter())
    }

    /// Whole-document text, one line per row.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A producer of lines for one or more media types.
pub trait Tokenizer: Send + Sync {
    /// Name of this tokenizer.
    fn name(&self) -> &str;

    /// Media types this tokenizer accepts.
    fn media_types(&self) -> &[MediaType];

    /// Tokenize a byte payload.
    fn tokenize(&self, bytes: &[u8], options: &ParseOptions) -> Result<TokenizedDocument>;

    /// Check if this tokenizer accepts the given media type.
    fn supports(&self, media_type: MediaType) -> bool {
        self.media_types().contains(&media_type)
    }
}

/// Registry mapping media types to tokenizers.
pub struct TokenizerRegistry {
    tokenizers: HashMap<MediaType, Arc<dyn Tokenizer>>,
}

impl TokenizerRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            tokenizers: HashMap::new(),
        }
    }

    /// Create a registry with the layout and plain-text tokenizers.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(LayoutTokenizer::new()));
        registry.register(Arc::new(PlainTextTokenizer::new()));
        registry
    }

    /// Register a tokenizer for all its media types, replacing any
    /// previous registration.
    pub fn register(&mut self, tokenizer: Arc<dyn Tokenizer>) {
        for media_type in tokenizer.media_types() {
            self.tokenizers.insert(*media_type, tokenizer.clone());
        }
    }

    /// Get the tokenizer for a media type.
    pub fn get(&self, media_type: MediaType) -> Option<Arc<dyn Tokenizer>> {
        self.tokenizers.get(&media_type).cloned()
    }

    /// Check if a media type is supported.
    pub fn supports(&self, media_type: MediaType) -> bool {
        self.tokenizers.contains_key(&media_type)
    }

    /// Tokenize bytes with the tokenizer registered for `media_type`.
    pub fn tokenize(
        &self,
        bytes: &[u8],
        media_type: MediaType,
        options: &ParseOptions,
    ) -> Result<TokenizedDocument> {
        let tokenizer = self
            .get(media_type)
            .ok_or_else(|| Error::UnsupportedFormat(media_type.as_str().to_string()))?;
        log::debug!("Tokenizing with '{}'", tokenizer.name());
        tokenizer.tokenize(bytes, options)
    }
}

impl Default for TokenizerRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_with_defaults() {
        let registry = TokenizerRegistry::with_defaults();
        assert!(registry.supports(MediaType::Pdf));
        assert!(registry.supports(MediaType::PlainText));
        assert_eq!(registry.get(MediaType::Pdf).unwrap().name(), "layout");
        assert_eq!(registry.get(MediaType::PlainText).unwrap().name(), "text");
    }

    #[test]
    fn test_empty_registry_rejects() {
        let registry = TokenizerRegistry::new();
        let result = registry.tokenize(b"x", MediaType::PlainText, &ParseOptions::default());
        assert!(matches!(result, Err(Error::UnsupportedFormat(_))));
    }

    #[test]
    fn test_tokenized_document_text() {
        let registry = TokenizerRegistry::with_defaults();
        let doc = registry
            .tokenize(b"a\nb", MediaType::PlainText, &ParseOptions::default())
            .unwrap();
        assert_eq!(doc.origin(), Origin::PlainText);
        assert_eq!(doc.text(), "a\nb");
        assert_eq!(doc.blocks().count(), 2);
    }
}
