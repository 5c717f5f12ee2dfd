//! Plain-text tokenizer.

use super::options::ParseOptions;
use super::{Origin, TokenizedDocument, Tokenizer};
use crate::detect::MediaType;
use crate::error::{Error, Result};
use crate::model::{Block, Line};

/// Tokenizer for `text/plain` input.
///
/// Each newline-delimited segment becomes one line wrapping a single
/// geometry-free block whose `y` is the segment index. Blank segments
/// produce no line but still consume an index.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextTokenizer;

impl PlainTextTokenizer {
    pub fn new() -> Self {
        Self
    }

    /// Tokenize already-decoded text.
    pub fn tokenize_str(&self, text: &str) -> Vec<Line> {
        let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
        text.split('\n')
            .enumerate()
            .filter_map(|(index, segment)| {
                let segment = segment.trim();
                if segment.is_empty() {
                    None
                } else {
                    Some(Line::from_blocks(vec![Block::synthetic(segment, index)]))
                }
            })
            .collect()
    }
}

impl Tokenizer for PlainTextTokenizer {
    fn name(&self) -> &str {
        "text"
    }

    fn media_types(&self) -> &[MediaType] {
        &[MediaType::PlainText]
    }

    fn tokenize(&self, bytes: &[u8], _options: &ParseOptions) -> Result<TokenizedDocument> {
        let text = String::from_utf8_lossy(bytes);
        let lines = self.tokenize_str(&text);
        if lines.is_empty() {
            return Err(Error::NoTextContent);
        }
        log::debug!("Tokenized {} text line(s)", lines.len());
        Ok(TokenizedDocument::new(Origin::PlainText, lines))
    }
}
