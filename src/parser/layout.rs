//! Layout tokenizer for PDF documents.
//!
//! Turns glyph runs into positioned [`Block`]s and the blocks into lines.
//! Pages may be decoded in parallel but are always concatenated in page
//! order.

use rayon::prelude::*;

use super::backend::{LopdfBackend, PageId, PdfBackend};
use super::glyph::{GlyphReader, GlyphRun};
use super::lines::LineReconstructor;
use super::options::{ErrorMode, ParseOptions};
use super::{Origin, TokenizedDocument, Tokenizer};
use crate::detect::MediaType;
use crate::error::{Error, Result};
use crate::model::Block;

/// Build blocks from one page's glyph runs.
///
/// The font size is the length of the transform's first column vector and
/// `y` is negated so that larger values lie further down the page. Runs
/// whose text is empty after trimming are skipped.
pub fn blocks_from_runs(runs: &[GlyphRun], page: u32) -> Vec<Block> {
    runs.iter()
        .filter_map(|run| {
            let text = run.text.trim();
            if text.is_empty() {
                return None;
            }
            let [a, b, _, _, e, f] = run.transform;
            let font_size = (a * a + b * b).sqrt();
            Some(Block::new(text, font_size, &run.font_name, e, -f).on_page(page))
        })
        .collect()
}

/// Order a page's blocks top-to-bottom, then left-to-right.
fn sort_page_blocks(blocks: &mut [Block]) {
    blocks.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));
}

/// Tokenizer for PDF input.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutTokenizer;

impl LayoutTokenizer {
    pub fn new() -> Self {
        Self
    }

    /// Extract the page-ordered block sequence of a document.
    pub fn extract_blocks<B: PdfBackend + ?Sized>(
        &self,
        backend: &B,
        options: &ParseOptions,
    ) -> Result<Vec<Block>> {
        let pages: Vec<(u32, PageId)> = backend.pages().into_iter().collect();
        log::debug!("Decoding {} page(s)", pages.len());

        let read_page = |&(page_num, page_id): &(u32, PageId)| -> (u32, Result<Vec<Block>>) {
            let result = GlyphReader::new(backend).read_page(page_id).map(|runs| {
                let mut blocks = blocks_from_runs(&runs, page_num);
                sort_page_blocks(&mut blocks);
                blocks
            });
            (page_num, result)
        };

        let decoded: Vec<(u32, Result<Vec<Block>>)> = if options.parallel && pages.len() > 1 {
            pages.par_iter().map(read_page).collect()
        } else {
            pages.iter().map(read_page).collect()
        };

        let mut blocks = Vec::new();
        for (page_num, result) in decoded {
            match result {
                Ok(page_blocks) => blocks.extend(page_blocks),
                Err(e) => {
                    if options.error_mode == ErrorMode::Strict {
                        return Err(e);
                    }
                    log::warn!("Failed to decode page {}: {}", page_num, e);
                }
            }
        }
        Ok(blocks)
    }
}

impl Tokenizer for LayoutTokenizer {
    fn name(&self) -> &str {
        "layout"
    }

    fn media_types(&self) -> &[MediaType] {
        &[MediaType::Pdf]
    }

    fn tokenize(&self, bytes: &[u8], options: &ParseOptions) -> Result<TokenizedDocument> {
        let backend = LopdfBackend::load_bytes(bytes)?;
        let blocks = self.extract_blocks(&backend, options)?;
        if blocks.is_empty() {
            return Err(Error::NoTextContent);
        }

        let lines = LineReconstructor::new(options.line_tolerance).group(blocks);
        log::debug!("Reconstructed {} line(s)", lines.len());
        Ok(TokenizedDocument::new(Origin::Layout, lines))
    }
}
