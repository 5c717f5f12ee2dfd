//! Positioned text runs and the lines built from them.

use serde::{Deserialize, Serialize};

/// A single positioned text run with font metadata.
///
/// Coordinates are top-down: a larger `y` is further down the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Trimmed, non-empty text
    pub text: String,
    /// Font size in points (0 when the source carries no geometry)
    pub font_size: f32,
    /// Lower-cased font family with any subset tag removed
    pub font_family: String,
    /// Whether the font family names a bold weight
    pub is_bold: bool,
    /// Left edge
    pub x: f32,
    /// Baseline, top-down
    pub y: f32,
    /// 1-based page number
    pub page: u32,
}

impl Block {
    /// Create a block from a font identifier.
    ///
    /// Strips any `SUBSET+` prefix from `font_name`, lower-cases the rest and
    /// derives the bold flag from it.
    pub fn new(text: impl Into<String>, font_size: f32, font_name: &str, x: f32, y: f32) -> Self {
        let font_family = font_family_of(font_name);
        let is_bold = is_bold_family(&font_family);
        Self {
            text: text.into(),
            font_size,
            font_family,
            is_bold,
            x,
            y,
            page: 1,
        }
    }

    /// A geometry-free block used by the plain-text path.
    pub fn synthetic(text: impl Into<String>, line_index: usize) -> Self {
        Self {
            text: text.into(),
            font_size: 0.0,
            font_family: String::new(),
            is_bold: false,
            x: 0.0,
            y: line_index as f32,
            page: 1,
        }
    }

    /// Set the page number.
    pub fn on_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Whether this block carries real font metrics.
    pub fn has_font_metrics(&self) -> bool {
        self.font_size > 0.0
    }
}

/// Subset-tag-stripped, lower-cased font family.
pub(crate) fn font_family_of(font_name: &str) -> String {
    font_name
        .rsplit('+')
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

pub(crate) fn is_bold_family(family: &str) -> bool {
    family.contains("bold") || family.contains("heavy") || family.contains("black")
}

/// Blocks sharing a vertical band, ordered left to right.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    blocks: Vec<Block>,
    text: String,
    /// Vertical position of the block that opened the line
    y: f32,
    page: u32,
}

impl Line {
    /// Build a line, ordering blocks by ascending `x`.
    ///
    /// The sort is stable so blocks sharing an `x` keep extraction order.
    pub fn from_blocks(mut blocks: Vec<Block>) -> Self {
        let (y, page) = blocks.first().map(|b| (b.y, b.page)).unwrap_or((0.0, 1));
        blocks.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
        let text = blocks
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            blocks,
            text,
            y,
            page,
        }
    }

    /// Blocks' text joined by single spaces.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The blocks in this line, left to right.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Consume the line, returning its blocks.
    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    /// Vertical position of the line: the first block in extraction
    /// order, not the leftmost one.
    pub fn y(&self) -> f32 {
        self.y
    }

    /// Page the line sits on.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// The block carrying the most text; ties keep the leftmost.
    pub fn dominant_block(&self) -> Option<&Block> {
        let mut best: Option<&Block> = None;
        for block in &self.blocks {
            match best {
                Some(b) if b.text.chars().count() >= block.text.chars().count() => {}
                _ => best = Some(block),
            }
        }
        best
    }

    /// Check if the line is empty.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_family_strips_subset_tag() {
        let block = Block::new("Jane", 18.0, "ABCDEF+Helvetica-Bold", 0.0, 0.0);
        assert_eq!(block.font_family, "helvetica-bold");
        assert!(block.is_bold);

        let block = Block::new("Jane", 10.0, "Times-Roman", 0.0, 0.0);
        assert_eq!(block.font_family, "times-roman");
        assert!(!block.is_bold);
    }

    #[test]
    fn test_heavy_and_black_are_bold() {
        assert!(Block::new("x", 10.0, "XYZ+Avenir-Heavy", 0.0, 0.0).is_bold);
        assert!(Block::new("x", 10.0, "Arial-Black", 0.0, 0.0).is_bold);
    }

    #[test]
    fn test_line_orders_blocks_by_x() {
        let line = Line::from_blocks(vec![
            Block::new("University", 10.0, "F", 120.0, 5.0),
            Block::new("ABC", 10.0, "F", 80.0, 5.4),
        ]);
        assert_eq!(line.text(), "ABC University");
        assert_eq!(line.y(), 5.0);
    }

    #[test]
    fn test_dominant_block() {
        let line = Line::from_blocks(vec![
            Block::new("Skills", 14.0, "F-Bold", 0.0, 0.0),
            Block::new(":", 10.0, "F", 50.0, 0.0),
        ]);
        assert_eq!(line.dominant_block().unwrap().text, "Skills");
        assert!(Line::from_blocks(vec![]).dominant_block().is_none());
    }

    #[test]
    fn test_synthetic_block_has_no_metrics() {
        let block = Block::synthetic("Education", 3);
        assert!(!block.has_font_metrics());
        assert_eq!(block.y, 3.0);
        assert_eq!(block.x, 0.0);
    }
}
