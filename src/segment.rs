//! Section segmentation.
//!
//! Locates heading lines by keyword and partitions the line sequence into
//! labeled spans. Each section kind opens at most once: a keyword for a
//! kind that was already found later in the document is ordinary content.

use crate::model::{Line, Section, SectionKind, SectionMap};
use crate::parser::ParseOptions;
use crate::vocab::Vocabulary;

/// Finds section headings and builds a [`SectionMap`].
#[derive(Debug, Clone)]
pub struct SectionSegmenter<'a> {
    vocab: &'a Vocabulary,
    heading_min_font_size: f32,
    max_heading_chars: usize,
}

impl<'a> SectionSegmenter<'a> {
    pub fn new(vocab: &'a Vocabulary, options: &ParseOptions) -> Self {
        Self {
            vocab,
            heading_min_font_size: options.heading_min_font_size,
            max_heading_chars: options.max_heading_chars,
        }
    }

    /// Partition `lines` into sections.
    ///
    /// Lines before the first heading form the `Basics` span. Every heading
    /// span runs from the line after the heading up to the next heading, or
    /// to the end of the document.
    pub fn segment(&self, lines: &[Line]) -> SectionMap {
        let mut headings: Vec<(SectionKind, usize)> = Vec::new();

        for (index, line) in lines.iter().enumerate() {
            let found: Vec<SectionKind> = headings.iter().map(|(k, _)| *k).collect();
            if let Some(kind) = self.heading_kind(line, &found) {
                log::debug!("Section {} opens at line {}", kind, index);
                headings.push((kind, index));
            }
        }

        let first_heading = headings.first().map(|(_, i)| *i).unwrap_or(lines.len());
        let mut sections = vec![Section {
            kind: SectionKind::Basics,
            heading: None,
            start: 0,
            end: first_heading,
        }];

        for (n, &(kind, heading)) in headings.iter().enumerate() {
            let end = headings
                .get(n + 1)
                .map(|(_, next)| *next)
                .unwrap_or(lines.len());
            sections.push(Section {
                kind,
                heading: Some(heading),
                start: heading + 1,
                end,
            });
        }

        SectionMap::new(sections)
    }

    /// The section kind a line opens, skipping kinds already found.
    pub fn heading_kind(&self, line: &Line, found: &[SectionKind]) -> Option<SectionKind> {
        let text = line.text().trim().to_lowercase();
        if text.is_empty() || text.chars().count() > self.max_heading_chars {
            return None;
        }
        if !self.looks_like_heading(line) {
            return None;
        }

        SectionKind::HEADED
            .iter()
            .copied()
            .filter(|kind| !found.contains(kind))
            .find(|kind| {
                self.vocab
                    .section_keywords(*kind)
                    .iter()
                    .any(|keyword| keyword_opens(&text, keyword))
            })
    }

    /// Geometry check, applied only when the line carries font metrics.
    fn looks_like_heading(&self, line: &Line) -> bool {
        match line.dominant_block() {
            Some(block) if block.has_font_metrics() => {
                block.is_bold || block.font_size >= self.heading_min_font_size
            }
            _ => true,
        }
    }
}

/// Whether lower-cased `text` equals or starts with `keyword`.
///
/// A Latin keyword must end on a word boundary, optionally followed by a
/// plural `s`, so "work" opens "Work History" but not "Worked on".
fn keyword_opens(text: &str, keyword: &str) -> bool {
    let Some(rest) = text.strip_prefix(keyword) else {
        return false;
    };
    if !keyword.chars().last().is_some_and(|c| c.is_ascii_alphanumeric()) {
        return true;
    }
    let rest = rest.strip_prefix('s').unwrap_or(rest);
    !rest.chars().next().is_some_and(char::is_alphanumeric)
}
