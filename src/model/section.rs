//! Labeled spans over the line sequence.

use serde::{Deserialize, Serialize};

use super::Line;

/// Semantic section types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    /// Contact header preceding the first heading
    Basics,
    Education,
    Experience,
    Skills,
    Summary,
    /// Lines outside any known section
    Unknown,
}

impl SectionKind {
    /// Section kinds that are opened by a heading line, in scan priority.
    pub const HEADED: [SectionKind; 4] = [
        SectionKind::Education,
        SectionKind::Experience,
        SectionKind::Skills,
        SectionKind::Summary,
    ];

    /// Lower-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Basics => "basics",
            SectionKind::Education => "education",
            SectionKind::Experience => "experience",
            SectionKind::Skills => "skills",
            SectionKind::Summary => "summary",
            SectionKind::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A half-open span `[start, end)` over the line sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub kind: SectionKind,
    /// Index of the heading line, if the section was opened by one
    pub heading: Option<usize>,
    pub start: usize,
    pub end: usize,
}

impl Section {
    /// Number of lines in the span.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if the span is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if a line index falls inside the span.
    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end
    }
}

/// The sections found in one document, ordered by position.
///
/// A section kind that was never found is simply absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionMap {
    sections: Vec<Section>,
}

impl SectionMap {
    /// Create a map from sections, ordering them by start index.
    pub fn new(mut sections: Vec<Section>) -> Self {
        sections.sort_by_key(|s| s.start);
        Self { sections }
    }

    /// All sections in document order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Look up a section by kind.
    pub fn get(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    /// The lines belonging to a section; empty if the section was not found.
    pub fn lines<'a>(&self, kind: SectionKind, lines: &'a [Line]) -> &'a [Line] {
        match self.get(kind) {
            Some(section) if section.start <= section.end && section.end <= lines.len() => {
                &lines[section.start..section.end]
            }
            _ => &[],
        }
    }

    /// The section kind a line belongs to. Heading lines and lines outside
    /// every span are `Unknown`.
    pub fn kind_at(&self, index: usize) -> SectionKind {
        self.sections
            .iter()
            .find(|s| s.contains(index))
            .map(|s| s.kind)
            .unwrap_or(SectionKind::Unknown)
    }
}
