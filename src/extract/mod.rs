//! Field extractors.
//!
//! Each extractor applies pattern cascades to lines and returns plain
//! values. "Not found" is an empty result, never an error.

mod basics;
mod education;
mod experience;
mod skills;

pub use basics::BasicsExtractor;
pub use education::{EducationExtractor, Statement};
pub use experience::ExperienceExtractor;
pub use skills::SkillsExtractor;

use once_cell::sync::Lazy;
use regex::Regex;

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").unwrap());

static TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\p{Han}|[\p{L}\p{N}]+(?:['’][\p{L}]+)?|[^\s\p{L}\p{N}]").unwrap());

static BULLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:[•●○◦▪■□‣∙·*\-–—>]+|\d{1,2}[.)])\s*").unwrap());

/// Lines that can never carry an entity: empty, shorter than three
/// characters, contact details, or purely numeric.
pub fn should_skip_entry(text: &str) -> bool {
    let text = text.trim();
    text.chars().count() < 3
        || text.contains('@')
        || text.contains("http")
        || text.chars().all(|c| c.is_ascii_digit() || c.is_whitespace())
}

/// Four-digit years (19xx or 20xx) in order of appearance.
pub fn years(text: &str) -> Vec<&str> {
    DIGIT_RUN
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|d| d.len() == 4 && (d.starts_with("19") || d.starts_with("20")))
        .collect()
}

/// Word and punctuation token count. Every Han character is one token.
pub fn count_tokens(text: &str) -> usize {
    TOKEN.find_iter(text).count()
}

/// Remove a leading list marker.
pub fn strip_bullet(text: &str) -> &str {
    match BULLET.find(text) {
        Some(m) => &text[m.end()..],
        None => text,
    }
}

/// Whether the line starts with a list marker.
pub fn has_bullet(text: &str) -> bool {
    BULLET.is_match(text)
}
