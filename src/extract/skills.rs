//! Skills: section-local terms plus a whole-document vocabulary scan.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{Line, Skill};
use crate::vocab::Vocabulary;

static SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,，、;；\s]+").unwrap());

/// Shortest section-local term kept, in characters.
const MIN_TERM_CHARS: usize = 2;

/// Extracts [`Skill`]s.
#[derive(Debug, Clone)]
pub struct SkillsExtractor<'a> {
    vocab: &'a Vocabulary,
}

impl<'a> SkillsExtractor<'a> {
    pub fn new(vocab: &'a Vocabulary) -> Self {
        Self { vocab }
    }

    /// Section terms first, then every vocabulary hit in the whole
    /// document. The scan always runs, whether or not a skills section
    /// was found.
    pub fn extract(&self, section: &[Line], document_text: &str) -> Vec<Skill> {
        let mut seen = HashSet::new();
        let mut skills = Vec::new();

        for term in section.iter().flat_map(|line| section_terms(line.text())) {
            if seen.insert(term.clone()) {
                skills.push(Skill::named(term));
            }
        }

        for name in self.scan(document_text) {
            if seen.insert(name.to_string()) {
                skills.push(Skill::named(name));
            }
        }

        skills
    }

    /// Vocabulary names found anywhere in `text`, in vocabulary order.
    pub fn scan<'t>(&'t self, text: &str) -> Vec<&'t str> {
        self.vocab
            .technologies()
            .iter()
            .filter(|tech| tech.is_match(text))
            .map(|tech| tech.name.as_str())
            .collect()
    }
}

/// Candidate terms from one skills-section line.
fn section_terms(line: &str) -> Vec<String> {
    SPLIT
        .split(line)
        .filter_map(|token| {
            // "Languages:" on its own is a label.
            if token.ends_with(':') || token.ends_with('：') {
                return None;
            }
            // "技能：Python" keeps what follows the label.
            let token = token.rsplit([':', '：']).next().unwrap_or(token);
            let term = token
                .trim_start_matches(|c: char| !c.is_alphanumeric() && c != '.')
                .trim_end_matches(|c: char| !c.is_alphanumeric() && c != '+' && c != '#');
            (term.chars().count() >= MIN_TERM_CHARS).then(|| term.to_string())
        })
        .collect()
}
