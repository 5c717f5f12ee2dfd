//! Contact basics: name, email, phone, url and summary.
//!
//! Scans the whole document, since contact details usually precede any
//! heading.

use once_cell::sync::Lazy;
use regex::Regex;

use super::count_tokens;
use crate::model::{Block, Location, ResumeBasics};
use crate::parser::{Origin, ParseOptions, TokenizedDocument};

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z0-9._-]+@[a-zA-Z0-9._-]+\.[a-zA-Z0-9._-]+").unwrap());

static PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?:\+?(\d{1,3})[-. (]*(\d{3})[-. )]*(\d{3})[-. ]*(\d{4})(?: *x(\d+))?)",
        r"|(?:(\d{3})-(\d{3})-(\d{4}))"
    ))
    .unwrap()
});

static URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:https?://)?(?:www\.)?[a-z0-9-]+(?:\.[a-z0-9-]+)*\.[a-z]{2,}(?:/[^\s]*)?")
        .unwrap()
});

/// Maximum length of a first line taken as the name.
const MAX_NAME_CHARS: usize = 30;

/// Number of leading lines considered for the summary.
const SUMMARY_LINES: usize = 5;

/// Extracts [`ResumeBasics`] from a tokenized document.
#[derive(Debug, Clone)]
pub struct BasicsExtractor {
    name_block_window: usize,
    summary_token_threshold: usize,
}

impl BasicsExtractor {
    pub fn new(options: &ParseOptions) -> Self {
        Self {
            name_block_window: options.name_block_window,
            summary_token_threshold: options.summary_token_threshold,
        }
    }

    pub fn extract(&self, doc: &TokenizedDocument) -> ResumeBasics {
        let text = doc.text();

        let name = match doc.origin() {
            Origin::Layout => self
                .name_from_blocks(doc.blocks())
                .unwrap_or_else(|| first_line_name(doc)),
            Origin::PlainText => first_line_name(doc),
        };

        let url = match doc.origin() {
            Origin::PlainText => find_url(&text).unwrap_or_default(),
            Origin::Layout => String::new(),
        };

        ResumeBasics {
            name,
            email: first_match(&EMAIL, &text),
            phone: first_match(&PHONE, &text),
            url,
            summary: self.summary(doc),
            location: Location::default(),
        }
    }

    /// The largest-font block among the leading blocks; the first one wins
    /// a tie.
    fn name_from_blocks<'a>(&self, blocks: impl Iterator<Item = &'a Block>) -> Option<String> {
        let mut best: Option<&Block> = None;
        for block in blocks.take(self.name_block_window) {
            if !is_name_candidate(&block.text) {
                continue;
            }
            match best {
                Some(b) if b.font_size >= block.font_size => {}
                _ => best = Some(block),
            }
        }
        best.map(|b| b.text.clone())
    }

    fn summary(&self, doc: &TokenizedDocument) -> String {
        let opening = doc
            .lines()
            .iter()
            .take(SUMMARY_LINES)
            .map(|l| l.text())
            .collect::<Vec<_>>()
            .join(" ");
        if count_tokens(&opening) > self.summary_token_threshold {
            opening
        } else {
            String::new()
        }
    }
}

fn is_name_candidate(text: &str) -> bool {
    !text.contains('@')
        && !text.to_lowercase().contains("http")
        && !text
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_whitespace() || "+-().".contains(c))
}

fn first_line_name(doc: &TokenizedDocument) -> String {
    doc.lines()
        .first()
        .map(|l| l.text().trim())
        .filter(|t| t.chars().count() <= MAX_NAME_CHARS)
        .unwrap_or_default()
        .to_string()
}

fn first_match(pattern: &Regex, text: &str) -> String {
    pattern
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// First URL-like candidate that is not part of an email address.
/// Candidates with a scheme or `www.` take precedence over bare domains.
fn find_url(text: &str) -> Option<String> {
    let candidates: Vec<&str> = URL
        .find_iter(text)
        .filter(|m| {
            let before = text[..m.start()].chars().next_back();
            let after = text[m.end()..].chars().next();
            before != Some('@') && after != Some('@')
        })
        .map(|m| m.as_str())
        .collect();

    candidates
        .iter()
        .find(|c| {
            let lower = c.to_lowercase();
            lower.starts_with("http") || lower.starts_with("www.")
        })
        .or_else(|| candidates.first())
        .map(|c| c.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Line;
    use crate::parser::PlainTextTokenizer;

    fn text_doc(text: &str) -> TokenizedDocument {
        TokenizedDocument::new(Origin::PlainText, PlainTextTokenizer::new().tokenize_str(text))
    }

    fn layout_doc(blocks: Vec<Block>) -> TokenizedDocument {
        let lines = blocks.into_iter().map(|b| Line::from_blocks(vec![b])).collect();
        TokenizedDocument::new(Origin::Layout, lines)
    }

    fn extract(doc: &TokenizedDocument) -> ResumeBasics {
        BasicsExtractor::new(&ParseOptions::default()).extract(doc)
    }

    #[test]
    fn test_plain_text_basics() {
        let basics = extract(&text_doc(
            "Jane Doe\njane@x.com\n+1 (555) 123-4567\ngithub.com/janedoe\nEducation",
        ));
        assert_eq!(basics.name, "Jane Doe");
        assert_eq!(basics.email, "jane@x.com");
        assert_eq!(basics.phone, "+1 (555) 123-4567");
        assert_eq!(basics.url, "github.com/janedoe");
        assert_eq!(basics.summary, "");
        assert_eq!(basics.location, Location::default());
    }

    #[test]
    fn test_plain_phone_format() {
        let basics = extract(&text_doc("Call 555-123-4567 anytime"));
        assert_eq!(basics.phone, "555-123-4567");
    }

    #[test]
    fn test_long_first_line_is_not_a_name() {
        let basics = extract(&text_doc(
            "Experienced backend engineer with a decade of work\njane@x.com",
        ));
        assert_eq!(basics.name, "");
    }

    #[test]
    fn test_email_domain_is_not_a_url() {
        let basics = extract(&text_doc("Jane\njane@example.com"));
        assert_eq!(basics.url, "");

        let basics = extract(&text_doc("Jane\njane@example.com\nhttps://jane.dev"));
        assert_eq!(basics.url, "https://jane.dev");
    }

    #[test]
    fn test_layout_name_is_largest_font() {
        let doc = layout_doc(vec![
            Block::new("Curriculum", 12.0, "F", 0.0, 0.0),
            Block::new("jane@x.com", 30.0, "F", 0.0, 10.0),
            Block::new("Jane Doe", 20.0, "F-Bold", 0.0, 20.0),
            Block::new("John Roe", 20.0, "F-Bold", 0.0, 30.0),
            Block::new("5551234567", 24.0, "F", 0.0, 40.0),
        ]);
        let basics = extract(&doc);
        assert_eq!(basics.name, "Jane Doe");
        assert_eq!(basics.email, "jane@x.com");
        assert_eq!(basics.url, "");
    }

    #[test]
    fn test_summary_threshold() {
        let long = "word ".repeat(60);
        let basics = extract(&text_doc(&format!("Jane\n{}", long)));
        assert!(basics.summary.starts_with("Jane word"));

        let basics = extract(&text_doc("Jane\nShort intro line"));
        assert_eq!(basics.summary, "");
    }

    #[test]
    fn test_empty_fields_are_present() {
        let basics = extract(&text_doc("x"));
        let json = serde_json::to_value(&basics).unwrap();
        assert_eq!(json["email"], "");
        assert!(json["location"].is_object());
    }
}
