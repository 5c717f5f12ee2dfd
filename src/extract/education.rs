//! Education history.
//!
//! Section lines are merged into degree statements, each statement is
//! labeled through the degree-rule cascade, and institution, dates and area
//! are read from the statement itself. Statements without an institution
//! anchor are discarded.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use super::years;
use crate::model::{Education, Line};
use crate::parser::{LineReconstructor, Origin, ParseOptions};
use crate::vocab::{DegreeRule, Vocabulary};

static HAN_INSTITUTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\p{Han}{1,20}?(?:大学|学院)").unwrap());

static SEGMENT_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+[-–—|]\s+|[,，;；|()（）\t]").unwrap());

static PARENTHETICAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"[(（]([^)）]+)[)）]").unwrap());

static SCORE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:gpa|cgpa)\s*[:：]?\s*([0-9]+(?:\.[0-9]+)?(?:\s*/\s*[0-9]+(?:\.[0-9]+)?)?)")
        .unwrap()
});

static COURSES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:\bcourse(?:work|s)?|\brelevant\s+courses?|主修课程)\s*[:：]\s*(.+)$").unwrap()
});

static COURSE_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,，、;；]").unwrap());

/// Connectives left in front of an institution once the degree is removed.
static CONNECTIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:(?:in|of|at|from|and)\b[\s,]*)+").unwrap());

/// Leading connective between a degree phrase and its discipline.
static AREA_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:[\s:：\-–]+)?(?:(?:in|of|major(?:ing)?\s+in)\s+)?").unwrap());

/// "at" between a degree and the school awarding it.
static AT_CONNECTIVE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\sat\s").unwrap());

/// A degree followed by its school rather than a discipline.
static SCHOOL_NEXT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^[\s,]*(?:at|from)\s").unwrap());

/// Words kept lower-case when title-casing an area.
const MINOR_WORDS: &[&str] = &["and", "of", "in", "for", "the", "with", "&"];

/// A merged multi-line degree statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// The source lines, in order
    pub lines: Vec<String>,
    /// The last institution line seen before the statement opened
    pub context: Option<String>,
}

impl Statement {
    fn open(line: &str, context: Option<String>) -> Self {
        Self {
            lines: vec![line.to_string()],
            context,
        }
    }

    /// The lines joined by single spaces.
    pub fn text(&self) -> String {
        self.lines.join(" ")
    }

    /// Byte offset in [`text`](Self::text) where the line holding `pos` ends.
    fn line_end(&self, pos: usize) -> usize {
        let mut offset = 0;
        for line in &self.lines {
            offset += line.len();
            if pos <= offset {
                return offset;
            }
            offset += 1;
        }
        pos
    }
}

/// A statement with its resolved degree rule.
#[derive(Debug, Clone)]
struct Labeled<'s> {
    statement: &'s Statement,
    text: String,
    study_type: String,
    /// The text the rule matched, e.g. "B.S."
    degree_phrase: String,
    area: Option<Area>,
    canonical: String,
}

#[derive(Debug, Clone)]
struct Area {
    /// As written in the statement
    raw: String,
    /// Title-cased
    display: String,
}

/// Extracts [`Education`] entries from the education section.
#[derive(Debug, Clone)]
pub struct EducationExtractor<'a> {
    vocab: &'a Vocabulary,
    statement_tolerance: f32,
}

impl<'a> EducationExtractor<'a> {
    pub fn new(vocab: &'a Vocabulary, options: &ParseOptions) -> Self {
        Self {
            vocab,
            statement_tolerance: options.statement_tolerance,
        }
    }

    /// Extract entries from the section's lines.
    ///
    /// Layout lines are first regrouped with the tighter statement
    /// tolerance; plain-text lines are used as they are.
    pub fn extract(&self, lines: &[Line], origin: Origin) -> Vec<Education> {
        if lines.is_empty() {
            return Vec::new();
        }

        let texts: Vec<String> = match origin {
            Origin::Layout => LineReconstructor::new(self.statement_tolerance)
                .regroup(lines)
                .iter()
                .map(|l| l.text().to_string())
                .collect(),
            Origin::PlainText => lines.iter().map(|l| l.text().to_string()).collect(),
        };

        let statements = self.merge_statements(&texts);
        self.label(&statements)
            .into_iter()
            .filter_map(|entry| self.build(entry))
            .collect()
    }

    /// Merge lines into degree statements.
    ///
    /// A degree line opens a statement, continuation lines extend it, and
    /// any other line closes it. Lines with `@` or `http` close the open
    /// statement and are dropped. An institution line outside a statement
    /// becomes context for the statements that follow.
    pub fn merge_statements<S: AsRef<str>>(&self, lines: &[S]) -> Vec<Statement> {
        let mut statements = Vec::new();
        let mut open: Option<Statement> = None;
        let mut context: Option<String> = None;

        for line in lines {
            let text = line.as_ref().trim();
            if text.is_empty() {
                continue;
            }

            if text.contains('@') || text.contains("http") {
                statements.extend(open.take());
                continue;
            }

            if self.vocab.degree_trigger().is_match(text) {
                statements.extend(open.take());
                open = Some(Statement::open(text, context.clone()));
                continue;
            }

            if let Some(statement) = open.as_mut() {
                if self.vocab.continuation().is_match(text) {
                    statement.lines.push(text.to_string());
                    continue;
                }
            }

            statements.extend(open.take());
            if self.vocab.institution().is_match(text) {
                context = Some(text.to_string());
            }
        }
        statements.extend(open);

        for statement in &statements {
            log::debug!("Degree statement: {}", statement.text());
        }
        statements
    }

    /// Run the exact cascade, then the loose pass, and drop repeated
    /// canonical labels.
    fn label<'s>(&self, statements: &'s [Statement]) -> Vec<Labeled<'s>> {
        let rules = self.vocab.degree_rules();

        let mut slots: Vec<Option<Labeled<'s>>> = statements
            .iter()
            .map(|statement| {
                let text = statement.text();
                rules
                    .iter()
                    .find_map(|rule| rule.pattern.find(&text).map(|m| (rule, m.start(), m.end())))
                    .map(|(rule, start, end)| self.labeled(statement, &text, rule, start, end))
            })
            .collect();

        let found: Vec<String> = slots
            .iter()
            .flatten()
            .map(|l| l.study_type.clone())
            .collect();

        for (slot, statement) in slots.iter_mut().zip(statements) {
            if slot.is_some() {
                continue;
            }
            let text = statement.text();
            *slot = rules
                .iter()
                .filter(|rule| !found.contains(&rule.label))
                .find_map(|rule| rule.loose.find(&text).map(|m| (rule, m.start(), m.end())))
                .map(|(rule, start, end)| self.labeled(statement, &text, rule, start, end));
        }

        let mut seen = HashSet::new();
        slots
            .into_iter()
            .flatten()
            .filter(|l| seen.insert(l.canonical.clone()))
            .collect()
    }

    fn labeled<'s>(
        &self,
        statement: &'s Statement,
        text: &str,
        rule: &DegreeRule,
        start: usize,
        end: usize,
    ) -> Labeled<'s> {
        // The discipline never runs past the degree's own line.
        let area = self
            .area_after(&text[end..statement.line_end(end)])
            .or_else(|| parenthetical_area(text));
        let canonical = match &area {
            Some(area) => format!("{} in {}", rule.label, area.display),
            None => rule.label.clone(),
        };
        Labeled {
            statement,
            text: text.to_string(),
            study_type: rule.label.clone(),
            degree_phrase: text[start..end].to_string(),
            area,
            canonical,
        }
    }

    /// The discipline following a degree phrase, up to the next separator,
    /// institution noun or year.
    fn area_after(&self, rest: &str) -> Option<Area> {
        if SCHOOL_NEXT.is_match(rest) {
            return None;
        }
        let rest = AREA_PREFIX
            .find(rest)
            .map(|m| &rest[m.end()..])
            .unwrap_or(rest);

        let mut end = SEGMENT_BREAK
            .find(rest)
            .map(|m| m.start())
            .unwrap_or(rest.len());
        if let Some(m) = self.vocab.institution().find(&rest[..end]) {
            end = m.start();
        }
        if let Some(m) = self.vocab.degree_trigger().find(&rest[..end]) {
            end = m.start();
        }
        if let Some(year) = years(&rest[..end]).first() {
            if let Some(pos) = rest[..end].find(year) {
                end = pos;
            }
        }

        clean_area(&rest[..end])
    }

    fn build(&self, entry: Labeled<'_>) -> Option<Education> {
        let statement = entry.statement;
        let institution = self
            .literal_institution(&entry)
            .or_else(|| statement.context.clone())
            .or_else(|| {
                self.vocab
                    .fallback_institution(&entry.canonical)
                    .map(str::to_string)
            });

        let Some(institution) = institution else {
            log::warn!(
                "Discarding education statement without institution: {}",
                entry.text
            );
            return None;
        };

        let found_years = years(&entry.text);
        let (start_date, end_date) = match found_years.as_slice() {
            [] => (None, None),
            [only] => (None, Some(only.to_string())),
            [start, end, ..] => (Some(start.to_string()), Some(end.to_string())),
        };

        let score = SCORE
            .captures(&entry.text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().replace(' ', ""));

        let courses = COURSES
            .captures(&entry.text)
            .and_then(|c| c.get(1))
            .map(|m| {
                COURSE_SPLIT
                    .split(m.as_str())
                    .map(|c| c.trim().trim_end_matches('.').to_string())
                    .filter(|c| !c.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|c| !c.is_empty());

        Some(Education {
            institution,
            area: entry.area.map(|a| a.display),
            study_type: Some(entry.study_type),
            start_date,
            end_date,
            score,
            courses,
        })
    }

    /// The institution named in the statement, if any.
    ///
    /// Each line is split into segments at separators. The first segment
    /// with an institution noun is taken, minus the degree phrase, the area
    /// and any years it carries.
    fn literal_institution(&self, entry: &Labeled<'_>) -> Option<String> {
        for line in &entry.statement.lines {
            for segment in SEGMENT_BREAK.split(line) {
                let segment = segment.trim();
                if segment.is_empty() {
                    continue;
                }

                if HAN_INSTITUTION.is_match(segment) {
                    let stripped = self.vocab.degree_trigger().replace_all(segment, " ");
                    if let Some(m) = HAN_INSTITUTION.find(&stripped) {
                        return Some(m.as_str().to_string());
                    }
                }

                if !self.vocab.institution().is_match(segment) {
                    continue;
                }

                let mut name = segment.replacen(entry.degree_phrase.as_str(), " ", 1);
                if let Some(area) = &entry.area {
                    name = name.replacen(area.raw.as_str(), " ", 1);
                }
                let school = AT_CONNECTIVE
                    .find_iter(&name)
                    .last()
                    .map(|m| m.end())
                    .filter(|&end| self.vocab.institution().is_match(&name[end..]));
                if let Some(end) = school {
                    name = name[end..].to_string();
                }
                for year in years(segment) {
                    name = name.replace(year, " ");
                }

                let name = name.split_whitespace().collect::<Vec<_>>().join(" ");
                let name = CONNECTIVE.replace(name.trim_matches(|c: char| !c.is_alphanumeric()), "");
                let name = name.trim_matches(|c: char| !c.is_alphanumeric());
                if !name.is_empty() {
                    return Some(name.to_string());
                }
            }
        }
        None
    }
}

/// A parenthetical that names a discipline rather than a date.
fn parenthetical_area(text: &str) -> Option<Area> {
    PARENTHETICAL
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .find(|inner| years(inner).is_empty() && !inner.to_lowercase().contains("expected"))
        .and_then(clean_area)
}

fn clean_area(raw: &str) -> Option<Area> {
    let trimmed = raw
        .trim()
        .trim_matches(|c: char| !c.is_alphanumeric() && c != '&' && c != '+' && c != '#');
    if trimmed.chars().filter(|c| c.is_alphabetic()).count() < 2 {
        return None;
    }
    Some(Area {
        raw: trimmed.to_string(),
        display: title_case(trimmed),
    })
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .enumerate()
        .map(|(i, word)| {
            if i > 0 && MINOR_WORDS.contains(&word.to_lowercase().as_str()) {
                return word.to_lowercase();
            }
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Block;
    use crate::vocab::VocabularyConfig;

    fn text_lines(texts: &[&str]) -> Vec<Line> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Line::from_blocks(vec![Block::synthetic(*t, i)]))
            .collect()
    }

    fn extract_text(texts: &[&str]) -> Vec<Education> {
        EducationExtractor::new(Vocabulary::builtin(), &ParseOptions::default())
            .extract(&text_lines(texts), Origin::PlainText)
    }

    #[test]
    fn test_single_line_statement() {
        let education = extract_text(&["Bachelor of Science, ABC University, 2009-2013"]);
        assert_eq!(education.len(), 1);
        let entry = &education[0];
        assert_eq!(entry.institution, "ABC University");
        assert_eq!(entry.study_type.as_deref(), Some("Bachelor of Science"));
        assert_eq!(entry.start_date.as_deref(), Some("2009"));
        assert_eq!(entry.end_date.as_deref(), Some("2013"));
        assert_eq!(entry.area, None);
    }

    #[test]
    fn test_area_and_continuation() {
        let education = extract_text(&[
            "B.S. in Computer Science",
            "University of Toronto (2015 - 2019)",
            "GPA: 3.8/4.0",
            "Professional Summary",
        ]);
        assert_eq!(education.len(), 1);
        let entry = &education[0];
        assert_eq!(entry.area.as_deref(), Some("Computer Science"));
        assert_eq!(entry.institution, "University of Toronto");
        assert_eq!(entry.start_date.as_deref(), Some("2015"));
        assert_eq!(entry.end_date.as_deref(), Some("2019"));
        assert_eq!(entry.score.as_deref(), Some("3.8/4.0"));
    }

    #[test]
    fn test_area_stops_at_line_end() {
        let education = extract_text(&[
            "Master of Science in Computer Science",
            "Stanford University (2014 - 2016)",
        ]);
        assert_eq!(education.len(), 1);
        assert_eq!(education[0].area.as_deref(), Some("Computer Science"));
        assert_eq!(education[0].institution, "Stanford University");
    }

    #[test]
    fn test_context_line_supplies_institution() {
        let education = extract_text(&[
            "Saskatchewan Polytechnic",
            "Post-Graduate Software development",
            "(2024)",
        ]);
        assert_eq!(education.len(), 1);
        assert_eq!(education[0].institution, "Saskatchewan Polytechnic");
        assert_eq!(
            education[0].study_type.as_deref(),
            Some("Post-Graduate Diploma")
        );
        assert_eq!(education[0].area.as_deref(), Some("Software Development"));
        assert_eq!(education[0].end_date.as_deref(), Some("2024"));
        assert_eq!(education[0].start_date, None);
    }

    #[test]
    fn test_statement_without_institution_uses_fallback() {
        let education = extract_text(&["Post-Graduate Software development", "(2024)"]);
        assert_eq!(education.len(), 1);
        assert_eq!(education[0].institution, crate::vocab::UNSPECIFIED_INSTITUTION);
        assert_eq!(
            education[0].study_type.as_deref(),
            Some("Post-Graduate Diploma")
        );
        assert_eq!(education[0].end_date.as_deref(), Some("2024"));
    }

    #[test]
    fn test_statement_without_institution_is_discarded() {
        let config = VocabularyConfig {
            institution_fallbacks: Vec::new(),
            ..Default::default()
        };
        let vocab = Vocabulary::from_config(&config).unwrap();
        let education = EducationExtractor::new(&vocab, &ParseOptions::default()).extract(
            &text_lines(&["Post-Graduate Software development", "(2024)"]),
            Origin::PlainText,
        );
        assert!(education.is_empty());
    }

    #[test]
    fn test_abbreviations_without_final_dot() {
        let education = extract_text(&["B.A Economics, Boston University, 2012-2016"]);
        assert_eq!(education.len(), 1);
        assert_eq!(education[0].study_type.as_deref(), Some("Bachelor of Arts"));
        assert_eq!(education[0].area.as_deref(), Some("Economics"));
        assert_eq!(education[0].institution, "Boston University");

        let education = extract_text(&["M.S Computer Science, Stanford University, 2016"]);
        assert_eq!(education.len(), 1);
        assert_eq!(education[0].study_type.as_deref(), Some("Master of Science"));
        assert_eq!(education[0].institution, "Stanford University");
        assert_eq!(education[0].end_date.as_deref(), Some("2016"));
    }

    #[test]
    fn test_at_connective() {
        let education = extract_text(&["Bachelor of Science at Boston University 2014"]);
        assert_eq!(education[0].institution, "Boston University");
        assert_eq!(education[0].area, None);

        let education =
            extract_text(&["İstanbul Technical University at Ankara, Bachelor of Science 2010"]);
        assert_eq!(education.len(), 1);
        assert_eq!(
            education[0].institution,
            "İstanbul Technical University at Ankara"
        );
    }

    #[test]
    fn test_fallback_table() {
        let mut config = VocabularyConfig::default();
        config.institution_fallbacks = vec![crate::vocab::InstitutionFallback {
            label_contains: "Post-Graduate".to_string(),
            institution: "Open Polytechnic".to_string(),
        }];
        let vocab = Vocabulary::from_config(&config).unwrap();
        let education = EducationExtractor::new(&vocab, &ParseOptions::default()).extract(
            &text_lines(&["Post-Graduate Software development", "(2024)"]),
            Origin::PlainText,
        );
        assert_eq!(education.len(), 1);
        assert_eq!(education[0].institution, "Open Polytechnic");
    }

    #[test]
    fn test_duplicate_degree_yields_one_entry() {
        let education = extract_text(&[
            "Bachelor of Science, ABC University, 2009-2013",
            "Bachelor of Science, ABC University, 2009-2013",
        ]);
        assert_eq!(education.len(), 1);
    }

    #[test]
    fn test_separator_line_flushes() {
        let vocab = Vocabulary::builtin();
        let extractor = EducationExtractor::new(vocab, &ParseOptions::default());
        let statements = extractor.merge_statements(&[
            "Master of Science, XYZ University",
            "jane@x.com",
            "(2020)",
        ]);
        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].text(), "Master of Science, XYZ University");
    }

    #[test]
    fn test_chinese_statement() {
        let education = extract_text(&["清华大学 计算机科学 硕士 2016-2019"]);
        assert_eq!(education.len(), 1);
        assert_eq!(education[0].institution, "清华大学");
        assert_eq!(education[0].study_type.as_deref(), Some("Master"));
        assert_eq!(education[0].end_date.as_deref(), Some("2019"));
    }

    #[test]
    fn test_courses() {
        let education = extract_text(&[
            "Master of Engineering, Some Institute",
            "Coursework: Compilers, Operating Systems; Databases",
        ]);
        assert_eq!(
            education[0].courses.as_deref(),
            Some(
                &[
                    "Compilers".to_string(),
                    "Operating Systems".to_string(),
                    "Databases".to_string()
                ][..]
            )
        );
    }

    #[test]
    fn test_layout_regroup_merges_adjacent_lines() {
        let lines = vec![
            Line::from_blocks(vec![Block::new("Saskatchewan Polytechnic", 11.0, "F-Bold", 72.0, 100.0)]),
            Line::from_blocks(vec![
                Block::new("Post-Graduate Software development", 10.0, "F", 72.0, 115.0),
                Block::new("(2024)", 10.0, "F", 72.0, 116.0),
            ]),
        ];
        let education = EducationExtractor::new(Vocabulary::builtin(), &ParseOptions::default())
            .extract(&lines, Origin::Layout);
        assert_eq!(education.len(), 1);
        assert_eq!(education[0].institution, "Saskatchewan Polytechnic");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("software development"), "Software Development");
        assert_eq!(title_case("science and engineering"), "Science and Engineering");
    }

    #[test]
    fn test_empty_section() {
        assert!(extract_text(&[]).is_empty());
    }
}
