//! Work history.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{has_bullet, should_skip_entry, strip_bullet, years};
use crate::model::{Line, Work};
use crate::vocab::Vocabulary;

static POSITION_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:position|title|role|job\s+title|职位|岗位)\s*[:：]\s*(.+)$").unwrap());

static SUMMARY_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:summary|description|responsibilities|职责|工作内容|工作职责)\s*[:：]\s*(.+)$")
        .unwrap()
});

static COMPANY_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:company|employer|公司(?:名称)?)\s*[:：]\s*").unwrap());

/// Company candidates at or above this length are sentences, not names.
const MAX_COMPANY_CHARS: usize = 50;

/// Highlights shorter than this are dropped.
const MIN_HIGHLIGHT_CHARS: usize = 10;

/// Extracts [`Work`] entries from the experience section.
#[derive(Debug, Clone)]
pub struct ExperienceExtractor<'a> {
    vocab: &'a Vocabulary,
}

impl<'a> ExperienceExtractor<'a> {
    pub fn new(vocab: &'a Vocabulary) -> Self {
        Self { vocab }
    }

    pub fn extract(&self, lines: &[Line]) -> Vec<Work> {
        let mut builder = WorkBuilder::default();

        for line in lines {
            let text = line.text().trim();
            if should_skip_entry(text) {
                continue;
            }
            // Education lines that leak into the section.
            if self.vocab.institution().is_match(text) || self.vocab.degree_trigger().is_match(text)
            {
                continue;
            }

            if let Some(c) = POSITION_LABEL.captures(text) {
                builder.set_position(c[1].trim(), None, &[]);
                continue;
            }
            if let Some(c) = SUMMARY_LABEL.captures(text) {
                builder.current().summary = Some(c[1].trim().to_string());
                continue;
            }

            if has_bullet(text) {
                builder.add_highlight(strip_bullet(text));
                continue;
            }

            if let Some(m) = self.vocab.position().find(text) {
                let company = text[..m.start()]
                    .trim()
                    .trim_end_matches(|c: char| !c.is_alphanumeric() && c != ')' && c != '.')
                    .trim();
                let company = COMPANY_LABEL.replace(company, "");
                let company = (company.chars().count() < MAX_COMPANY_CHARS)
                    .then_some(company.trim())
                    .filter(|c| !c.is_empty());

                let after = years(&text[m.end()..]);
                let dates = if after.is_empty() { years(text) } else { after };

                builder.set_position(m.as_str().trim(), company, &dates);
                continue;
            }

            if text.contains("Company") || text.contains("公司") || !years(text).is_empty() {
                let found = years(text);
                let name = company_name(text);
                if name.is_empty() {
                    builder.add_period(&found);
                } else {
                    builder.open(Work::named(name));
                    builder.set_dates(&found);
                }
                continue;
            }

            builder.add_highlight(text);
        }

        builder.finish()
    }
}

/// Company name from a line that opens an entry: the text before the
/// first year, without a `Company:` label.
fn company_name(text: &str) -> String {
    let head = match years(text).first().and_then(|y| text.find(y)) {
        Some(pos) => &text[..pos],
        None => text,
    };
    let head = COMPANY_LABEL.replace(head.trim(), "");
    head.trim()
        .trim_end_matches(|c: char| !c.is_alphanumeric() && c != ')' && c != '.')
        .trim()
        .to_string()
}

/// Accumulates entries in document order.
#[derive(Debug, Default)]
struct WorkBuilder {
    done: Vec<Work>,
    current: Option<Work>,
}

impl WorkBuilder {
    fn open(&mut self, work: Work) {
        self.flush();
        self.current = Some(work);
    }

    fn flush(&mut self) {
        if let Some(work) = self.current.take() {
            self.done.push(work);
        }
    }

    fn current(&mut self) -> &mut Work {
        self.current.get_or_insert_with(Work::default)
    }

    /// Record a position. An entry that already has one, or that names a
    /// different company, is closed first; the new entry keeps the
    /// company when the line names none.
    fn set_position(&mut self, position: &str, company: Option<&str>, dates: &[&str]) {
        let needs_new = match &self.current {
            Some(work) => {
                work.position.is_some()
                    || company.is_some_and(|c| !work.name.is_empty() && work.name != c)
            }
            None => false,
        };
        if needs_new {
            let inherited = self
                .current
                .as_ref()
                .map(|w| w.name.clone())
                .unwrap_or_default();
            self.open(Work::named(company.map(str::to_string).unwrap_or(inherited)));
        }

        let work = self.current();
        if work.name.is_empty() {
            if let Some(company) = company {
                work.name = company.to_string();
            }
        }
        work.position = Some(position.to_string());
        self.set_dates(dates);
    }

    /// Start and end from a year list; a lone year runs to the present.
    fn set_dates(&mut self, dates: &[&str]) {
        if let Some(start) = dates.first() {
            let work = self.current();
            work.start_date = Some(start.to_string());
            work.end_date = Some(dates.get(1).unwrap_or(&"Present").to_string());
        }
    }

    /// A line holding only dates completes the open entry. Once that entry
    /// has dates, the line starts a new period at the same company.
    fn add_period(&mut self, dates: &[&str]) {
        if let Some(work) = &self.current {
            if work.start_date.is_some() {
                let company = work.name.clone();
                self.open(Work::named(company));
            }
        }
        self.set_dates(dates);
    }

    fn add_highlight(&mut self, text: &str) {
        let text = text.trim();
        if text.chars().count() >= MIN_HIGHLIGHT_CHARS {
            self.current().highlights.push(text.to_string());
        }
    }

    fn finish(mut self) -> Vec<Work> {
        self.flush();
        self.done
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Block;

    fn extract(texts: &[&str]) -> Vec<Work> {
        let lines: Vec<Line> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| Line::from_blocks(vec![Block::synthetic(*t, i)]))
            .collect();
        ExperienceExtractor::new(Vocabulary::builtin()).extract(&lines)
    }

    #[test]
    fn test_position_line() {
        let work = extract(&[
            "Acme Corp, Senior Software Engineer 2019-2021",
            "Built a payments platform serving millions",
            "Tiny",
        ]);
        assert_eq!(work.len(), 1);
        assert_eq!(work[0].name, "Acme Corp");
        assert_eq!(work[0].position.as_deref(), Some("Senior Software Engineer"));
        assert_eq!(work[0].start_date.as_deref(), Some("2019"));
        assert_eq!(work[0].end_date.as_deref(), Some("2021"));
        assert_eq!(work[0].highlights, vec!["Built a payments platform serving millions"]);
    }

    #[test]
    fn test_missing_end_year_is_present() {
        let work = extract(&["Globex Developer 2022"]);
        assert_eq!(work[0].end_date.as_deref(), Some("Present"));
    }

    #[test]
    fn test_company_line_opens_entry() {
        let work = extract(&[
            "Initech 2015 - 2018",
            "Position: Analyst",
            "Maintained reporting pipelines for finance",
            "Company: Hooli",
            "• Scaled the search cluster to 40 nodes",
        ]);
        assert_eq!(work.len(), 2);
        assert_eq!(work[0].name, "Initech");
        assert_eq!(work[0].position.as_deref(), Some("Analyst"));
        assert_eq!(work[0].start_date.as_deref(), Some("2015"));
        assert_eq!(work[0].end_date.as_deref(), Some("2018"));
        assert_eq!(work[0].highlights.len(), 1);
        assert_eq!(work[1].name, "Hooli");
        assert_eq!(work[1].highlights, vec!["Scaled the search cluster to 40 nodes"]);
    }

    #[test]
    fn test_dates_line_completes_entry() {
        let work = extract(&[
            "Acme Corp, Software Engineer",
            "2019 - 2021",
            "Built billing services for many customers",
            "Reduced latency of checkout by forty percent",
        ]);
        assert_eq!(work.len(), 1);
        assert_eq!(work[0].name, "Acme Corp");
        assert_eq!(work[0].start_date.as_deref(), Some("2019"));
        assert_eq!(work[0].end_date.as_deref(), Some("2021"));
        assert_eq!(work[0].highlights.len(), 2);
    }

    #[test]
    fn test_second_dates_line_opens_period() {
        let work = extract(&[
            "Company: Initech",
            "2015 - 2017",
            "Maintained reporting pipelines for finance",
            "2017 - 2020",
            "Migrated the ledger to a new datastore",
        ]);
        assert_eq!(work.len(), 2);
        assert_eq!(work[1].name, "Initech");
        assert_eq!(work[1].start_date.as_deref(), Some("2017"));
        assert_eq!(work[1].highlights, vec!["Migrated the ledger to a new datastore"]);
    }

    #[test]
    fn test_second_position_keeps_company() {
        let work = extract(&[
            "Company: Acme",
            "Title: Junior Developer",
            "Title: Senior Developer",
        ]);
        assert_eq!(work.len(), 2);
        assert_eq!(work[1].name, "Acme");
        assert_eq!(work[1].position.as_deref(), Some("Senior Developer"));
    }

    #[test]
    fn test_summary_label() {
        let work = extract(&["Company: Acme", "Description: Led the platform team"]);
        assert_eq!(work[0].summary.as_deref(), Some("Led the platform team"));
    }

    #[test]
    fn test_skips_contamination() {
        let work = extract(&[
            "jane@x.com",
            "ABC University",
            "Bachelor of Science 2013",
            "2020",
        ]);
        assert!(work.is_empty());
    }

    #[test]
    fn test_chinese_lines() {
        let work = extract(&["某某科技公司 高级工程师 2018 - 2020"]);
        assert_eq!(work.len(), 1);
        assert_eq!(work[0].name, "某某科技公司");
        assert_eq!(work[0].position.as_deref(), Some("高级工程师"));
    }
}
