//! Final record assembly.

use std::collections::HashSet;

use log::debug;

use crate::model::{Education, ParsedResume, ResumeBasics, Skill, Work};

/// Merges extractor output into a [`ParsedResume`].
///
/// Assembly cannot fail. Entries that would break the record's
/// guarantees are dropped:
///
/// - education without an institution
/// - skills without a name, and repeated skill names after the first
/// - work entries with neither a company nor a position
#[derive(Debug, Clone, Copy, Default)]
pub struct ResumeAssembler;

impl ResumeAssembler {
    pub fn new() -> Self {
        Self
    }

    pub fn assemble(
        &self,
        basics: ResumeBasics,
        education: Vec<Education>,
        work: Vec<Work>,
        skills: Vec<Skill>,
    ) -> ParsedResume {
        let education: Vec<Education> = education
            .into_iter()
            .filter(|e| !e.institution.trim().is_empty())
            .collect();

        let work: Vec<Work> = work.into_iter().filter(|w| !w.is_anonymous()).collect();

        let mut seen = HashSet::new();
        let skills: Vec<Skill> = skills
            .into_iter()
            .filter(|s| !s.name.is_empty() && seen.insert(s.name.clone()))
            .collect();

        debug!(
            "Assembled resume: {} education, {} work, {} skills",
            education.len(),
            work.len(),
            skills.len()
        );

        ParsedResume {
            basics,
            education,
            work,
            skills,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drops_invalid_entries() {
        let resume = ResumeAssembler::new().assemble(
            ResumeBasics::default(),
            vec![
                Education {
                    institution: "ABC University".to_string(),
                    ..Default::default()
                },
                Education::default(),
            ],
            vec![Work::named("Acme"), Work::default()],
            vec![
                Skill::named("Python"),
                Skill::named(""),
                Skill::named("Python"),
                Skill::named("python"),
            ],
        );
        assert_eq!(resume.education.len(), 1);
        assert_eq!(resume.work.len(), 1);
        assert_eq!(resume.skill_names(), vec!["Python", "python"]);
    }

    #[test]
    fn test_keeps_basics() {
        let basics = ResumeBasics {
            name: "Jane Doe".to_string(),
            ..Default::default()
        };
        let resume = ResumeAssembler::new().assemble(basics.clone(), vec![], vec![], vec![]);
        assert_eq!(resume.basics, basics);
        assert!(resume.education.is_empty());
    }
}
