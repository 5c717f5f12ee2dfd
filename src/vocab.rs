//! Keyword tables, technology vocabulary and the degree-rule cascade.
//!
//! A [`Vocabulary`] is immutable once built. The built-in one is compiled
//! once per process and shared by reference; custom vocabularies can be
//! loaded from JSON.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::SectionKind;

/// Section heading keywords per section type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionKeywords {
    pub education: Vec<String>,
    pub experience: Vec<String>,
    pub skills: Vec<String>,
    pub summary: Vec<String>,
}

impl Default for SectionKeywords {
    fn default() -> Self {
        Self {
            education: strings(&[
                "education",
                "academic",
                "academics",
                "学历",
                "教育",
                "教育背景",
                "教育经历",
                "学习经历",
                "学业",
            ]),
            experience: strings(&[
                "experience",
                "employment",
                "work",
                "history",
                "工作",
                "工作经历",
                "工作经验",
                "实习",
                "实习经历",
                "项目经历",
                "项目经验",
            ]),
            skills: strings(&[
                "skills",
                "technologies",
                "tech stack",
                "technical",
                "proficiency",
                "language",
                "技能",
                "技术",
                "专业技能",
                "技术栈",
            ]),
            summary: strings(&[
                "summary",
                "objective",
                "profile",
                "about",
                "简介",
                "概述",
                "关于我",
                "自我介绍",
            ]),
        }
    }
}

/// One entry of the degree cascade, as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegreeRuleConfig {
    /// Canonical study-type label
    pub label: String,
    /// Exact pattern, evaluated in cascade order
    pub pattern: String,
    /// Loose pattern for the fallback pass
    pub loose: String,
}

impl DegreeRuleConfig {
    fn new(label: &str, pattern: &str, loose: &str) -> Self {
        Self {
            label: label.to_string(),
            pattern: pattern.to_string(),
            loose: loose.to_string(),
        }
    }
}

/// Institution reported by the built-in fallback table.
pub const UNSPECIFIED_INSTITUTION: &str = "Unspecified Institution";

/// Last-resort institution for a canonical label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstitutionFallback {
    /// Substring of the canonical label that selects this entry
    pub label_contains: String,
    pub institution: String,
}

/// Serializable vocabulary description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VocabularyConfig {
    pub section_keywords: SectionKeywords,
    /// Technology names, in the casing they should be reported with
    pub technologies: Vec<String>,
    /// Ordered most specific first
    pub degree_rules: Vec<DegreeRuleConfig>,
    /// Opens a merged degree statement
    pub degree_trigger: String,
    /// Extends an open degree statement
    pub continuation: String,
    /// Institution-type nouns
    pub institution: String,
    /// Seniority and role words
    pub position: String,
    pub institution_fallbacks: Vec<InstitutionFallback>,
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            section_keywords: SectionKeywords::default(),
            technologies: strings(&[
                // Languages
                "JavaScript",
                "Python",
                "Java",
                "C++",
                "C#",
                "TypeScript",
                "Ruby",
                "PHP",
                "Swift",
                "Kotlin",
                "Go",
                "Rust",
                "Scala",
                "SQL",
                // Frontend
                "React",
                "Vue",
                "Angular",
                "Next.js",
                "Nuxt.js",
                "jQuery",
                // Backend
                "Node.js",
                "Django",
                "Spring",
                "Express",
                "Flask",
                "Laravel",
                // Datastores
                "MySQL",
                "PostgreSQL",
                "MongoDB",
                "Redis",
                "Oracle",
                "SQL Server",
                "Elasticsearch",
                // Platforms and tools
                "Git",
                "Docker",
                "Kubernetes",
                "AWS",
                "Azure",
                "GCP",
                "Linux",
                "Jenkins",
                "Terraform",
                "Kafka",
                // Data
                "Pandas",
                "TensorFlow",
                "PyTorch",
                // Other
                "HTML",
                "CSS",
                "REST",
                "GraphQL",
                "WebSocket",
                "CI/CD",
            ]),
            degree_rules: vec![
                DegreeRuleConfig::new(
                    "Post-Graduate Diploma",
                    r"(?i)\bpost[\s-]?grad(?:uate)?\b",
                    r"(?i)post[\s-]?grad",
                ),
                DegreeRuleConfig::new(
                    "Doctor of Philosophy",
                    r"(?i)\bph\.?\s?d\b|\bdoctor\s+of\s+philosophy\b|\bdoctorate\b|博士",
                    r"(?i)doctor|ph\.?d|博士",
                ),
                DegreeRuleConfig::new(
                    "Master of Business Administration",
                    r"(?i)\bmaster(?:'?s)?\s+of\s+business\s+administration\b|\bm\.?b\.?a\b",
                    r"(?i)\bmba\b|business\s*administration",
                ),
                DegreeRuleConfig::new(
                    "Master of Science",
                    r"(?i)\bmaster(?:'?s)?\s+of\s+science\b|(?-i:\bM\.\s?Sc?\b\.?|\bMSc\b)",
                    r"(?i)master.*science",
                ),
                DegreeRuleConfig::new(
                    "Master of Arts",
                    r"(?i)\bmaster(?:'?s)?\s+of\s+arts\b|(?-i:\bM\.\s?A\b\.?)",
                    r"(?i)master.*arts",
                ),
                DegreeRuleConfig::new(
                    "Master of Engineering",
                    r"(?i)\bmaster(?:'?s)?\s+of\s+engineering\b|(?-i:\bM\.\s?Eng\b|\bMEng\b)",
                    r"(?i)master.*engineering",
                ),
                DegreeRuleConfig::new(
                    "Master",
                    r"(?i)\bmaster(?:'?s)?\b|硕士|研究生",
                    r"(?i)master|硕士|研究生",
                ),
                DegreeRuleConfig::new(
                    "Bachelor of Science",
                    r"(?i)\bbachelor(?:'?s)?\s+of\s+science\b|(?-i:\bB\.\s?Sc?\b\.?|\bBSc\b)",
                    r"(?i)bachelor.*science",
                ),
                DegreeRuleConfig::new(
                    "Bachelor of Arts",
                    r"(?i)\bbachelor(?:'?s)?\s+of\s+arts\b|(?-i:\bB\.\s?A\b\.?)",
                    r"(?i)bachelor.*arts",
                ),
                DegreeRuleConfig::new(
                    "Bachelor of Engineering",
                    r"(?i)\bbachelor(?:'?s)?\s+of\s+engineering\b|(?-i:\bB\.\s?Eng\b|\bBEng\b)|工学学士",
                    r"(?i)bachelor.*engineering",
                ),
                DegreeRuleConfig::new(
                    "Bachelor",
                    r"(?i)\bbachelor(?:'?s)?\b|本科|学士",
                    r"(?i)bachelor|本科|学士",
                ),
                DegreeRuleConfig::new(
                    "Associate Degree",
                    r"(?i)\bassociate(?:'?s)?\s+(?:degree|of)\b|大专|专科",
                    r"(?i)associate|大专|专科",
                ),
                DegreeRuleConfig::new("Diploma", r"(?i)\bdiploma\b", r"(?i)diploma|certificate"),
                DegreeRuleConfig::new("Degree", r"(?i)\bdegree\b|学位", r"(?i)degree|学位"),
            ],
            degree_trigger: concat!(
                r"(?i)post[\s-]?grad|bachelor|master|\bph\.?\s?d\b|doctor|diploma|\bdegree\b|\bmba\b",
                r"|\bassociate(?:'?s)?\s+(?:degree|of)\b",
                r"|(?-i:\b[BM]\.\s?(?:Sc?|A|Eng)\b|\bBSc\b|\bMSc\b|\bBEng\b|\bMEng\b)",
                r"|本科|硕士|博士|学士|研究生|大专|专科|学位"
            )
            .to_string(),
            continuation: concat!(
                r"(?i)\b(?:university|college|institute|school|polytechnic|academy)\b|大学|学院",
                r"|\(\s*(?:expected|anticipated|(?:19|20)\d{2})|\bexpected\b",
                r"|^\s*(?:19|20)\d{2}\s*(?:[-–~至]|$)|^\s*\([^)]{1,60}\)\s*$",
                r"|\bgpa\b|\bcourse(?:work|s)?\s*[:：]|主修课程|成绩"
            )
            .to_string(),
            institution: r"(?i)\b(?:university|college|institute|school|polytechnic|academy)\b|大学|学院"
                .to_string(),
            position: concat!(
                r"(?i)(?:\b(?:software|senior|junior|staff|principal|full[\s-]?stack|front[\s-]?end",
                r"|back[\s-]?end|web|mobile|data|devops|qa|lead)\s+)*",
                r"\b(?:engineer|developer|manager|analyst|specialist|consultant|programmer",
                r"|architect|scientist|designer|intern|director)\b",
                r"|(?:高级|资深|初级|前端|后端|全栈|软件|测试|产品)*(?:工程师|开发|经理|程序员|架构师|主管|负责人|实习生)"
            )
            .to_string(),
            // Catch-all: every label contains the empty string.
            institution_fallbacks: vec![InstitutionFallback {
                label_contains: String::new(),
                institution: UNSPECIFIED_INSTITUTION.to_string(),
            }],
        }
    }
}

/// A compiled degree rule.
#[derive(Debug, Clone)]
pub struct DegreeRule {
    pub label: String,
    pub pattern: Regex,
    pub loose: Regex,
}

/// A technology name with its whole-word, case-insensitive matcher.
#[derive(Debug, Clone)]
pub struct Technology {
    pub name: String,
    pattern: Regex,
}

impl Technology {
    fn new(name: &str) -> Result<Self> {
        let pattern = Regex::new(&format!(
            r"(?i)(?:^|[^\p{{L}}\p{{N}}_]){}(?:[^\p{{L}}\p{{N}}_]|$)",
            regex::escape(name)
        ))?;
        Ok(Self {
            name: name.to_string(),
            pattern,
        })
    }

    /// Whole-word, case-insensitive occurrence check.
    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// Compiled, immutable vocabulary.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    section_keywords: Vec<(SectionKind, Vec<String>)>,
    technologies: Vec<Technology>,
    degree_rules: Vec<DegreeRule>,
    degree_trigger: Regex,
    continuation: Regex,
    institution: Regex,
    position: Regex,
    institution_fallbacks: Vec<InstitutionFallback>,
}

static BUILTIN: Lazy<Vocabulary> = Lazy::new(|| {
    Vocabulary::from_config(&VocabularyConfig::default())
        .expect("built-in vocabulary patterns are valid")
});

impl Vocabulary {
    /// The built-in vocabulary, compiled on first use.
    pub fn builtin() -> &'static Vocabulary {
        &BUILTIN
    }

    /// Compile a vocabulary from its configuration.
    pub fn from_config(config: &VocabularyConfig) -> Result<Self> {
        let lower = |words: &[String]| -> Vec<String> {
            words
                .iter()
                .map(|w| w.trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect()
        };
        let keywords = &config.section_keywords;
        let section_keywords = vec![
            (SectionKind::Education, lower(&keywords.education)),
            (SectionKind::Experience, lower(&keywords.experience)),
            (SectionKind::Skills, lower(&keywords.skills)),
            (SectionKind::Summary, lower(&keywords.summary)),
        ];

        let technologies = config
            .technologies
            .iter()
            .filter(|t| !t.trim().is_empty())
            .map(|t| Technology::new(t.trim()))
            .collect::<Result<Vec<_>>>()?;

        let degree_rules = config
            .degree_rules
            .iter()
            .map(|rule| -> Result<DegreeRule> {
                Ok(DegreeRule {
                    label: rule.label.clone(),
                    pattern: Regex::new(&rule.pattern)?,
                    loose: Regex::new(&rule.loose)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            section_keywords,
            technologies,
            degree_rules,
            degree_trigger: Regex::new(&config.degree_trigger)?,
            continuation: Regex::new(&config.continuation)?,
            institution: Regex::new(&config.institution)?,
            position: Regex::new(&config.position)?,
            institution_fallbacks: config.institution_fallbacks.clone(),
        })
    }

    /// Load and compile a vocabulary from JSON. Missing fields take their
    /// built-in defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: VocabularyConfig =
            serde_json::from_str(json).map_err(|e| Error::InvalidVocabulary(e.to_string()))?;
        Self::from_config(&config)
    }

    /// Lower-cased heading keywords for a section kind.
    pub fn section_keywords(&self, kind: SectionKind) -> &[String] {
        self.section_keywords
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, words)| words.as_slice())
            .unwrap_or(&[])
    }

    pub fn technologies(&self) -> &[Technology] {
        &self.technologies
    }

    pub fn degree_rules(&self) -> &[DegreeRule] {
        &self.degree_rules
    }

    pub fn degree_trigger(&self) -> &Regex {
        &self.degree_trigger
    }

    pub fn continuation(&self) -> &Regex {
        &self.continuation
    }

    pub fn institution(&self) -> &Regex {
        &self.institution
    }

    pub fn position(&self) -> &Regex {
        &self.position
    }

    /// Closed fallback lookup: the first entry whose substring occurs in
    /// the canonical label.
    pub fn fallback_institution(&self, canonical_label: &str) -> Option<&str> {
        self.institution_fallbacks
            .iter()
            .find(|f| canonical_label.contains(&f.label_contains))
            .map(|f| f.institution.as_str())
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Vocabulary::builtin().clone()
    }
}

fn strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}
