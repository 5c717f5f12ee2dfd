//! # resume-parser
//!
//! Heuristic resume extraction from PDF and plain text.
//!
//! Raw bytes are tokenized into ordered lines, split into sections by
//! keyword headings, and mined by per-section extractors for contact
//! basics, education, work history and skills.
//!
//! ## Quick Start
//!
//! ```no_run
//! use resume_parser::{parse, render};
//!
//! fn main() -> resume_parser::Result<()> {
//!     let text = "Jane Doe\njane@x.com\nSkills\nPython, Go";
//!     let resume = parse(text.as_bytes(), "text/plain")?;
//!
//!     println!("{}", render::to_json(&resume, render::JsonFormat::Pretty)?);
//!     println!("{:?}", resume.skill_names());
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Two input formats**: PDF (positioned glyphs) and plain text
//! - **Bilingual headings**: English and Chinese section keywords
//! - **Configurable vocabulary**: load keyword and degree tables from JSON
//! - **Parallel decoding**: PDF pages are decoded with Rayon
//! - **Async**: `parse_async` behind the `async` feature

pub mod assemble;
pub mod detect;
pub mod error;
pub mod extract;
pub mod model;
pub mod parser;
pub mod render;
pub mod segment;
pub mod vocab;

pub use assemble::ResumeAssembler;
pub use detect::{detect_media_type_from_path, is_pdf_bytes, sniff_media_type, MediaType};
pub use error::{Error, Result};
pub use model::{
    Block, Education, Line, Location, ParsedResume, ResumeBasics, Section, SectionKind,
    SectionMap, Skill, Work,
};
pub use parser::{
    ErrorMode, Origin, ParseOptions, TokenizedDocument, Tokenizer, TokenizerRegistry,
};
pub use render::JsonFormat;
pub use segment::SectionSegmenter;
pub use vocab::{Vocabulary, VocabularyConfig, UNSPECIFIED_INSTITUTION};

use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;

use log::debug;

use extract::{BasicsExtractor, EducationExtractor, ExperienceExtractor, SkillsExtractor};

/// Parse a resume from bytes with a declared media type.
///
/// # Example
///
/// ```no_run
/// use resume_parser::parse;
///
/// let data = std::fs::read("resume.pdf").unwrap();
/// let resume = parse(&data, "application/pdf").unwrap();
/// println!("{}", resume.basics.name);
/// ```
pub fn parse(bytes: &[u8], media_type: &str) -> Result<ParsedResume> {
    ResumeParser::new().parse(bytes, media_type)
}

/// Parse a resume with custom options.
///
/// # Example
///
/// ```no_run
/// use resume_parser::{parse_with_options, ParseOptions};
///
/// let options = ParseOptions::new().lenient().sequential();
/// let data = std::fs::read("resume.pdf").unwrap();
/// let resume = parse_with_options(&data, "application/pdf", options).unwrap();
/// ```
pub fn parse_with_options(
    bytes: &[u8],
    media_type: &str,
    options: ParseOptions,
) -> Result<ParsedResume> {
    ResumeParser::new().with_options(options).parse(bytes, media_type)
}

/// Parse a resume file.
///
/// The media type comes from the extension (`pdf`, `txt`, `text`) and
/// otherwise from the file's leading bytes.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<ParsedResume> {
    ResumeParser::new().parse_file(path)
}

/// Parse a resume on Tokio's blocking pool.
///
/// The result is the same as [`parse`].
#[cfg(feature = "async")]
pub async fn parse_async(bytes: Vec<u8>, media_type: &str) -> Result<ParsedResume> {
    let media_type = MediaType::from_declared(media_type)?;
    tokio::task::spawn_blocking(move || ResumeParser::new().parse_media(&bytes, media_type))
        .await
        .map_err(|e| Error::Io(std::io::Error::other(format!("Task join error: {}", e))))?
}

/// Builder for parsing resumes.
///
/// Every call is self-contained: a parser holds only configuration, so
/// one instance can serve any number of documents, from any number of
/// threads.
///
/// # Example
///
/// ```no_run
/// use resume_parser::{ResumeParser, Vocabulary};
///
/// let vocab = Vocabulary::from_json(&std::fs::read_to_string("vocab.json")?)?;
/// let resume = ResumeParser::new()
///     .lenient()
///     .with_vocabulary(vocab)
///     .parse_file("resume.pdf")?;
/// # Ok::<(), resume_parser::Error>(())
/// ```
pub struct ResumeParser {
    options: ParseOptions,
    vocabulary: Cow<'static, Vocabulary>,
    registry: TokenizerRegistry,
}

impl ResumeParser {
    /// Create a parser with default options and the built-in vocabulary.
    pub fn new() -> Self {
        Self {
            options: ParseOptions::default(),
            vocabulary: Cow::Borrowed(Vocabulary::builtin()),
            registry: TokenizerRegistry::with_defaults(),
        }
    }

    /// Replace the parse options.
    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Skip undecodable PDF pages instead of failing.
    pub fn lenient(mut self) -> Self {
        self.options = self.options.lenient();
        self
    }

    /// Decode PDF pages on the calling thread.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    /// Use a custom vocabulary.
    pub fn with_vocabulary(mut self, vocabulary: Vocabulary) -> Self {
        self.vocabulary = Cow::Owned(vocabulary);
        self
    }

    /// Register an additional tokenizer, replacing the one for its media
    /// types.
    pub fn with_tokenizer(mut self, tokenizer: Arc<dyn Tokenizer>) -> Self {
        self.registry.register(tokenizer);
        self
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Parse bytes with a declared media type string.
    pub fn parse(&self, bytes: &[u8], media_type: &str) -> Result<ParsedResume> {
        let media_type = MediaType::from_declared(media_type)?;
        self.parse_media(bytes, media_type)
    }

    /// Parse bytes of a known media type.
    pub fn parse_media(&self, bytes: &[u8], media_type: MediaType) -> Result<ParsedResume> {
        let doc = self.tokenize(bytes, media_type)?;
        Ok(self.parse_document(&doc))
    }

    /// Parse a file, inferring its media type.
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<ParsedResume> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let media_type = match path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(MediaType::from_extension)
        {
            Some(media_type) => media_type,
            None => sniff_media_type(&bytes)?,
        };
        self.parse_media(&bytes, media_type)
    }

    /// Turn bytes into lines without extracting anything.
    ///
    /// A document without lines is [`Error::NoTextContent`], whichever
    /// tokenizer produced it.
    pub fn tokenize(&self, bytes: &[u8], media_type: MediaType) -> Result<TokenizedDocument> {
        let doc = self.registry.tokenize(bytes, media_type, &self.options)?;
        if doc.lines().is_empty() {
            return Err(Error::NoTextContent);
        }
        debug!("Tokenized {} lines", doc.lines().len());
        Ok(doc)
    }

    /// Locate the section spans of a tokenized document.
    pub fn segment(&self, doc: &TokenizedDocument) -> SectionMap {
        SectionSegmenter::new(&self.vocabulary, &self.options).segment(doc.lines())
    }

    /// Run segmentation and every extractor over a tokenized document.
    ///
    /// This cannot fail: anything not found is left empty.
    pub fn parse_document(&self, doc: &TokenizedDocument) -> ParsedResume {
        let vocab: &Vocabulary = &self.vocabulary;
        let lines = doc.lines();
        let sections = self.segment(doc);

        let basics = BasicsExtractor::new(&self.options).extract(doc);
        let education = EducationExtractor::new(vocab, &self.options)
            .extract(sections.lines(SectionKind::Education, lines), doc.origin());
        let work =
            ExperienceExtractor::new(vocab).extract(sections.lines(SectionKind::Experience, lines));
        let skills = SkillsExtractor::new(vocab)
            .extract(sections.lines(SectionKind::Skills, lines), &doc.text());

        ResumeAssembler::new().assemble(basics, education, work, skills)
    }
}

impl Default for ResumeParser {
    fn default() -> Self {
        Self::new()
    }
}
