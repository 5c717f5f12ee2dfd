//! Data model for resume extraction.
//!
//! `Block`, `Line` and `Section` are transient parsing state owned by a
//! single parse invocation. `ParsedResume` and its parts are the only
//! externally visible artifact.

mod block;
mod resume;
mod section;

pub use block::{Block, Line};
pub use resume::{Education, Location, ParsedResume, ResumeBasics, Skill, Work};
pub use section::{Section, SectionKind, SectionMap};
