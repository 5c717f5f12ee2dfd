//! Human-readable resume summary.

use std::fmt::Write;

use crate::model::{Education, ParsedResume, Work};

/// Render a resume as a short plain-text summary.
///
/// Empty fields are left out; section headers are always printed so an
/// empty result is still recognizable.
pub fn to_text(resume: &ParsedResume) -> String {
    let mut out = String::new();
    let basics = &resume.basics;

    let name = if basics.name.is_empty() {
        "(no name)"
    } else {
        basics.name.as_str()
    };
    let _ = writeln!(out, "{}", name);
    for (label, value) in [
        ("Email", &basics.email),
        ("Phone", &basics.phone),
        ("URL", &basics.url),
    ] {
        if !value.is_empty() {
            let _ = writeln!(out, "{}: {}", label, value);
        }
    }
    if !basics.summary.is_empty() {
        let _ = writeln!(out, "\n{}", basics.summary);
    }

    let _ = writeln!(out, "\nEducation ({})", resume.education.len());
    for edu in &resume.education {
        let _ = writeln!(out, "  - {}", education_line(edu));
    }

    let _ = writeln!(out, "\nWork ({})", resume.work.len());
    for work in &resume.work {
        let _ = writeln!(out, "  - {}", work_line(work));
        for highlight in &work.highlights {
            let _ = writeln!(out, "      * {}", highlight);
        }
    }

    let _ = writeln!(out, "\nSkills ({})", resume.skills.len());
    if !resume.skills.is_empty() {
        let _ = writeln!(out, "  {}", resume.skill_names().join(", "));
    }

    out.trim_end().to_string()
}

fn education_line(edu: &Education) -> String {
    let mut line = edu.institution.clone();
    match (&edu.study_type, &edu.area) {
        (Some(kind), Some(area)) => line.push_str(&format!(", {} in {}", kind, area)),
        (Some(kind), None) => line.push_str(&format!(", {}", kind)),
        (None, Some(area)) => line.push_str(&format!(", {}", area)),
        (None, None) => {}
    }
    line.push_str(&date_range(&edu.start_date, &edu.end_date));
    if let Some(score) = &edu.score {
        line.push_str(&format!(" [GPA {}]", score));
    }
    line
}

fn work_line(work: &Work) -> String {
    let mut line = match (&work.position, work.name.is_empty()) {
        (Some(position), false) => format!("{} at {}", position, work.name),
        (Some(position), true) => position.clone(),
        (None, _) => work.name.clone(),
    };
    line.push_str(&date_range(&work.start_date, &work.end_date));
    line
}

fn date_range(start: &Option<String>, end: &Option<String>) -> String {
    match (start, end) {
        (Some(s), Some(e)) => format!(" ({} - {})", s, e),
        (Some(s), None) => format!(" ({})", s),
        (None, Some(e)) => format!(" ({})", e),
        (None, None) => String::new(),
    }
}
