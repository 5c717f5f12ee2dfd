//! resume-parser CLI - structured resume extraction tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use resume_parser::{
    detect_media_type_from_path, render, JsonFormat, MediaType, ParseOptions, ParsedResume,
    ResumeParser, SectionKind, Vocabulary,
};

#[derive(Parser)]
#[command(name = "resume-parser")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract structured resume data from PDF and plain text", long_about = None)]
struct Cli {
    /// Custom vocabulary JSON file
    #[arg(long, global = true, value_name = "FILE", env = "RESUME_PARSER_VOCAB")]
    vocab: Option<PathBuf>,

    /// Skip undecodable PDF pages instead of failing
    #[arg(long, global = true)]
    lenient: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a resume to JSON
    Parse {
        /// Input PDF or text file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Declared media type (inferred from the file if omitted)
        #[arg(long, value_name = "TYPE")]
        media_type: Option<String>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Print a human-readable summary
    Summary {
        /// Input PDF or text file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Dump the reconstructed lines
    Lines {
        /// Input PDF or text file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show the detected section spans
    Sections {
        /// Input PDF or text file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Parse every PDF and text file in a directory
    Batch {
        /// Input directory
        #[arg(value_name = "DIR")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = build_parser(cli.vocab.as_deref(), cli.lenient).and_then(|parser| {
        match cli.command {
            Commands::Parse {
                input,
                media_type,
                output,
                compact,
            } => cmd_parse(
                &parser,
                &input,
                media_type.as_deref(),
                output.as_deref(),
                compact,
            ),
            Commands::Summary { input } => cmd_summary(&parser, &input),
            Commands::Lines { input } => cmd_lines(&parser, &input),
            Commands::Sections { input } => cmd_sections(&parser, &input),
            Commands::Batch { input, output } => cmd_batch(&parser, &input, output.as_deref()),
            Commands::Version => {
                cmd_version();
                Ok(())
            }
        }
    });

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn build_parser(vocab: Option<&Path>, lenient: bool) -> CliResult<ResumeParser> {
    let mut options = ParseOptions::new();
    if lenient {
        options = options.lenient();
    }
    let mut parser = ResumeParser::new().with_options(options);

    if let Some(path) = vocab {
        let json = fs::read_to_string(path)?;
        parser = parser.with_vocabulary(Vocabulary::from_json(&json)?);
        log::debug!("Loaded vocabulary from {}", path.display());
    }
    Ok(parser)
}

fn write_or_print(output: Option<&Path>, content: &str) -> CliResult<()> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_parse(
    parser: &ResumeParser,
    input: &Path,
    media_type: Option<&str>,
    output: Option<&Path>,
    compact: bool,
) -> CliResult<()> {
    let resume = match media_type {
        Some(declared) => parser.parse(&fs::read(input)?, declared)?,
        None => parser.parse_file(input)?,
    };

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = render::to_json(&resume, format)?;
    write_or_print(output, &json)
}

fn cmd_summary(parser: &ResumeParser, input: &Path) -> CliResult<()> {
    let resume = parser.parse_file(input)?;
    println!("{}", render::to_text(&resume));
    Ok(())
}

fn cmd_lines(parser: &ResumeParser, input: &Path) -> CliResult<()> {
    let media_type = detect_media_type_from_path(input)?;
    let doc = parser.tokenize(&fs::read(input)?, media_type)?;

    for (i, line) in doc.lines().iter().enumerate() {
        let geometry = match (media_type, line.dominant_block()) {
            (MediaType::Pdf, Some(block)) => format!(
                "p{} y={:.1} {:.1}pt{}",
                line.page(),
                line.y(),
                block.font_size,
                if block.is_bold { " bold" } else { "" }
            ),
            _ => String::new(),
        };
        println!(
            "{:>4} {} {}",
            i.to_string().dimmed(),
            geometry.dimmed(),
            line.text()
        );
    }
    Ok(())
}

fn cmd_sections(parser: &ResumeParser, input: &Path) -> CliResult<()> {
    let media_type = detect_media_type_from_path(input)?;
    let doc = parser.tokenize(&fs::read(input)?, media_type)?;
    let sections = parser.segment(&doc);

    println!("{}", "Detected Sections".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    for section in sections.sections() {
        let heading = section
            .heading
            .and_then(|i| doc.lines().get(i))
            .map(|l| l.text().to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<12} [{}, {})  {} line(s)  {}",
            section.kind.as_str().bold(),
            section.start,
            section.end,
            section.len(),
            heading.dimmed()
        );
    }

    let missing: Vec<&str> = SectionKind::HEADED
        .iter()
        .filter(|kind| sections.get(**kind).is_none())
        .map(|kind| kind.as_str())
        .collect();
    if !missing.is_empty() {
        println!("{}: {}", "Not found".yellow(), missing.join(", "));
    }
    Ok(())
}

fn is_resume_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(MediaType::from_extension)
            .is_some()
}

fn cmd_batch(parser: &ResumeParser, input: &Path, output: Option<&Path>) -> CliResult<()> {
    let output_dir = output.map(|p| p.to_path_buf()).unwrap_or_else(|| {
        let name = input.file_name().unwrap_or_default().to_string_lossy();
        PathBuf::from(format!("{}_parsed", name))
    });
    fs::create_dir_all(&output_dir)?;

    let mut files: Vec<PathBuf> = fs::read_dir(input)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_resume_file(path))
        .collect();
    files.sort();

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut index = Vec::with_capacity(files.len());
    let mut failed = 0;

    for path in &files {
        let name = path.file_name().unwrap_or_default().to_string_lossy();
        pb.set_message(name.to_string());

        match parse_one(parser, path, &output_dir) {
            Ok(resume) => index.push(serde_json::json!({
                "file": name,
                "status": "ok",
                "name": resume.basics.name,
                "education": resume.education.len(),
                "work": resume.work.len(),
                "skills": resume.skill_names(),
            })),
            Err(e) => {
                failed += 1;
                pb.println(format!("{} {}: {}", "Failed".red(), name, e));
                index.push(serde_json::json!({
                    "file": name,
                    "status": "error",
                    "error": e.to_string(),
                }));
            }
        }
        pb.inc(1);
    }

    pb.finish_with_message("Done!");

    fs::write(
        output_dir.join("index.json"),
        serde_json::to_string_pretty(&index)?,
    )?;

    println!(
        "\n{} {} parsed, {} failed -> {}",
        "Batch complete:".green().bold(),
        files.len() - failed,
        failed,
        output_dir.display()
    );
    Ok(())
}

fn parse_one(parser: &ResumeParser, path: &Path, output_dir: &Path) -> CliResult<ParsedResume> {
    let resume = parser.parse_file(path)?;
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    fs::write(
        output_dir.join(format!("{}.json", stem)),
        render::to_json(&resume, JsonFormat::Pretty)?,
    )?;
    Ok(resume)
}

fn cmd_version() {
    println!(
        "{} {}",
        "resume-parser".cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("Structured resume extraction tool");
    println!();
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_arguments() {
        let cli = Cli::try_parse_from([
            "resume-parser",
            "parse",
            "cv.txt",
            "--compact",
            "--lenient",
            "--media-type",
            "text/plain",
        ])
        .unwrap();
        assert!(cli.lenient);
        match cli.command {
            Commands::Parse {
                input,
                compact,
                media_type,
                ..
            } => {
                assert_eq!(input, PathBuf::from("cv.txt"));
                assert!(compact);
                assert_eq!(media_type.as_deref(), Some("text/plain"));
            }
            _ => panic!("expected parse"),
        }
    }

    #[test]
    fn test_is_resume_file() {
        let dir = tempfile::tempdir().unwrap();
        let txt = dir.path().join("a.txt");
        let png = dir.path().join("b.png");
        fs::write(&txt, "Jane").unwrap();
        fs::write(&png, [0u8; 4]).unwrap();
        assert!(is_resume_file(&txt));
        assert!(!is_resume_file(&png));
        assert!(!is_resume_file(dir.path()));
    }

    #[test]
    fn test_batch_writes_outputs() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        fs::write(
            input.path().join("jane.txt"),
            "Jane Doe\njane@x.com\nSkills\nPython, Go",
        )
        .unwrap();
        fs::write(input.path().join("empty.txt"), "   ").unwrap();

        let parser = build_parser(None, false).unwrap();
        cmd_batch(&parser, input.path(), Some(output.path())).unwrap();

        assert!(output.path().join("jane.json").exists());
        assert!(!output.path().join("empty.json").exists());
        let index: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(output.path().join("index.json")).unwrap())
                .unwrap();
        assert_eq!(index.as_array().unwrap().len(), 2);
    }
}
