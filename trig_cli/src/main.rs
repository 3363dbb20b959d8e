//! # Trigsheet CLI
//!
//! Batch driver for the equation generators: pick categories and counts,
//! generate a worksheet, and write it as PDF, Typst source, a `.tws` file
//! or plain text.
//!
//! ```text
//! trigsheet list
//! trigsheet generate -c 1:3 -c symmetric:2 --seed 7 -o week5.pdf
//! trigsheet render week5.tws -o week5.pdf
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use trig_core::config::{GeneratorConfig, DEFAULT_MAX_ATTEMPTS, SEED_ENV_VAR};
use trig_core::file_io::{load_worksheet, save_worksheet, write_bytes_atomic};
use trig_core::pdf::{render_worksheet_pdf, render_worksheet_typst};
use trig_core::worksheet::{PlanEntry, Worksheet};
use trig_core::{StepKind, ALL_CATEGORIES};

#[derive(Parser)]
#[command(name = "trigsheet")]
#[command(about = "Generate trigonometric equation worksheets with worked solutions")]
#[command(version)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the equation categories and their keys
    List,
    /// Generate a new worksheet
    Generate {
        /// Category key or slug, optionally with a count (e.g. 6:3)
        #[arg(short = 'c', long = "category", value_name = "KEY[:COUNT]", required = true)]
        categories: Vec<PlanEntry>,

        /// Base seed for a reproducible worksheet
        #[arg(long, env = SEED_ENV_VAR)]
        seed: Option<u64>,

        /// Sampling attempts per equation before giving up
        #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
        max_attempts: usize,

        /// Output format (inferred from the output extension when omitted)
        #[arg(short, long, value_enum)]
        format: Option<Format>,

        /// Output file; text, Typst and JSON go to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long, default_value = "Trigonometric Equations")]
        title: String,

        /// Print only equations and answers
        #[arg(long)]
        answer_key: bool,

        /// Omit the worked solutions
        #[arg(long)]
        no_steps: bool,

        /// Keep problems on shared pages
        #[arg(long)]
        no_page_breaks: bool,
    },
    /// Re-render a saved worksheet
    Render {
        /// A `.tws` worksheet file
        input: PathBuf,

        #[arg(short, long, value_enum)]
        format: Option<Format>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Pdf,
    Typst,
    Json,
    Text,
}

impl Format {
    fn from_path(path: &Path) -> Option<Format> {
        match path.extension()?.to_str()? {
            "pdf" => Some(Format::Pdf),
            "typ" => Some(Format::Typst),
            "tws" | "json" => Some(Format::Json),
            "txt" => Some(Format::Text),
            _ => None,
        }
    }

    /// Explicit flag first, then the output extension, then plain text
    fn resolve(flag: Option<Format>, output: Option<&Path>) -> Format {
        flag.or_else(|| output.and_then(Format::from_path)).unwrap_or(Format::Text)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::List => {
            print!("{}", list_categories());
            Ok(())
        }
        Command::Generate {
            categories,
            seed,
            max_attempts,
            format,
            output,
            title,
            answer_key,
            no_steps,
            no_page_breaks,
        } => {
            let config = GeneratorConfig {
                seed,
                max_attempts,
            };
            let mut sheet = build_worksheet(title, config, &categories)?;
            sheet.settings.answer_key_only = answer_key;
            sheet.settings.show_steps = !no_steps;
            sheet.settings.page_breaks = !no_page_breaks;
            write_output(&sheet, Format::resolve(format, output.as_deref()), output.as_deref())
        }
        Command::Render { input, format, output } => {
            let sheet = load_worksheet(&input).with_context(|| format!("loading {}", input.display()))?;
            info!(path = %input.display(), problems = sheet.len(), "worksheet loaded");
            write_output(&sheet, Format::resolve(format, output.as_deref()), output.as_deref())
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn list_categories() -> String {
    let mut out = String::new();
    for category in ALL_CATEGORIES {
        let meta = category.metadata();
        out.push_str(&format!(
            "{:>2}  {:<22} {:<34} {}\n",
            category.key(),
            category.slug(),
            meta.name,
            meta.formula_plain
        ));
    }
    out
}

fn build_worksheet(title: String, config: GeneratorConfig, plan: &[PlanEntry]) -> Result<Worksheet> {
    let mut sheet = Worksheet::with_config(title, config);
    let requested: usize = plan.iter().map(|entry| entry.count).sum();
    let added = sheet.add_plan(plan).context("building the worksheet")?;

    for failure in &sheet.failures {
        warn!(
            category = failure.category.key(),
            index = failure.index,
            code = failure.error.error_code(),
            "equation skipped"
        );
    }
    if added == 0 && requested > 0 {
        bail!("no equations could be generated ({} requested)", requested);
    }
    info!(requested, added, "worksheet generated");
    Ok(sheet)
}

fn write_output(sheet: &Worksheet, format: Format, output: Option<&Path>) -> Result<()> {
    if format == Format::Pdf && output.is_none() {
        bail!("PDF output needs a file; pass -o PATH");
    }
    let bytes = match format {
        Format::Pdf => render_worksheet_pdf(sheet).context("rendering PDF")?,
        Format::Typst => render_worksheet_typst(sheet).into_bytes(),
        Format::Json => {
            if let Some(path) = output {
                save_worksheet(sheet, path).with_context(|| format!("saving {}", path.display()))?;
                info!(path = %path.display(), "worksheet saved");
                return Ok(());
            }
            serde_json::to_string_pretty(sheet)?.into_bytes()
        }
        Format::Text => render_text(sheet).into_bytes(),
    };

    match output {
        Some(path) => {
            write_bytes_atomic(path, &bytes).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), bytes = bytes.len(), "output written");
        }
        None => print!("{}", String::from_utf8_lossy(&bytes)),
    }
    Ok(())
}

/// Plain listing with the raw Typst markup, one block per problem
fn render_text(sheet: &Worksheet) -> String {
    let mut out = format!("{}\n\n", sheet.meta.title);
    for (i, problem) in sheet.problems.iter().enumerate() {
        out.push_str(&format!("{}. [{}] {}\n", i + 1, problem.category().name(), problem.equation_markup()));
        if sheet.settings.show_steps && !sheet.settings.answer_key_only {
            for step in problem.steps() {
                match step.kind {
                    StepKind::Text => out.push_str(&format!("   {}\n", step.markup)),
                    StepKind::Math => out.push_str(&format!("       {}\n", step.markup)),
                }
            }
        } else {
            out.push_str(&format!("   Answer: {}\n", problem.solution_markup()));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_generate() {
        let cli = Cli::try_parse_from([
            "trigsheet", "generate", "-c", "1:3", "-c", "symmetric", "--seed", "7", "-o", "out.pdf",
        ])
        .unwrap();
        match cli.command {
            Command::Generate {
                categories, seed, output, ..
            } => {
                assert_eq!(categories, vec![PlanEntry::new("1", 3), PlanEntry::new("symmetric", 1)]);
                assert_eq!(seed, Some(7));
                assert_eq!(output, Some(PathBuf::from("out.pdf")));
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_generate_requires_category() {
        assert!(Cli::try_parse_from(["trigsheet", "generate"]).is_err());
        assert!(Cli::try_parse_from(["trigsheet", "generate", "-c", "2:x"]).is_err());
    }

    #[test]
    fn test_format_resolution() {
        assert_eq!(Format::resolve(None, Some(Path::new("a.pdf"))), Format::Pdf);
        assert_eq!(Format::resolve(None, Some(Path::new("a.tws"))), Format::Json);
        assert_eq!(Format::resolve(None, Some(Path::new("a.out"))), Format::Text);
        assert_eq!(Format::resolve(Some(Format::Typst), Some(Path::new("a.pdf"))), Format::Typst);
        assert_eq!(Format::resolve(None, None), Format::Text);
    }

    #[test]
    fn test_list_has_every_category() {
        let listing = list_categories();
        assert_eq!(listing.lines().count(), ALL_CATEGORIES.len());
        assert!(listing.contains("inverse_trig"));
    }

    #[test]
    fn test_build_worksheet_rejects_unknown_key() {
        let plan = vec![PlanEntry::new("42", 1)];
        assert!(build_worksheet("T".into(), GeneratorConfig::seeded(1), &plan).is_err());
    }

    #[test]
    fn test_text_rendering() {
        let plan = vec![PlanEntry::new("1", 2)];
        let mut sheet = build_worksheet("Drill".into(), GeneratorConfig::seeded(3), &plan).unwrap();
        let text = render_text(&sheet);
        assert!(text.starts_with("Drill"));
        assert!(text.contains("1. [Simplest Equation]"));
        assert!(text.contains("Answer:"));

        sheet.settings.show_steps = false;
        assert_eq!(render_text(&sheet).matches("Answer: ").count(), 2);
    }

    #[test]
    fn test_json_output_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.tws");
        let plan = vec![PlanEntry::new("12", 1)];
        let sheet = build_worksheet("Saved".into(), GeneratorConfig::seeded(9), &plan).unwrap();

        write_output(&sheet, Format::resolve(None, Some(&path)), Some(&path)).unwrap();
        let loaded = load_worksheet(&path).unwrap();
        assert_eq!(loaded, sheet);
    }

    #[test]
    fn test_pdf_needs_output_path() {
        let sheet = Worksheet::new("Empty");
        assert!(write_output(&sheet, Format::Pdf, None).is_err());
    }
}
