//! # PDF Generation Module
//!
//! Typesets worksheets with Typst.
//!
//! ## Architecture
//!
//! - The page template is an embedded string constant
//! - Problems are appended as Typst markup: headings, paragraphs for text
//!   steps, display math for math steps
//! - Output is raw PDF bytes (`Vec<u8>`)
//!
//! Equation and step markup produced by the generators is already Typst
//! math, so it is inserted verbatim between `$ ... $`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use trig_core::config::GeneratorConfig;
//! use trig_core::pdf::render_worksheet_pdf;
//! use trig_core::worksheet::Worksheet;
//!
//! let mut sheet = Worksheet::with_config("Week 5", GeneratorConfig::seeded(5));
//! sheet.add_equations("7", 3).unwrap();
//! let pdf_bytes = render_worksheet_pdf(&sheet).unwrap();
//! std::fs::write("week5.pdf", pdf_bytes).unwrap();
//! ```

use chrono::Utc;
use tracing::debug;
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::errors::{TrigError, TrigResult};
use crate::instance::{EquationInstance, StepKind};
use crate::worksheet::Worksheet;

// ============================================================================
// Typst World Implementation
// ============================================================================

/// A minimal Typst world for compiling documents without external files.
struct PdfWorld {
    /// The main source document
    main: Source,
    book: LazyHash<FontBook>,
    /// Bundled fonts (text and math)
    fonts: Vec<Font>,
    library: LazyHash<Library>,
}

impl PdfWorld {
    fn new(source: String) -> Self {
        let fonts = Self::load_fonts();
        let book = FontBook::from_fonts(&fonts);

        PdfWorld {
            main: Source::detached(source),
            book: LazyHash::new(book),
            fonts,
            library: LazyHash::new(Library::default()),
        }
    }

    fn load_fonts() -> Vec<Font> {
        typst_assets::fonts()
            .flat_map(|font_bytes| Font::iter(Bytes::new(font_bytes.to_vec())))
            .collect()
    }
}

impl World for PdfWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.fonts.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let now = Utc::now();
        Datetime::from_ymd(
            now.format("%Y").to_string().parse().ok()?,
            now.format("%m").to_string().parse().ok()?,
            now.format("%d").to_string().parse().ok()?,
        )
    }
}

// ============================================================================
// Templates
// ============================================================================

/// Page setup and title block
const WORKSHEET_HEADER: &str = r##"
#set page(
  paper: "a4",
  margin: (top: 2.5cm, bottom: 2.5cm, left: 2.5cm, right: 2.5cm),
  footer: context [
    #line(length: 100%, stroke: 0.5pt + gray)
    #v(4pt)
    #grid(
      columns: (1fr, 1fr),
      align(left)[#text(size: 9pt)[{{TITLE}}]],
      align(right)[#text(size: 9pt)[Page #counter(page).display()]],
    )
  ]
)

#set text(font: "New Computer Modern", size: 12pt)
#set par(justify: false, leading: 0.7em)

#align(center)[
  #block(width: 100%, fill: rgb("#f0f0f0"), inset: 12pt, radius: 4pt)[
    #text(size: 18pt, weight: "bold")[{{TITLE}}]
    #v(4pt)
    #text(size: 10pt)[{{SUBTITLE}}]
  ]
]

#v(12pt)
"##;

// ============================================================================
// Rendering
// ============================================================================

/// Build the complete Typst source for a worksheet.
///
/// In answer-key mode every problem is one line: the equation and its answer.
/// Otherwise each problem gets a heading, the equation, the narrated steps
/// (when `show_steps` is on) and, with `page_breaks`, its own page.
pub fn render_worksheet_typst(sheet: &Worksheet) -> String {
    let settings = &sheet.settings;
    let subtitle = match settings.generator.seed {
        Some(seed) => format!(
            "{} problems #h(1em) seed {} #h(1em) {}",
            sheet.len(),
            seed,
            sheet.meta.created.format("%Y-%m-%d")
        ),
        None => format!("{} problems #h(1em) {}", sheet.len(), sheet.meta.created.format("%Y-%m-%d")),
    };
    let mut source = WORKSHEET_HEADER
        .replace("{{TITLE}}", &escape_typst(&sheet.meta.title))
        .replace("{{SUBTITLE}}", &subtitle);

    if settings.answer_key_only {
        source.push_str("= Answer Key\n\n");
        for (i, problem) in sheet.problems.iter().enumerate() {
            source.push_str(&format!(
                "+ ${}$ #h(1fr) ${}$\n",
                problem.equation_markup(),
                problem.solution_markup()
            ));
            debug!(problem = i + 1, "answer key entry");
        }
        return source;
    }

    for (i, problem) in sheet.problems.iter().enumerate() {
        if i > 0 && settings.page_breaks {
            source.push_str("#pagebreak()\n");
        }
        source.push_str(&render_problem(i + 1, problem, settings.show_steps));
    }
    source
}

/// One problem block
fn render_problem(number: usize, problem: &EquationInstance, show_steps: bool) -> String {
    let mut out = format!(
        "== Problem {}\n\n#text(size: 9pt, fill: gray)[{}]\n\nSolve the equation:\n\n$ {} $\n\n",
        number,
        escape_typst(problem.category().name()),
        problem.equation_markup()
    );
    if show_steps && !problem.steps().is_empty() {
        out.push_str("*Solution*\n\n");
        for step in problem.steps() {
            match step.kind {
                StepKind::Text => out.push_str(&format!("{}\n\n", step.markup)),
                StepKind::Math => out.push_str(&format!("$ {} $\n\n", step.markup)),
            }
        }
    } else {
        out.push_str(&format!("*Answer:* $ {} $\n\n", problem.solution_markup()));
    }
    out
}

/// Compile a worksheet to PDF bytes.
pub fn render_worksheet_pdf(sheet: &Worksheet) -> TrigResult<Vec<u8>> {
    let source = render_worksheet_typst(sheet);
    compile_pdf(source)
}

fn compile_pdf(source: String) -> TrigResult<Vec<u8>> {
    let world = PdfWorld::new(source);
    let warned = typst::compile(&world);

    let document = warned.output.map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        TrigError::RenderFailed {
            reason: format!("Typst compilation failed: {}", error_msgs.join("; ")),
        }
    })?;

    let pdf_bytes = typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        TrigError::RenderFailed {
            reason: format!("PDF rendering failed: {}", error_msgs.join("; ")),
        }
    })?;

    debug!(bytes = pdf_bytes.len(), "pdf rendered");
    Ok(pdf_bytes)
}

/// Escape special Typst characters in user-provided text
fn escape_typst(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '*' => "\\*".to_string(),
            '_' => "\\_".to_string(),
            '#' => "\\#".to_string(),
            '$' => "\\$".to_string(),
            '@' => "\\@".to_string(),
            '<' => "\\<".to_string(),
            '>' => "\\>".to_string(),
            '[' => "\\[".to_string(),
            ']' => "\\]".to_string(),
            '\\' => "\\\\".to_string(),
            '`' => "\\`".to_string(),
            _ => c.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;

    fn sample_sheet() -> Worksheet {
        let mut sheet = Worksheet::with_config("Practice #1", GeneratorConfig::seeded(21));
        sheet.add_equations("2", 1).unwrap();
        sheet.add_equations("13", 1).unwrap();
        sheet
    }

    #[test]
    fn test_escape_typst() {
        assert_eq!(escape_typst("Practice #1"), "Practice \\#1");
        assert_eq!(escape_typst("a_b*c"), "a\\_b\\*c");
    }

    #[test]
    fn test_typst_source_layout() {
        let sheet = sample_sheet();
        let source = render_worksheet_typst(&sheet);
        assert!(source.contains("Practice \\#1"));
        assert!(source.contains("== Problem 1"));
        assert!(source.contains("== Problem 2"));
        assert_eq!(source.matches("#pagebreak()").count(), 1);
        assert!(source.contains(&format!("$ {} $", sheet.problems[0].equation_markup())));
        assert!(source.contains("seed 21"));
    }

    #[test]
    fn test_answer_key_layout() {
        let mut sheet = sample_sheet();
        sheet.settings.answer_key_only = true;
        let source = render_worksheet_typst(&sheet);
        assert!(source.contains("= Answer Key"));
        assert!(!source.contains("== Problem"));
        assert!(source.contains(&sheet.problems[1].solution_markup()));
    }

    #[test]
    fn test_steps_hidden() {
        let mut sheet = sample_sheet();
        sheet.settings.show_steps = false;
        let source = render_worksheet_typst(&sheet);
        assert!(!source.contains("*Solution*"));
        assert_eq!(source.matches("*Answer:*").count(), 2);
    }

    #[test]
    fn test_pdf_generation() {
        let pdf = render_worksheet_pdf(&sample_sheet());
        assert!(pdf.is_ok(), "PDF generation failed: {:?}", pdf.err());

        let pdf_bytes = pdf.unwrap();
        assert!(pdf_bytes.starts_with(b"%PDF"), "Output is not a valid PDF");
        assert!(pdf_bytes.len() > 1000, "PDF seems too small");
    }
}
