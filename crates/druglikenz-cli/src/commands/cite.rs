use crate::cli::{CitationFormat, CiteArgs};
use crate::error::{CliError, Result};
use druglikenz::engine::export::ExportError;
use std::path::Path;
use tracing::info;

struct Author {
    first: &'static str,
    last: &'static str,
}

impl Author {
    fn initial(&self) -> String {
        self.first
            .chars()
            .next()
            .map(|c| format!("{c}."))
            .unwrap_or_default()
    }
}

const AUTHORS: [Author; 2] = [
    Author {
        first: "Yazid",
        last: "Mahdaoui",
    },
    Author {
        first: "Hana",
        last: "Zakkoumi",
    },
];
const YEAR: &str = "2026";
const TITLE: &str = "DrugLikenZ: An Open-Source Graphical User Interface for Batch Evaluation of Rule-of-Five Compliance";
const PUBLISHER: &str = "Zenodo";
const DOI: &str = "https://doi.org/10.5281/zenodo.18500549";

const TEXT_STYLES: [(CitationFormat, &str); 5] = [
    (CitationFormat::Apa, "APA"),
    (CitationFormat::Mla, "MLA"),
    (CitationFormat::Chicago, "Chicago"),
    (CitationFormat::Harvard, "Harvard"),
    (CitationFormat::Vancouver, "Vancouver"),
];

/// The software citation in the requested style.
pub fn format_citation(format: CitationFormat) -> String {
    let [a, b] = &AUTHORS;
    let (a_init, b_init) = (a.initial(), b.initial());
    match format {
        CitationFormat::Apa => format!(
            "{}, {}, & {}, {} ({YEAR}). {TITLE}. {PUBLISHER}. {DOI}",
            a.last, a_init, b.last, b_init
        ),
        CitationFormat::Mla => format!(
            "{}, {}, and {} {}. \"{TITLE}.\" {PUBLISHER}, {YEAR}. {DOI}.",
            a.last, a.first, b.first, b.last
        ),
        CitationFormat::Chicago => format!(
            "{}, {}, and {} {}. {TITLE}. {PUBLISHER}, {YEAR}. {DOI}.",
            a.last, a.first, b.first, b.last
        ),
        CitationFormat::Harvard => format!(
            "{}, {} and {}, {} {YEAR}, '{TITLE}', {PUBLISHER}, viewed [Date], <{DOI}>.",
            a.last, a_init, b.last, b_init
        ),
        CitationFormat::Vancouver => format!(
            "{} {}, {} {} {TITLE}. {PUBLISHER}; {YEAR}. Available from: {DOI}.",
            a.last, a_init, b.last, b_init
        ),
        CitationFormat::Bibtex => format!(
            "@misc{{druglikenz_{YEAR},\n  author = {{{}, {} and {}, {}}},\n  title = {{{TITLE}}},\n  year = {{{YEAR}}},\n  publisher = {{{PUBLISHER}}},\n  doi = {{{DOI}}}\n}}",
            a.last, a.first, b.last, b.first
        ),
        CitationFormat::Ris => format!(
            "TY  - COMP\nAU  - {}, {}\nAU  - {}, {}\nTI  - {TITLE}\nPY  - {YEAR}\nPB  - {PUBLISHER}\nUR  - {DOI}\nER  - ",
            a.last, a.first, b.last, b.first
        ),
        CitationFormat::Endnote => format!(
            "%0 Computer Program\n%A {}, {}\n%A {}, {}\n%T {TITLE}\n%D {YEAR}\n%I {PUBLISHER}\n%R {DOI}\n",
            a.last, a.first, b.last, b.first
        ),
    }
}

/// Reference-manager format implied by a file extension (`.bib`, `.ris`, `.enw`).
pub fn format_for_path(path: &Path) -> Option<CitationFormat> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "bib" => Some(CitationFormat::Bibtex),
        "ris" => Some(CitationFormat::Ris),
        "enw" => Some(CitationFormat::Endnote),
        _ => None,
    }
}

fn render(format: Option<CitationFormat>) -> String {
    match format {
        Some(format) => format_citation(format),
        None => TEXT_STYLES
            .iter()
            .map(|&(format, label)| format!("{label:<10} {}", format_citation(format)))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Writes the citation to `path`, picking the format from the extension when none is given.
pub fn write_citation(path: &Path, format: Option<CitationFormat>) -> Result<CitationFormat> {
    let format = format.or_else(|| format_for_path(path)).ok_or_else(|| {
        CliError::Argument(format!(
            "Cannot infer a citation format from '{}'; pass --format or use .bib, .ris or .enw",
            path.display()
        ))
    })?;
    let mut text = format_citation(format);
    if !text.ends_with('\n') {
        text.push('\n');
    }
    std::fs::write(path, text).map_err(|e| CliError::Export {
        path: path.to_path_buf(),
        source: ExportError::Io(e),
    })?;
    Ok(format)
}

pub fn run(args: CiteArgs) -> Result<()> {
    if let Some(path) = &args.output {
        let format = write_citation(path, args.format)?;
        info!("Wrote {:?} citation to '{}'.", format, path.display());
        println!("Citation saved to {}", path.display());
        return Ok(());
    }
    if let Some(format) = args.format {
        info!("Printing citation in {:?} format.", format);
    }
    println!("{}", render(args.format));
    Ok(())
}
