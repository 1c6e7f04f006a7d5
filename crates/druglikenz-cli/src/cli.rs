use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Yazid Mahdaoui, Hana Zakkoumi",
    version,
    about = "DrugLikenZ CLI - Batch drug-likeness screening of small molecules against the Lipinski, Ro3, Muegge and Veber rule sets.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used for descriptor calculation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Screen a table of SMILES strings against a drug-likeness rule set.
    Screen(ScreenArgs),
    /// List the built-in rule sets and their criteria.
    Rules(RulesArgs),
    /// Print the software citation.
    Cite(CiteArgs),
}

/// Arguments for the `screen` subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct ScreenArgs {
    // --- Input ---
    /// Path to the input table (.csv is comma separated, anything else tab separated).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Column holding the SMILES strings.
    #[arg(long, value_name = "NAME")]
    pub column: Option<String>,

    /// Column used to detect duplicate rows. Defaults to the SMILES column.
    #[arg(long, value_name = "NAME")]
    pub key_column: Option<String>,

    // --- Screening ---
    /// Rule set: lipinski, congreve (ro3), muegge or veber.
    #[arg(short, long, value_name = "RULE")]
    pub rule: Option<String>,

    /// Number of compounds per compliance page.
    #[arg(long, value_name = "INT")]
    pub chunk_size: Option<usize>,

    /// Look up compound names on PubChem.
    #[arg(long)]
    pub resolve_names: bool,

    // --- Output ---
    /// Compliance page to print (1-based).
    #[arg(long, value_name = "N", conflicts_with = "all_pages")]
    pub page: Option<usize>,

    /// Print every compliance page.
    #[arg(long)]
    pub all_pages: bool,

    /// Write accepted candidates to this CSV file.
    #[arg(short, long, value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Write every compliance page as CSV into this directory.
    #[arg(long, value_name = "DIR")]
    pub pages_dir: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S screening.chunk-size=20
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `rules` subcommand.
#[derive(Args, Debug)]
pub struct RulesArgs {
    /// Show only this rule set.
    #[arg(short, long, value_name = "RULE")]
    pub rule: Option<String>,
}

/// Arguments for the `cite` subcommand.
#[derive(Args, Debug)]
pub struct CiteArgs {
    /// Citation style. Prints every text style when omitted.
    #[arg(short, long, value_enum)]
    pub format: Option<CitationFormat>,

    /// Write the citation to a file instead of printing it. The format is
    /// inferred from a .bib, .ris or .enw extension when --format is omitted.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CitationFormat {
    Apa,
    Mla,
    Chicago,
    Harvard,
    Vancouver,
    Bibtex,
    Ris,
    Endnote,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn screen_arguments_parse() {
        let cli = Cli::parse_from([
            "druglikenz",
            "-vv",
            "screen",
            "-i",
            "library.csv",
            "--rule",
            "ro3",
            "--page",
            "2",
            "-S",
            "screening.chunk-size=10",
        ]);
        assert_eq!(cli.verbose, 2);
        let Commands::Screen(args) = cli.command else {
            panic!("expected screen command");
        };
        assert_eq!(args.input, PathBuf::from("library.csv"));
        assert_eq!(args.rule.as_deref(), Some("ro3"));
        assert_eq!(args.page, Some(2));
        assert_eq!(args.set_values, ["screening.chunk-size=10"]);
    }

    #[test]
    fn page_and_all_pages_conflict() {
        let result = Cli::try_parse_from([
            "druglikenz",
            "screen",
            "-i",
            "x.csv",
            "--page",
            "1",
            "--all-pages",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn cite_accepts_known_formats() {
        let cli = Cli::parse_from(["druglikenz", "cite", "--format", "bibtex"]);
        let Commands::Cite(args) = cli.command else {
            panic!("expected cite command");
        };
        assert_eq!(args.format, Some(CitationFormat::Bibtex));
        assert!(args.output.is_none());
    }

    #[test]
    fn cite_accepts_an_output_file() {
        let cli = Cli::parse_from(["druglikenz", "cite", "-o", "druglikenz.ris"]);
        let Commands::Cite(args) = cli.command else {
            panic!("expected cite command");
        };
        assert_eq!(args.format, None);
        assert_eq!(args.output, Some(PathBuf::from("druglikenz.ris")));
    }
}
