use crate::cli::ScreenArgs;
use crate::config::{AppConfig, build_config};
use crate::error::{CliError, Result};
use crate::resolver::PubChemResolver;
use crate::ui;
use crate::utils::parser;
use crate::utils::progress::CliProgressHandler;
use druglikenz::engine::cancel::CancellationToken;
use druglikenz::engine::export::{self, ExportError};
use druglikenz::engine::progress::ProgressReporter;
use druglikenz::engine::resolver::NameResolver;
use druglikenz::engine::results::ScreeningOutcome;
use druglikenz::workflows::screen;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tokio::task;
use tracing::{info, warn};

pub async fn run(args: ScreenArgs, show_progress: bool) -> Result<()> {
    let config = build_config(&args)?;
    let outcome = screen_input(&config, show_progress).await?;

    println!(
        "Removed {} duplicate row(s).",
        outcome.stats.duplicates_removed
    );
    print!("{}", ui::render_summary(&outcome));

    let selection = parser::select_pages(args.page, args.all_pages, outcome.page_count())
        .map_err(|e| CliError::Argument(e.to_string()))?;
    let rule = outcome.rule().definition();
    let projection = outcome.projection();
    let chunks = projection.chunks(outcome.chunk_size);
    for chunk in selection.into_iter().filter_map(|i| chunks.get(i)) {
        println!();
        print!("{}", ui::render_page(rule, chunk));
    }

    if let Some(path) = &config.accepted_csv {
        let written = export_accepted(path, &outcome)?;
        println!("✓ Accepted candidates written to: {}", written.display());
    }
    if let Some(dir) = &config.pages_dir {
        let written = export_pages(dir, &outcome)?;
        println!(
            "✓ {} compliance page(s) written to: {}",
            written.len(),
            dir.display()
        );
    }

    println!(
        "Screening Complete! Database reduced to {} drug-like molecules.",
        outcome.stats.accepted
    );
    Ok(())
}

async fn screen_input(config: &AppConfig, show_progress: bool) -> Result<ScreeningOutcome> {
    let resolver = if config.resolver.enabled {
        info!("Resolving names through {}", config.resolver.base_url);
        Some(PubChemResolver::new(&config.resolver)?)
    } else {
        None
    };

    let cancel = CancellationToken::new();
    let interrupt = {
        let token = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received. Cancelling screening...");
                token.cancel();
            }
        })
    };

    let progress_handler = if show_progress {
        CliProgressHandler::new()
    } else {
        CliProgressHandler::hidden()
    };
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Screening {} against {}...",
        config.input_path.display(),
        config.screening.rule
    );
    info!("Invoking the core screening workflow...");

    let result = task::block_in_place(|| {
        screen::run_file(
            &config.input_path,
            &config.structure_column,
            config.key_column.as_deref(),
            &config.screening,
            resolver.as_ref().map(|r| r as &dyn NameResolver),
            &reporter,
            &cancel,
        )
    });
    interrupt.abort();

    let outcome = result?;
    info!(
        accepted = outcome.stats.accepted,
        rejected = outcome.stats.rejected,
        "Workflow finished."
    );
    Ok(outcome)
}

fn export_error(path: &Path) -> impl FnOnce(ExportError) -> CliError + '_ {
    move |source| CliError::Export {
        path: path.to_path_buf(),
        source,
    }
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| export_error(path)(ExportError::Io(e)))
}

/// Writes the accepted subset. A directory target receives the default file name.
pub fn export_accepted(target: &Path, outcome: &ScreeningOutcome) -> Result<PathBuf> {
    let path = if target.is_dir() {
        target.join(export::accepted_file_name(outcome.rule()))
    } else {
        target.to_path_buf()
    };
    let accepted = outcome.accepted_subset();
    info!(rows = accepted.len(), "Writing accepted candidates to {:?}", path);
    export::write_accepted(create(&path)?, &accepted).map_err(export_error(&path))?;
    Ok(path)
}

/// Writes every compliance page as its own CSV file inside `dir`.
pub fn export_pages(dir: &Path, outcome: &ScreeningOutcome) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let projection = outcome.projection();
    let mut written = Vec::new();
    for chunk in projection.chunks(outcome.chunk_size) {
        let path = dir.join(export::page_file_name(outcome.rule(), &chunk));
        export::write_chunk(create(&path)?, &chunk).map_err(export_error(&path))?;
        written.push(path);
    }
    info!(pages = written.len(), "Compliance pages written to {:?}", dir);
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use druglikenz::core::io::table::InputRow;
    use druglikenz::core::rules::RuleId;
    use druglikenz::engine::config::ScreeningConfigBuilder;
    use tempfile::tempdir;

    fn outcome(count: usize, chunk_size: usize) -> ScreeningOutcome {
        let rows: Vec<_> = (1..=count)
            .map(|n| InputRow::from_structure("C".repeat(n)))
            .collect();
        let config = ScreeningConfigBuilder::new()
            .rule(RuleId::Lipinski)
            .chunk_size(chunk_size)
            .build()
            .unwrap();
        screen::run(&rows, &config, None, &ProgressReporter::new()).unwrap()
    }

    #[test]
    fn accepted_export_into_a_directory_uses_the_default_name() {
        let dir = tempdir().unwrap();
        let outcome = outcome(3, 30);
        let path = export_accepted(dir.path(), &outcome).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "Lipinski's_Rule_of_Five_accepted_candidates.csv"
        );
        let content = fs::read_to_string(path).unwrap();
        assert!(content.starts_with("Compound_Name,SMILES,"));
        assert_eq!(content.lines().count(), 1 + outcome.stats.accepted);
    }

    #[test]
    fn accepted_export_to_an_explicit_file() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("hits.csv");
        let path = export_accepted(&target, &outcome(2, 30)).unwrap();
        assert_eq!(path, target);
        assert!(target.exists());
    }

    #[test]
    fn pages_are_written_one_file_each() {
        let dir = tempdir().unwrap();
        let pages_dir = dir.path().join("pages");
        let written = export_pages(&pages_dir, &outcome(7, 3)).unwrap();
        let names: Vec<_> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(
            names,
            [
                "Lipinski's_Rule_of_Five_heatmap_page_1_of_3.csv",
                "Lipinski's_Rule_of_Five_heatmap_page_2_of_3.csv",
                "Lipinski's_Rule_of_Five_heatmap_page_3_of_3.csv",
            ]
        );
        let last = fs::read_to_string(&written[2]).unwrap();
        assert_eq!(last.lines().count(), 2);
    }

    #[test]
    fn unwritable_export_target_is_an_export_error() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("missing").join("hits.csv");
        let result = export_accepted(&target, &outcome(1, 30));
        assert!(matches!(result, Err(CliError::Export { .. })));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn screen_command_runs_end_to_end() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("library.csv");
        fs::write(&input, "SMILES\nCCO\nCCO\nc1ccccc1\nnot-a-smiles\n").unwrap();
        let export_path = dir.path().join("accepted.csv");

        let args = ScreenArgs {
            input: input.clone(),
            export: Some(export_path.clone()),
            pages_dir: Some(dir.path().join("pages")),
            all_pages: true,
            ..ScreenArgs::default()
        };
        run(args, false).await.unwrap();

        let exported = fs::read_to_string(&export_path).unwrap();
        assert_eq!(exported.lines().count(), 3);
        assert!(dir.path().join("pages").read_dir().unwrap().next().is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn missing_structure_column_fails_before_screening() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("library.csv");
        fs::write(&input, "ID,Structure\n1,CCO\n").unwrap();

        let args = ScreenArgs {
            input,
            ..ScreenArgs::default()
        };
        let result = run(args, false).await;
        assert!(matches!(result, Err(CliError::Screening(_))));
    }
}
