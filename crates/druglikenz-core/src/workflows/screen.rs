use crate::core::descriptors::{DescriptorError, DescriptorVector, compute_descriptors};
use crate::core::io::table::{self, InputRow};
use crate::core::rules::{RuleId, evaluate};
use crate::engine::cancel::CancellationToken;
use crate::engine::config::{ConfigError, ScreeningConfig};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter, Stage};
use crate::engine::resolver::{NameResolver, resolve_or_fallback};
use crate::engine::results::{ResultsTable, ScreeningOutcome, ScreeningStats, StructureRecord};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Screens `rows` against the configured rule.
///
/// Equivalent to [`run_with_cancellation`] with a token that is never cancelled.
pub fn run(
    rows: &[InputRow],
    config: &ScreeningConfig,
    resolver: Option<&dyn NameResolver>,
    reporter: &ProgressReporter,
) -> Result<ScreeningOutcome, EngineError> {
    run_with_cancellation(rows, config, resolver, reporter, &CancellationToken::new())
}

/// Reads the input table at `path` and screens it.
///
/// A missing column or unreadable file fails before any row is processed.
pub fn run_file<P: AsRef<Path>>(
    path: P,
    structure_column: &str,
    key_column: Option<&str>,
    config: &ScreeningConfig,
    resolver: Option<&dyn NameResolver>,
    reporter: &ProgressReporter,
    cancel: &CancellationToken,
) -> Result<ScreeningOutcome, EngineError> {
    let path = path.as_ref();
    info!(path = %path.display(), structure_column, "Reading input table.");
    let rows = table::read_table(path, structure_column, key_column)?;
    run_with_cancellation(&rows, config, resolver, reporter, cancel)
}

/// Screens `rows`, checking `cancel` between rows.
///
/// The run is atomic: a cancelled run returns [`EngineError::Cancelled`] and no partial
/// table. Rows whose structure cannot be parsed are skipped and counted; name lookup
/// failures fall back to the structure string.
#[instrument(skip_all, name = "screening_workflow", fields(rule = %config.rule))]
pub fn run_with_cancellation(
    rows: &[InputRow],
    config: &ScreeningConfig,
    resolver: Option<&dyn NameResolver>,
    reporter: &ProgressReporter,
    cancel: &CancellationToken,
) -> Result<ScreeningOutcome, EngineError> {
    validate_chunk_size(config.chunk_size)?;
    let mut stats = ScreeningStats {
        input_rows: rows.len(),
        ..ScreeningStats::default()
    };

    // === Stage 1: Deduplication ===
    let unique = reporter.stage(Stage::Deduplicating, || deduplicate(rows));
    stats.unique_rows = unique.len();
    stats.duplicates_removed = rows.len() - unique.len();
    info!(
        input_rows = stats.input_rows,
        duplicates_removed = stats.duplicates_removed,
        "Deduplication finished."
    );

    // === Stage 2: Descriptor calculation ===
    let computed = compute_all(&unique, reporter, cancel)?;

    // === Stage 3: Name resolution and rule evaluation ===
    let resolver = resolver.filter(|_| config.resolve_names);
    let definition = config.rule_definition();
    let valid = computed.iter().filter(|(_, result)| result.is_ok()).count();

    reporter.report(Progress::StageStart {
        stage: Stage::EvaluatingRules,
    });
    reporter.report(Progress::RowsStart {
        total: valid as u64,
    });
    let mut records = Vec::with_capacity(valid);
    for (row, result) in computed {
        let descriptors = match result {
            Ok(descriptors) => descriptors,
            Err(e) => {
                debug!(key = %row.key, error = %e, "Skipping unparseable structure.");
                reporter.report(Progress::StructureSkipped {
                    key: row.key.clone(),
                });
                stats.skipped_rows += 1;
                continue;
            }
        };
        if cancel.is_cancelled() {
            return Err(cancelled());
        }
        let resolved = resolve_or_fallback(resolver, &row.structure);
        stats.resolver_failures += usize::from(resolved.failed);

        records.push(StructureRecord {
            name: resolved.name,
            key: row.key.clone(),
            structure: row.structure.clone(),
            evaluation: evaluate(&descriptors, definition),
            descriptors,
        });
        reporter.report(Progress::StructureDone);
    }
    reporter.report(Progress::RowsFinish);
    reporter.report(Progress::StageFinish {
        stage: Stage::EvaluatingRules,
    });

    if stats.resolver_failures > 0 {
        warn!(
            failures = stats.resolver_failures,
            "Some compound names could not be resolved; structure strings were used instead."
        );
    }

    finish(ResultsTable::new(config.rule, records), stats, config.chunk_size)
}

/// Re-evaluates an existing outcome under another rule without parsing any structure
/// again. Descriptor vectors, names and row order are carried over unchanged.
#[instrument(skip_all, name = "reevaluate_workflow", fields(rule = %rule))]
pub fn reevaluate(
    outcome: &ScreeningOutcome,
    rule: RuleId,
    chunk_size: usize,
) -> Result<ScreeningOutcome, EngineError> {
    validate_chunk_size(chunk_size)?;
    let table = outcome.table.reevaluate(rule);
    finish(table, outcome.stats, chunk_size)
}

fn validate_chunk_size(chunk_size: usize) -> Result<(), ConfigError> {
    if chunk_size == 0 {
        return Err(ConfigError::InvalidParameter {
            parameter: "chunk_size",
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(())
}

fn finish(
    table: ResultsTable,
    mut stats: ScreeningStats,
    chunk_size: usize,
) -> Result<ScreeningOutcome, EngineError> {
    if table.is_empty() {
        return Err(EngineError::EmptyResult { rule: table.rule() });
    }
    stats.accepted = table.accepted_count();
    stats.rejected = table.rejected_count();
    info!(
        screened = table.len(),
        accepted = stats.accepted,
        rejected = stats.rejected,
        skipped = stats.skipped_rows,
        "Screening complete."
    );
    Ok(ScreeningOutcome {
        table,
        stats,
        chunk_size,
    })
}

/// First occurrence of every key, in input order.
fn deduplicate(rows: &[InputRow]) -> Vec<&InputRow> {
    let mut seen = HashSet::with_capacity(rows.len());
    rows.iter()
        .filter(|row| seen.insert(row.key.as_str()))
        .collect()
}

type Computed<'r> = Vec<(&'r InputRow, Result<DescriptorVector, DescriptorError>)>;

fn compute_all<'r>(
    unique: &[&'r InputRow],
    reporter: &ProgressReporter,
    cancel: &CancellationToken,
) -> Result<Computed<'r>, EngineError> {
    reporter.report(Progress::StageStart {
        stage: Stage::ComputingDescriptors,
    });
    reporter.report(Progress::RowsStart {
        total: unique.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = unique.iter();

    #[cfg(feature = "parallel")]
    let iterator = unique.par_iter();

    // Results are collected by input index, so completion order never leaks into the table.
    let results: Vec<Option<Result<DescriptorVector, DescriptorError>>> = iterator
        .map(|row| {
            if cancel.is_cancelled() {
                return None;
            }
            let result = compute_descriptors(&row.structure);
            reporter.report(Progress::StructureDone);
            Some(result)
        })
        .collect();

    reporter.report(Progress::RowsFinish);
    reporter.report(Progress::StageFinish {
        stage: Stage::ComputingDescriptors,
    });

    if cancel.is_cancelled() {
        return Err(cancelled());
    }
    unique
        .iter()
        .zip(results)
        .map(|(row, result)| {
            result
                .map(|r| (*row, r))
                .ok_or_else(|| EngineError::Internal("descriptor result missing".to_string()))
        })
        .collect()
}

fn cancelled() -> EngineError {
    info!("Screening cancelled; discarding partial results.");
    EngineError::Cancelled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::ScreeningConfigBuilder;
    use crate::engine::resolver::ResolverError;
    use std::cell::Cell;

    fn config(rule: RuleId) -> ScreeningConfig {
        ScreeningConfigBuilder::new().rule(rule).build().unwrap()
    }

    fn rows(structures: &[&str]) -> Vec<InputRow> {
        structures.iter().map(|s| InputRow::from_structure(*s)).collect()
    }

    #[test]
    fn duplicates_keep_the_first_occurrence() {
        let input = vec![
            InputRow::new("a", "CCO"),
            InputRow::new("b", "CCN"),
            InputRow::new("a", "CCC"),
        ];
        let outcome = run(&input, &config(RuleId::Veber), None, &ProgressReporter::new()).unwrap();

        assert_eq!(outcome.stats.duplicates_removed, 1);
        assert_eq!(outcome.stats.unique_rows, 2);
        let structures: Vec<_> = outcome.table.iter().map(|r| r.structure.as_str()).collect();
        assert_eq!(structures, ["CCO", "CCN"]);
    }

    #[test]
    fn unparseable_rows_are_skipped_and_counted() {
        let input = rows(&["CCO", "C1CC(", "", "c1ccccc1"]);
        let outcome = run(&input, &config(RuleId::Lipinski), None, &ProgressReporter::new()).unwrap();

        assert_eq!(outcome.table.len(), 2);
        assert_eq!(outcome.stats.skipped_rows, 2);
        assert_eq!(outcome.stats.accepted + outcome.stats.rejected, 2);
    }

    #[test]
    fn nothing_valid_is_an_empty_result() {
        let input = rows(&["C1CC(", "xyz"]);
        let err = run(&input, &config(RuleId::Muegge), None, &ProgressReporter::new()).unwrap_err();
        assert!(matches!(err, EngineError::EmptyResult { rule: RuleId::Muegge }));
        assert_eq!(
            err.to_string(),
            "No valid compounds found after screening using Muegge method."
        );
    }

    #[test]
    fn resolver_is_only_used_when_enabled() {
        let calls = Cell::new(0);
        let resolver = |s: &str| -> Result<Option<String>, ResolverError> {
            calls.set(calls.get() + 1);
            Ok(Some(format!("compound {s}")))
        };
        let input = rows(&["CCO"]);

        let plain = run(&input, &config(RuleId::Veber), Some(&resolver), &ProgressReporter::new())
            .unwrap();
        assert_eq!(plain.table.records()[0].name, "CCO");
        assert_eq!(calls.get(), 0);

        let named_config = ScreeningConfigBuilder::new()
            .rule(RuleId::Veber)
            .resolve_names(true)
            .build()
            .unwrap();
        let named = run(&input, &named_config, Some(&resolver), &ProgressReporter::new()).unwrap();
        assert_eq!(named.table.records()[0].name, "compound CCO");
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn resolver_failures_fall_back_to_structures() {
        let resolver = |_: &str| -> Result<Option<String>, ResolverError> {
            Err(ResolverError::Request("offline".to_string()))
        };
        let named_config = ScreeningConfigBuilder::new()
            .rule(RuleId::Lipinski)
            .resolve_names(true)
            .build()
            .unwrap();
        let outcome = run(
            &rows(&["CCO", "CCN"]),
            &named_config,
            Some(&resolver),
            &ProgressReporter::new(),
        )
        .unwrap();

        assert_eq!(outcome.stats.resolver_failures, 2);
        assert_eq!(outcome.table.records()[1].name, "CCN");
    }

    #[test]
    fn cancelled_runs_expose_no_table() {
        let token = CancellationToken::new();
        token.cancel();
        let err = run_with_cancellation(
            &rows(&["CCO", "CCN"]),
            &config(RuleId::Lipinski),
            None,
            &ProgressReporter::new(),
            &token,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::Cancelled));
    }

    #[test]
    fn reevaluation_switches_columns_only() {
        let input = rows(&["CCO", "CC(=O)Oc1ccccc1C(=O)O"]);
        let first = run(&input, &config(RuleId::Lipinski), None, &ProgressReporter::new()).unwrap();
        let second = reevaluate(&first, RuleId::Muegge, 30).unwrap();

        assert_eq!(second.rule(), RuleId::Muegge);
        assert_eq!(second.projection().labels.len(), 9);
        for (a, b) in first.table.iter().zip(&second.table) {
            assert_eq!(a.descriptors, b.descriptors);
        }
        assert!(reevaluate(&first, RuleId::Veber, 0).is_err());
    }
}
