use druglikenz::core::rules::RuleDefinition;
use druglikenz::engine::projection::Chunk;
use druglikenz::engine::results::ScreeningOutcome;
use std::fmt::Write;

const NAME_HEADER: &str = "Compound";
const MAX_NAME_WIDTH: usize = 40;
const PASS: &str = "✓";
const FAIL: &str = "✗";

fn mark(passed: bool) -> &'static str {
    if passed { PASS } else { FAIL }
}

fn truncate(name: &str, width: usize) -> String {
    if name.chars().count() <= width {
        name.to_string()
    } else {
        let mut short: String = name.chars().take(width.saturating_sub(1)).collect();
        short.push('…');
        short
    }
}

/// Renders one compliance page as a fixed-width text grid.
///
/// Each row starts with an accepted/rejected marker, followed by one pass/fail cell per
/// criterion and the overall decision.
pub fn render_page(rule: &RuleDefinition, chunk: &Chunk<'_>) -> String {
    let name_width = chunk
        .rows
        .iter()
        .map(|row| row.name.chars().count())
        .chain(std::iter::once(NAME_HEADER.len()))
        .max()
        .unwrap_or(NAME_HEADER.len())
        .min(MAX_NAME_WIDTH);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} - compliance page {} of {}",
        rule.name,
        chunk.number(),
        chunk.total
    );

    let _ = write!(out, "  {:<name_width$}", NAME_HEADER);
    for label in chunk.labels {
        let _ = write!(out, "  {label}");
    }
    let _ = writeln!(out, "  Decision");

    for row in chunk.rows {
        let _ = write!(
            out,
            "{} {:<name_width$}",
            mark(row.accepted),
            truncate(row.name, name_width)
        );
        for (label, cell) in chunk.labels.iter().zip(&row.cells) {
            let width = label.chars().count();
            let _ = write!(out, "  {:^width$}", mark(*cell == 1));
        }
        let decision = if row.accepted { "Accepted" } else { "Rejected" };
        let _ = writeln!(out, "  {decision}");
    }
    out
}

/// Renders the counts of a finished run.
pub fn render_summary(outcome: &ScreeningOutcome) -> String {
    let rule = outcome.rule().definition();
    let stats = &outcome.stats;
    let mut out = String::new();
    let _ = writeln!(out, "Rule set: {} ({})", rule.name, rule.aggregation);
    let _ = writeln!(
        out,
        "Input rows: {} | Duplicates removed: {} | Unparseable: {}",
        stats.input_rows, stats.duplicates_removed, stats.skipped_rows
    );
    if stats.resolver_failures > 0 {
        let _ = writeln!(
            out,
            "Name lookups failed: {} (structure strings used instead)",
            stats.resolver_failures
        );
    }
    let _ = writeln!(
        out,
        "Accepted: {} | Rejected: {} | Pages: {}",
        stats.accepted,
        stats.rejected,
        outcome.page_count()
    );
    out
}
