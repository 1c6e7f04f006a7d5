//! CSV writers for accepted candidates and compliance pages.

use super::projection::Chunk;
use super::results::ResultsTable;
use crate::core::descriptors::{Descriptor, DescriptorVector};
use crate::core::rules::RuleId;
use std::io::Write;
use thiserror::Error;

pub const INDEX_COLUMN: &str = "Compound_Name";
pub const STRUCTURE_COLUMN: &str = "SMILES";
pub const DECISION_COLUMN: &str = "IsAccepted";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn python_bool(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

fn format_descriptor(descriptors: &DescriptorVector, descriptor: Descriptor) -> String {
    let value = descriptors.get(descriptor);
    match descriptor {
        Descriptor::MolecularWeight => format!("{value:.3}"),
        Descriptor::LogP => format!("{value:.4}"),
        Descriptor::PolarSurfaceArea => format!("{value:.2}"),
        _ => format!("{value}"),
    }
}

/// Writes every record of `table` with its descriptors, compliance flags and decision.
///
/// Pass [`ResultsTable::accepted_subset`] to export accepted candidates only.
pub fn write_accepted<W: Write>(writer: W, table: &ResultsTable) -> Result<(), ExportError> {
    let mut csv = csv::Writer::from_writer(writer);
    let labels = table.labels();

    let header = [INDEX_COLUMN, STRUCTURE_COLUMN]
        .into_iter()
        .chain(Descriptor::ALL.iter().map(|d| d.column()))
        .chain(labels.iter().copied())
        .chain([DECISION_COLUMN]);
    csv.write_record(header)?;

    for record in table {
        let mut row = vec![record.name.clone(), record.structure.clone()];
        row.extend(
            Descriptor::ALL
                .iter()
                .map(|&d| format_descriptor(&record.descriptors, d)),
        );
        row.extend(record.compliance().values().map(|v| python_bool(v).to_string()));
        row.push(python_bool(record.accepted()).to_string());
        csv.write_record(&row)?;
    }
    csv.flush()?;
    Ok(())
}

/// Writes one compliance page as a 0/1 matrix.
pub fn write_chunk<W: Write>(writer: W, chunk: &Chunk<'_>) -> Result<(), ExportError> {
    let mut csv = csv::Writer::from_writer(writer);
    let header = [INDEX_COLUMN]
        .into_iter()
        .chain(chunk.labels.iter().copied())
        .chain([DECISION_COLUMN]);
    csv.write_record(header)?;

    for row in chunk.rows {
        let mut fields = Vec::with_capacity(row.cells.len() + 2);
        fields.push(row.name.to_string());
        fields.extend(row.cells.iter().map(u8::to_string));
        fields.push(u8::from(row.accepted).to_string());
        csv.write_record(&fields)?;
    }
    csv.flush()?;
    Ok(())
}

/// `<Rule_Name>_accepted_candidates.csv`
pub fn accepted_file_name(rule: RuleId) -> String {
    format!("{}_accepted_candidates.csv", rule.file_stem())
}

/// `<Rule_Name>_heatmap_page_<i>_of_<n>.csv`, with a one-based page number.
pub fn page_file_name(rule: RuleId, chunk: &Chunk<'_>) -> String {
    format!(
        "{}_heatmap_page_{}_of_{}.csv",
        rule.file_stem(),
        chunk.number(),
        chunk.total
    )
}
