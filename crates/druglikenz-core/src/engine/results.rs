use super::projection::{ComplianceProjection, compliance_projection};
use crate::core::descriptors::DescriptorVector;
use crate::core::rules::{ComplianceMap, Evaluation, RuleId, evaluate};
use serde::Serialize;

/// One successfully screened input row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructureRecord {
    /// Display name: the resolved compound name, or the structure string.
    pub name: String,
    /// Value of the deduplication key column.
    pub key: String,
    pub structure: String,
    pub descriptors: DescriptorVector,
    pub evaluation: Evaluation,
}

impl StructureRecord {
    pub fn accepted(&self) -> bool {
        self.evaluation.accepted
    }

    pub fn compliance(&self) -> &ComplianceMap {
        &self.evaluation.compliance
    }
}

/// Screened records in first-seen input order, all evaluated against one rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsTable {
    rule: RuleId,
    records: Vec<StructureRecord>,
}

impl ResultsTable {
    pub(crate) fn new(rule: RuleId, records: Vec<StructureRecord>) -> Self {
        Self { rule, records }
    }

    pub fn rule(&self) -> RuleId {
        self.rule
    }

    /// Compliance column labels shared by every record of this table.
    pub fn labels(&self) -> Vec<&'static str> {
        self.rule.definition().labels().collect()
    }

    pub fn records(&self) -> &[StructureRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StructureRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn accepted_count(&self) -> usize {
        self.records.iter().filter(|r| r.accepted()).count()
    }

    pub fn rejected_count(&self) -> usize {
        self.len() - self.accepted_count()
    }

    /// Evaluates the stored descriptor vectors against another rule. Structures are
    /// not parsed again and row order is unchanged.
    pub fn reevaluate(&self, rule: RuleId) -> ResultsTable {
        let definition = rule.definition();
        let records = self
            .records
            .iter()
            .map(|record| StructureRecord {
                evaluation: evaluate(&record.descriptors, definition),
                ..record.clone()
            })
            .collect();
        ResultsTable::new(rule, records)
    }

    /// Records with `accepted == true`, in table order.
    pub fn accepted_subset(&self) -> ResultsTable {
        ResultsTable::new(
            self.rule,
            self.records.iter().filter(|r| r.accepted()).cloned().collect(),
        )
    }
}

impl<'a> IntoIterator for &'a ResultsTable {
    type Item = &'a StructureRecord;
    type IntoIter = std::slice::Iter<'a, StructureRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Row accounting for one screening run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScreeningStats {
    pub input_rows: usize,
    pub duplicates_removed: usize,
    pub unique_rows: usize,
    /// Unique rows whose structure could not be parsed.
    pub skipped_rows: usize,
    pub resolver_failures: usize,
    pub accepted: usize,
    pub rejected: usize,
}

/// The immutable result of a complete screening run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreeningOutcome {
    pub table: ResultsTable,
    pub stats: ScreeningStats,
    pub chunk_size: usize,
}

impl ScreeningOutcome {
    pub fn rule(&self) -> RuleId {
        self.table.rule()
    }

    pub fn projection(&self) -> ComplianceProjection<'_> {
        compliance_projection(&self.table)
    }

    pub fn page_count(&self) -> usize {
        self.table.len().div_ceil(self.chunk_size)
    }

    pub fn accepted_subset(&self) -> ResultsTable {
        self.table.accepted_subset()
    }
}
