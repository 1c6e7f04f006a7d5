//! Compliance-only views of a [`ResultsTable`] for paginated display.

use super::results::ResultsTable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionRow<'a> {
    pub name: &'a str,
    /// One 0/1 cell per criterion, in rule order.
    pub cells: Vec<u8>,
    pub accepted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplianceProjection<'a> {
    pub labels: Vec<&'static str>,
    pub rows: Vec<ProjectionRow<'a>>,
}

/// A contiguous page of a [`ComplianceProjection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// Zero-based page index.
    pub index: usize,
    pub total: usize,
    pub labels: &'a [&'static str],
    pub rows: &'a [ProjectionRow<'a>],
}

impl<'a> Chunk<'a> {
    /// Accept/reject flag of each row, used to style row labels.
    pub fn accepted_flags(&self) -> Vec<bool> {
        self.rows.iter().map(|row| row.accepted).collect()
    }

    /// One-based page number.
    pub fn number(&self) -> usize {
        self.index + 1
    }
}

/// Maps every compliance cell of `table` to 0 or 1, keeping row and column order.
pub fn compliance_projection(table: &ResultsTable) -> ComplianceProjection<'_> {
    ComplianceProjection {
        labels: table.labels(),
        rows: table
            .iter()
            .map(|record| ProjectionRow {
                name: &record.name,
                cells: record.compliance().values().map(u8::from).collect(),
                accepted: record.accepted(),
            })
            .collect(),
    }
}

impl<'a> ComplianceProjection<'a> {
    /// Splits the projection into pages of `size` rows; the last page may be shorter.
    /// A zero `size` yields no pages.
    pub fn chunks(&self, size: usize) -> Vec<Chunk<'_>> {
        if size == 0 {
            return Vec::new();
        }
        let total = self.rows.len().div_ceil(size);
        self.rows
            .chunks(size)
            .enumerate()
            .map(|(index, rows)| Chunk {
                index,
                total,
                labels: &self.labels,
                rows,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
