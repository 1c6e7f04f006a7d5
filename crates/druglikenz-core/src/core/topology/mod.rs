//! # Structure Perception
//!
//! Turns the raw graph produced by the SMILES reader into a chemically consistent
//! molecule. [`sanitize`] runs the passes in a fixed order:
//!
//! 1. [`hydrogens`] folds explicit `[H]` atoms into their heavy neighbour.
//! 2. [`rings`] marks ring bonds and computes the smallest set of smallest rings.
//! 3. [`kekulize`] assigns alternating single/double bonds to aromatic systems.
//! 4. [`valence`] derives implicit hydrogens and rejects impossible valences.
//! 5. [`aromaticity`] re-perceives aromatic rings with the Hückel 4n+2 rule.

pub mod aromaticity;
pub mod hydrogens;
pub mod kekulize;
pub mod rings;
pub mod valence;

use crate::core::models::molecule::Molecule;
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SanitizeError {
    #[error("Explicit valence {valence} is not allowed for {symbol}")]
    InvalidValence { symbol: &'static str, valence: u8 },

    #[error("Aromatic system cannot be kekulized ({unmatched} atom(s) left without a double bond)")]
    Kekulization { unmatched: usize },
}

pub fn sanitize(molecule: &mut Molecule) -> Result<(), SanitizeError> {
    let folded = hydrogens::fold_explicit_hydrogens(molecule);
    rings::perceive(molecule);
    kekulize::kekulize(molecule)?;
    valence::assign_implicit_hydrogens(molecule)?;
    aromaticity::perceive(molecule);
    trace!(
        atoms = molecule.atom_count(),
        rings = molecule.rings().len(),
        folded_hydrogens = folded,
        "Molecule sanitized."
    );
    Ok(())
}
