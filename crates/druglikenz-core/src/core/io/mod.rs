//! Reading structures into the screening pipeline.
//!
//! - [`smiles`] turns a single SMILES string into a sanitized [`Molecule`](crate::core::models::molecule::Molecule).
//! - [`table`] reads the delimited input file that lists the structures of a batch.

pub mod smiles;
pub mod table;
