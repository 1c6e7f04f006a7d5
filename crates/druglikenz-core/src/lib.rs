//! # DrugLikenZ Core Library
//!
//! Batch evaluation of small-molecule drug-likeness against four published rule sets
//! (Lipinski's Rule of Five, the Congreve Rule of Three, the Muegge filter and the
//! Veber rules).
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless molecular graph models, the SMILES reader,
//!   ring/aromaticity/valence perception, descriptor calculators, rule definitions and
//!   the input table reader. Nothing in this layer keeps state between calls.
//!
//! - **[`engine`]: The Screening Support.** Configuration, the error taxonomy, progress
//!   reporting, the optional name-resolver capability, cancellation, the immutable
//!   result tables and projections produced by a screening run, and their CSV export.
//!
//! - **[`workflows`]: The Public API.** Complete screening procedures that tie the other
//!   two layers together, from a list of input rows (or a table on disk) to a
//!   [`engine::results::ScreeningOutcome`].

pub mod core;
pub mod engine;
pub mod workflows;
