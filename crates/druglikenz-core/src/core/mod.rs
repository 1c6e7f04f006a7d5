//! # Core Module
//!
//! Stateless building blocks for drug-likeness screening.
//!
//! - **Molecular Representation** ([`models`]) - Elements, atoms, bonds and the molecular graph
//! - **Structure Perception** ([`topology`]) - Hydrogen folding, rings, Kekulé assignment,
//!   implicit hydrogens and aromaticity
//! - **Descriptors** ([`descriptors`]) - The nine physicochemical descriptors used by the rules
//! - **Rule Sets** ([`rules`]) - Declarative rule definitions and the evaluator
//! - **File I/O** ([`io`]) - SMILES parsing and delimited table reading

pub mod descriptors;
pub mod io;
pub mod models;
pub mod rules;
pub mod topology;
