//! # Core Models Module
//!
//! Data structures describing a single small molecule as a graph.
//!
//! - [`element`] - Static periodic table data (atomic weights, default valences)
//! - [`atom`] - Atom properties as written in, or perceived from, a structure string
//! - [`topology`] - Bond orders and bonds
//! - [`molecule`] - The molecular graph with adjacency and ring information
//! - [`ids`] - Key types for atoms and bonds
//!
//! ```ignore
//! use druglikenz::core::models::{atom::Atom, element, molecule::Molecule, topology::BondOrder};
//!
//! let mut molecule = Molecule::new();
//! let c = molecule.add_atom(Atom::new(element::lookup("C").unwrap()));
//! let o = molecule.add_atom(Atom::new(element::lookup("O").unwrap()));
//! molecule.add_bond(c, o, BondOrder::Single)?;
//! ```

pub mod atom;
pub mod element;
pub mod ids;
pub mod molecule;
pub mod topology;
