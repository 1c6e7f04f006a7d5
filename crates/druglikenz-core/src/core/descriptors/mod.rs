//! # Descriptor Calculator
//!
//! Derives the fixed nine-field [`DescriptorVector`] from a structure string. Every
//! calculator is a pure function of the sanitized [`Molecule`], so repeated calls on the
//! same input produce bit-identical vectors.
//!
//! - [`weight`] - Average molecular weight
//! - [`lipinski`] - Hydrogen-bond acceptor/donor counts and rotatable bonds
//! - [`crippen`] - Wildman–Crippen LogP
//! - [`tpsa`] - Ertl topological polar surface area

pub mod crippen;
pub mod lipinski;
pub mod tpsa;
pub mod weight;

use crate::core::io::smiles::{self, SmilesError};
use crate::core::models::molecule::Molecule;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("Failed to parse structure '{structure}': {source}")]
    Parse {
        structure: String,
        #[source]
        source: SmilesError,
    },
}

/// The physicochemical descriptors that drive every rule set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DescriptorVector {
    /// Average molecular weight in g/mol, including implicit hydrogens.
    pub molecular_weight: f64,
    pub h_bond_acceptors: u32,
    pub h_bond_donors: u32,
    /// Estimated octanol/water partition coefficient. The only field that may be negative.
    pub logp: f64,
    pub rotatable_bonds: u32,
    /// Topological polar surface area in Å².
    pub polar_surface_area: f64,
    /// Size of the smallest set of smallest rings, i.e. the cyclomatic number.
    /// Cage compounds count one ring per independent cycle (cubane: 5).
    pub ring_count: u32,
    pub carbon_count: u32,
    /// Heavy atoms that are neither carbon nor hydrogen.
    pub heteroatom_count: u32,
}

/// Names a single field of a [`DescriptorVector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Descriptor {
    MolecularWeight,
    HBondAcceptors,
    HBondDonors,
    LogP,
    RotatableBonds,
    PolarSurfaceArea,
    RingCount,
    CarbonCount,
    HeteroatomCount,
}

impl Descriptor {
    /// All descriptors in export column order.
    pub const ALL: [Descriptor; 9] = [
        Self::MolecularWeight,
        Self::HBondAcceptors,
        Self::HBondDonors,
        Self::LogP,
        Self::RotatableBonds,
        Self::PolarSurfaceArea,
        Self::RingCount,
        Self::CarbonCount,
        Self::HeteroatomCount,
    ];

    /// Column header used in exported tables.
    pub fn column(self) -> &'static str {
        match self {
            Self::MolecularWeight => "MW",
            Self::HBondAcceptors => "HBA",
            Self::HBondDonors => "HBD",
            Self::LogP => "LogP",
            Self::RotatableBonds => "ROTB",
            Self::PolarSurfaceArea => "PSA",
            Self::RingCount => "NumRings",
            Self::CarbonCount => "NumCarbons",
            Self::HeteroatomCount => "NumHeteroatoms",
        }
    }

    /// Whether the descriptor is an integer count rather than a real-valued property.
    pub fn is_count(self) -> bool {
        !matches!(
            self,
            Self::MolecularWeight | Self::LogP | Self::PolarSurfaceArea
        )
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl DescriptorVector {
    pub fn get(&self, descriptor: Descriptor) -> f64 {
        match descriptor {
            Descriptor::MolecularWeight => self.molecular_weight,
            Descriptor::HBondAcceptors => f64::from(self.h_bond_acceptors),
            Descriptor::HBondDonors => f64::from(self.h_bond_donors),
            Descriptor::LogP => self.logp,
            Descriptor::RotatableBonds => f64::from(self.rotatable_bonds),
            Descriptor::PolarSurfaceArea => self.polar_surface_area,
            Descriptor::RingCount => f64::from(self.ring_count),
            Descriptor::CarbonCount => f64::from(self.carbon_count),
            Descriptor::HeteroatomCount => f64::from(self.heteroatom_count),
        }
    }
}

/// Parses `structure` and computes its descriptor vector.
///
/// A structure that cannot be parsed or sanitized yields [`DescriptorError::Parse`];
/// no partially filled vector is ever returned.
pub fn compute_descriptors(structure: &str) -> Result<DescriptorVector, DescriptorError> {
    let molecule = smiles::parse_smiles(structure).map_err(|source| DescriptorError::Parse {
        structure: structure.to_string(),
        source,
    })?;
    Ok(describe(&molecule))
}

/// Computes the descriptor vector of an already sanitized molecule.
pub fn describe(molecule: &Molecule) -> DescriptorVector {
    let count = |predicate: fn(u8) -> bool| {
        molecule
            .atoms_iter()
            .filter(|(_, atom)| predicate(atom.atomic_number()))
            .count() as u32
    };

    DescriptorVector {
        molecular_weight: weight::molecular_weight(molecule),
        h_bond_acceptors: lipinski::h_bond_acceptors(molecule),
        h_bond_donors: lipinski::h_bond_donors(molecule),
        logp: crippen::logp(molecule),
        rotatable_bonds: lipinski::rotatable_bonds(molecule),
        polar_surface_area: tpsa::tpsa(molecule),
        ring_count: molecule.rings().len() as u32,
        carbon_count: count(|z| z == 6),
        heteroatom_count: count(|z| z != 1 && z != 6),
    }
}
