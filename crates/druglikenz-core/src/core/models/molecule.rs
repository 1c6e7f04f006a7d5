use super::atom::Atom;
use super::ids::{AtomId, BondId};
use super::topology::{Bond, BondOrder};
use slotmap::{SecondaryMap, SlotMap};
use std::collections::VecDeque;
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MoleculeError {
    #[error("Atom does not exist in this molecule")]
    AtomNotFound,
    #[error("An atom cannot be bonded to itself")]
    SelfBond,
    #[error("The two atoms are already bonded")]
    DuplicateBond,
}

/// A ring of the smallest set of smallest rings, with its atoms in cyclic order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ring {
    pub atoms: Vec<AtomId>,
    pub bonds: Vec<BondId>,
}

impl Ring {
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn contains_atom(&self, atom_id: AtomId) -> bool {
        self.atoms.contains(&atom_id)
    }

    pub fn contains_bond(&self, bond_id: BondId) -> bool {
        self.bonds.contains(&bond_id)
    }
}

/// A molecular graph: atoms, bonds and the perceived ring set.
///
/// Atoms and bonds live in slot maps so that explicit hydrogens can be removed during
/// sanitization without invalidating the identifiers of the remaining atoms.
#[derive(Debug, Clone, Default)]
pub struct Molecule {
    /// Primary storage for atoms.
    atoms: SlotMap<AtomId, Atom>,
    /// Primary storage for bonds.
    bonds: SlotMap<BondId, Bond>,
    /// Cached adjacency list of `(neighbor, bond)` pairs, indexed by atom ID.
    adjacency: SecondaryMap<AtomId, Vec<(AtomId, BondId)>>,
    /// Smallest set of smallest rings, populated by ring perception.
    rings: Vec<Ring>,
}

impl Molecule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_atom(&mut self, atom: Atom) -> AtomId {
        let id = self.atoms.insert(atom);
        self.adjacency.insert(id, Vec::new());
        id
    }

    /// Adds a bond between two existing, distinct, not-yet-bonded atoms.
    pub fn add_bond(
        &mut self,
        atom1_id: AtomId,
        atom2_id: AtomId,
        order: BondOrder,
    ) -> Result<BondId, MoleculeError> {
        if !self.atoms.contains_key(atom1_id) || !self.atoms.contains_key(atom2_id) {
            return Err(MoleculeError::AtomNotFound);
        }
        if atom1_id == atom2_id {
            return Err(MoleculeError::SelfBond);
        }
        if self.bond_between(atom1_id, atom2_id).is_some() {
            return Err(MoleculeError::DuplicateBond);
        }

        let bond_id = self.bonds.insert(Bond::new(atom1_id, atom2_id, order));
        if let Some(list) = self.adjacency.get_mut(atom1_id) {
            list.push((atom2_id, bond_id));
        }
        if let Some(list) = self.adjacency.get_mut(atom2_id) {
            list.push((atom1_id, bond_id));
        }
        Ok(bond_id)
    }

    /// Removes an atom together with every bond that touches it.
    pub fn remove_atom(&mut self, atom_id: AtomId) -> Option<Atom> {
        let atom = self.atoms.remove(atom_id)?;
        let incident = self.adjacency.remove(atom_id).unwrap_or_default();
        for (neighbor_id, bond_id) in incident {
            self.bonds.remove(bond_id);
            if let Some(list) = self.adjacency.get_mut(neighbor_id) {
                list.retain(|&(_, b)| b != bond_id);
            }
        }
        self.rings.clear();
        Some(atom)
    }

    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    pub fn atom_mut(&mut self, id: AtomId) -> Option<&mut Atom> {
        self.atoms.get_mut(id)
    }

    pub fn atoms_iter(&self) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.atoms.iter()
    }

    pub fn atoms_iter_mut(&mut self) -> impl Iterator<Item = (AtomId, &mut Atom)> {
        self.atoms.iter_mut()
    }

    pub fn atom_ids(&self) -> Vec<AtomId> {
        self.atoms.keys().collect()
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn bond(&self, id: BondId) -> Option<&Bond> {
        self.bonds.get(id)
    }

    pub fn bond_mut(&mut self, id: BondId) -> Option<&mut Bond> {
        self.bonds.get_mut(id)
    }

    pub fn bonds_iter(&self) -> impl Iterator<Item = (BondId, &Bond)> {
        self.bonds.iter()
    }

    pub fn bonds_iter_mut(&mut self) -> impl Iterator<Item = (BondId, &mut Bond)> {
        self.bonds.iter_mut()
    }

    pub fn bond_ids(&self) -> Vec<BondId> {
        self.bonds.keys().collect()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    /// Iterates over `(neighbor, bond)` pairs of an atom. Unknown atoms have no neighbors.
    pub fn neighbors(&self, atom_id: AtomId) -> impl Iterator<Item = (AtomId, BondId)> + '_ {
        self.adjacency
            .get(atom_id)
            .into_iter()
            .flat_map(|list| list.iter().copied())
    }

    /// Iterates over `(neighbor atom, bond)` references of an atom.
    pub fn neighbor_bonds(&self, atom_id: AtomId) -> impl Iterator<Item = (&Atom, &Bond)> + '_ {
        self.neighbors(atom_id)
            .filter_map(|(n, b)| Some((self.atoms.get(n)?, self.bonds.get(b)?)))
    }

    /// Number of explicit graph neighbors.
    pub fn degree(&self, atom_id: AtomId) -> usize {
        self.adjacency.get(atom_id).map_or(0, Vec::len)
    }

    pub fn bond_between(&self, atom1_id: AtomId, atom2_id: AtomId) -> Option<BondId> {
        self.neighbors(atom1_id)
            .find(|&(n, _)| n == atom2_id)
            .map(|(_, b)| b)
    }

    /// Sum of Kekulé bond orders around an atom, saturating at `u8::MAX`.
    pub fn bond_valence_sum(&self, atom_id: AtomId) -> u8 {
        self.neighbors(atom_id)
            .filter_map(|(_, b)| self.bonds.get(b))
            .map(|bond| bond.kekule_order.valence())
            .fold(0, u8::saturating_add)
    }

    /// Total valence: Kekulé bond orders plus every attached hydrogen.
    pub fn total_valence(&self, atom_id: AtomId) -> u8 {
        let hydrogens = self.atom(atom_id).map_or(0, Atom::total_hydrogens);
        self.bond_valence_sum(atom_id).saturating_add(hydrogens)
    }

    pub fn is_atom_in_ring(&self, atom_id: AtomId) -> bool {
        self.neighbors(atom_id)
            .filter_map(|(_, b)| self.bonds.get(b))
            .any(|bond| bond.is_in_ring)
    }

    pub fn is_atom_in_ring_of_size(&self, atom_id: AtomId, size: usize) -> bool {
        self.rings
            .iter()
            .any(|ring| ring.len() == size && ring.contains_atom(atom_id))
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    pub(crate) fn set_rings(&mut self, rings: Vec<Ring>) {
        self.rings = rings;
    }

    /// Number of connected components.
    pub fn fragment_count(&self) -> usize {
        let mut visited: SecondaryMap<AtomId, ()> = SecondaryMap::new();
        let mut fragments = 0;
        for start in self.atoms.keys() {
            if visited.contains_key(start) {
                continue;
            }
            fragments += 1;
            visited.insert(start, ());
            let mut queue = VecDeque::from([start]);
            while let Some(current) = queue.pop_front() {
                for (neighbor, _) in self.neighbors(current) {
                    if visited.insert(neighbor, ()).is_none() {
                        queue.push_back(neighbor);
                    }
                }
            }
        }
        fragments
    }

    /// Cyclomatic number `bonds - atoms + fragments`, i.e. the size of the ring basis.
    pub fn cyclomatic_number(&self) -> usize {
        (self.bond_count() + self.fragment_count()).saturating_sub(self.atom_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::element;

    fn carbon() -> Atom {
        Atom::new(element::lookup("C").unwrap())
    }

    fn chain(n: usize) -> (Molecule, Vec<AtomId>) {
        let mut molecule = Molecule::new();
        let ids: Vec<_> = (0..n).map(|_| molecule.add_atom(carbon())).collect();
        for pair in ids.windows(2) {
            molecule
                .add_bond(pair[0], pair[1], BondOrder::Single)
                .unwrap();
        }
        (molecule, ids)
    }

    #[test]
    fn add_bond_updates_adjacency_on_both_sides() {
        let (molecule, ids) = chain(3);
        assert_eq!(molecule.degree(ids[0]), 1);
        assert_eq!(molecule.degree(ids[1]), 2);
        assert!(molecule.bond_between(ids[0], ids[1]).is_some());
        assert!(molecule.bond_between(ids[1], ids[0]).is_some());
        assert!(molecule.bond_between(ids[0], ids[2]).is_none());
    }

    #[test]
    fn add_bond_rejects_self_and_duplicate_bonds() {
        let (mut molecule, ids) = chain(2);
        assert_eq!(
            molecule.add_bond(ids[0], ids[0], BondOrder::Single),
            Err(MoleculeError::SelfBond)
        );
        assert_eq!(
            molecule.add_bond(ids[1], ids[0], BondOrder::Double),
            Err(MoleculeError::DuplicateBond)
        );
    }

    #[test]
    fn remove_atom_drops_incident_bonds() {
        let (mut molecule, ids) = chain(3);
        let removed = molecule.remove_atom(ids[1]);
        assert!(removed.is_some());
        assert_eq!(molecule.atom_count(), 2);
        assert_eq!(molecule.bond_count(), 0);
        assert_eq!(molecule.degree(ids[0]), 0);
        assert_eq!(molecule.degree(ids[2]), 0);
        assert!(molecule.remove_atom(ids[1]).is_none());
    }

    #[test]
    fn valence_sums_use_kekule_orders_and_hydrogens() {
        let (mut molecule, ids) = chain(2);
        let bond = molecule.bond_between(ids[0], ids[1]).unwrap();
        molecule.bond_mut(bond).unwrap().kekule_order = BondOrder::Double;
        molecule.atom_mut(ids[0]).unwrap().implicit_hydrogens = 2;
        assert_eq!(molecule.bond_valence_sum(ids[0]), 2);
        assert_eq!(molecule.total_valence(ids[0]), 4);
    }

    #[test]
    fn fragment_and_cyclomatic_counts() {
        let (mut molecule, ids) = chain(6);
        assert_eq!(molecule.fragment_count(), 1);
        assert_eq!(molecule.cyclomatic_number(), 0);

        molecule
            .add_bond(ids[0], ids[5], BondOrder::Single)
            .unwrap();
        assert_eq!(molecule.cyclomatic_number(), 1);

        molecule.add_atom(carbon());
        assert_eq!(molecule.fragment_count(), 2);
        assert_eq!(molecule.cyclomatic_number(), 1);
    }
}
