use crate::core::models::ids::{AtomId, BondId};
use crate::core::models::molecule::{Molecule, Ring};
use slotmap::SecondaryMap;
use std::collections::{HashMap, HashSet, VecDeque};

/// Marks ring bonds and stores the smallest set of smallest rings on the molecule.
///
/// The set is a minimum cycle basis, so its size always equals the cyclomatic number
/// `bonds - atoms + fragments`. Highly symmetric cages therefore report fewer rings than
/// a symmetrized ring set would: cubane has five rings here, not six.
pub fn perceive(molecule: &mut Molecule) {
    let ring_bonds = find_ring_bonds(molecule);
    for (bond_id, bond) in molecule.bonds_iter_mut() {
        bond.is_in_ring = ring_bonds.contains(&bond_id);
    }
    let rings = smallest_set_of_smallest_rings(molecule, &ring_bonds);
    molecule.set_rings(rings);
}

/// A bond lies on a ring exactly when its endpoints stay connected without it.
fn find_ring_bonds(molecule: &Molecule) -> HashSet<BondId> {
    molecule
        .bonds_iter()
        .filter(|(bond_id, bond)| connected_without(molecule, bond.atom1_id, bond.atom2_id, *bond_id))
        .map(|(bond_id, _)| bond_id)
        .collect()
}

fn connected_without(molecule: &Molecule, from: AtomId, to: AtomId, excluded: BondId) -> bool {
    let mut visited: SecondaryMap<AtomId, ()> = SecondaryMap::new();
    visited.insert(from, ());
    let mut queue = VecDeque::from([from]);
    while let Some(current) = queue.pop_front() {
        for (neighbor, bond) in molecule.neighbors(current) {
            if bond == excluded {
                continue;
            }
            if neighbor == to {
                return true;
            }
            if visited.insert(neighbor, ()).is_none() {
                queue.push_back(neighbor);
            }
        }
    }
    false
}

struct Candidate {
    atoms: Vec<AtomId>,
    bonds: Vec<BondId>,
    edges: BitSet,
}

/// Horton candidate cycles reduced to a minimum cycle basis by Gaussian elimination over GF(2).
fn smallest_set_of_smallest_rings(molecule: &Molecule, ring_bonds: &HashSet<BondId>) -> Vec<Ring> {
    let target = molecule.cyclomatic_number();
    if target == 0 || ring_bonds.is_empty() {
        return Vec::new();
    }

    let indexed_bonds: Vec<BondId> = molecule
        .bond_ids()
        .into_iter()
        .filter(|b| ring_bonds.contains(b))
        .collect();
    let bond_index: HashMap<BondId, usize> = indexed_bonds
        .iter()
        .enumerate()
        .map(|(i, &b)| (b, i))
        .collect();

    let ring_atoms: Vec<AtomId> = molecule
        .atom_ids()
        .into_iter()
        .filter(|&a| molecule.neighbors(a).any(|(_, b)| ring_bonds.contains(&b)))
        .collect();

    let mut candidates: Vec<Candidate> = Vec::new();
    let mut seen: HashSet<BitSet> = HashSet::new();
    for &root in &ring_atoms {
        for candidate in cycles_through_root(molecule, root, &indexed_bonds, &bond_index) {
            if seen.insert(candidate.edges.clone()) {
                candidates.push(candidate);
            }
        }
    }
    candidates.sort_by_key(|c| c.bonds.len());

    let mut basis: Vec<(usize, BitSet)> = Vec::new();
    let mut rings = Vec::with_capacity(target);
    for candidate in candidates {
        let mut reduced = candidate.edges.clone();
        for (pivot, row) in &basis {
            if reduced.contains(*pivot) {
                reduced.xor_with(row);
            }
        }
        if let Some(pivot) = reduced.first_set() {
            basis.push((pivot, reduced));
            rings.push(Ring {
                atoms: candidate.atoms,
                bonds: candidate.bonds,
            });
            if rings.len() == target {
                break;
            }
        }
    }
    rings
}

fn cycles_through_root(
    molecule: &Molecule,
    root: AtomId,
    indexed_bonds: &[BondId],
    bond_index: &HashMap<BondId, usize>,
) -> Vec<Candidate> {
    let mut parent: SecondaryMap<AtomId, (AtomId, BondId)> = SecondaryMap::new();
    let mut reached: SecondaryMap<AtomId, ()> = SecondaryMap::new();
    reached.insert(root, ());
    let mut queue = VecDeque::from([root]);
    while let Some(current) = queue.pop_front() {
        for (neighbor, bond) in molecule.neighbors(current) {
            if !bond_index.contains_key(&bond) {
                continue;
            }
            if reached.insert(neighbor, ()).is_none() {
                parent.insert(neighbor, (current, bond));
                queue.push_back(neighbor);
            }
        }
    }

    let path_to_root = |mut atom: AtomId| -> (Vec<AtomId>, Vec<BondId>) {
        let mut atoms = vec![atom];
        let mut bonds = Vec::new();
        while let Some(&(up, bond)) = parent.get(atom) {
            bonds.push(bond);
            atoms.push(up);
            atom = up;
        }
        (atoms, bonds)
    };

    let mut cycles = Vec::new();
    for (index, &bond_id) in indexed_bonds.iter().enumerate() {
        let Some(bond) = molecule.bond(bond_id) else {
            continue;
        };
        let (x, y) = (bond.atom1_id, bond.atom2_id);
        if !reached.contains_key(x) || !reached.contains_key(y) {
            continue;
        }
        let is_tree_edge = parent.get(x).is_some_and(|&(_, b)| b == bond_id)
            || parent.get(y).is_some_and(|&(_, b)| b == bond_id);
        if is_tree_edge {
            continue;
        }

        let (x_atoms, x_bonds) = path_to_root(x);
        let (y_atoms, y_bonds) = path_to_root(y);
        let x_set: HashSet<AtomId> = x_atoms.iter().copied().collect();
        let disjoint = y_atoms
            .iter()
            .filter(|&&a| a != root)
            .all(|a| !x_set.contains(a));
        if !disjoint {
            continue;
        }

        let mut atoms: Vec<AtomId> = x_atoms.iter().rev().copied().collect();
        atoms.extend(y_atoms.iter().copied().filter(|&a| a != root));
        let mut bonds: Vec<BondId> = x_bonds.iter().rev().copied().collect();
        bonds.push(bond_id);
        bonds.extend(y_bonds.iter().copied());

        let mut edges = BitSet::with_capacity(indexed_bonds.len());
        edges.insert(index);
        for b in x_bonds.iter().chain(y_bonds.iter()) {
            if let Some(&i) = bond_index.get(b) {
                edges.insert(i);
            }
        }
        cycles.push(Candidate {
            atoms,
            bonds,
            edges,
        });
    }
    cycles
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct BitSet {
    words: Vec<u64>,
}

impl BitSet {
    fn with_capacity(bits: usize) -> Self {
        Self {
            words: vec![0; bits.div_ceil(64)],
        }
    }

    fn insert(&mut self, bit: usize) {
        self.words[bit / 64] |= 1 << (bit % 64);
    }

    fn contains(&self, bit: usize) -> bool {
        self.words[bit / 64] & (1 << (bit % 64)) != 0
    }

    fn xor_with(&mut self, other: &BitSet) {
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a ^= b;
        }
    }

    fn first_set(&self) -> Option<usize> {
        self.words
            .iter()
            .enumerate()
            .find(|(_, w)| **w != 0)
            .map(|(i, w)| i * 64 + w.trailing_zeros() as usize)
    }
}
