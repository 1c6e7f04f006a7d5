use crate::core::models::ids::AtomId;
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::BondOrder;
use slotmap::SecondaryMap;

/// Re-derives aromaticity from the Kekulé structure.
///
/// Every ring of the smallest set is tested on its own with the Hückel `4n + 2` rule.
/// Pairs of rings that fail individually but share a bond are tested again as one
/// fused system, which catches azulene-like cores. Atoms that cannot take part in a
/// delocalised system (sp3 carbons, atoms with a triple bond) disqualify their ring.
pub fn perceive(molecule: &mut Molecule) {
    for (_, atom) in molecule.atoms_iter_mut() {
        atom.is_aromatic = false;
    }
    for (_, bond) in molecule.bonds_iter_mut() {
        bond.order = bond.kekule_order;
    }

    let rings = molecule.rings().to_vec();
    if rings.is_empty() {
        return;
    }

    let mut electrons: SecondaryMap<AtomId, Option<u8>> = SecondaryMap::new();
    for ring in &rings {
        for &atom_id in &ring.atoms {
            if !electrons.contains_key(atom_id) {
                electrons.insert(atom_id, pi_electrons(molecule, atom_id));
            }
        }
    }
    let count = |atoms: &[AtomId]| -> Option<u32> {
        atoms
            .iter()
            .map(|&a| electrons.get(a).copied().flatten().map(u32::from))
            .sum()
    };

    let single: Vec<bool> = rings
        .iter()
        .map(|ring| count(&ring.atoms).is_some_and(is_huckel))
        .collect();
    let mut aromatic = single.clone();

    for i in 0..rings.len() {
        for j in (i + 1)..rings.len() {
            if single[i] || single[j] {
                continue;
            }
            if !rings[i].bonds.iter().any(|&b| rings[j].contains_bond(b)) {
                continue;
            }
            let mut fused = rings[i].atoms.clone();
            fused.extend(
                rings[j]
                    .atoms
                    .iter()
                    .copied()
                    .filter(|a| !rings[i].contains_atom(*a)),
            );
            if count(&fused).is_some_and(is_huckel) {
                aromatic[i] = true;
                aromatic[j] = true;
            }
        }
    }

    for (ring, _) in rings.iter().zip(&aromatic).filter(|(_, flag)| **flag) {
        for &atom_id in &ring.atoms {
            if let Some(atom) = molecule.atom_mut(atom_id) {
                atom.is_aromatic = true;
            }
        }
        for &bond_id in &ring.bonds {
            if let Some(bond) = molecule.bond_mut(bond_id) {
                bond.order = BondOrder::Aromatic;
            }
        }
    }
}

fn is_huckel(electrons: u32) -> bool {
    electrons % 4 == 2
}

/// Number of electrons an atom donates to a ring's pi system, or `None` when the atom
/// cannot be part of one.
fn pi_electrons(molecule: &Molecule, atom_id: AtomId) -> Option<u8> {
    let atom = molecule.atom(atom_id)?;
    let mut ring_double = false;
    let mut exocyclic_partner = None;
    for (neighbor, bond) in molecule.neighbor_bonds(atom_id) {
        match bond.kekule_order {
            BondOrder::Triple | BondOrder::Quadruple => return None,
            BondOrder::Double if bond.is_in_ring => ring_double = true,
            BondOrder::Double => exocyclic_partner = Some(neighbor.atomic_number()),
            _ => {}
        }
    }

    if ring_double {
        return Some(1);
    }
    if let Some(partner) = exocyclic_partner {
        // Carbonyl-like exocyclic bonds leave an empty p orbital in the ring.
        return matches!(partner, 7 | 8 | 16).then_some(0);
    }

    let connections = molecule.degree(atom_id) + usize::from(atom.total_hydrogens());
    match (atom.atomic_number(), atom.formal_charge, connections) {
        (6, -1, 3) => Some(2),
        (6, 1, 3) | (5, 0, 3) => Some(0),
        (7 | 15 | 33, 0, 3) | (7, -1, 2) => Some(2),
        (8 | 16 | 34 | 52, 0, 2) => Some(2),
        _ => None,
    }
}
