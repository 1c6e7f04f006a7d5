use super::SanitizeError;
use crate::core::models::ids::{AtomId, BondId};
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::BondOrder;
use std::collections::HashMap;

/// Assigns a Kekulé structure to every aromatic bond.
///
/// Aromatic bonds that are not part of a ring (for example the bond joining the two
/// rings of biphenyl written in lowercase) are localised as single bonds first. The
/// remaining aromatic bonds receive double bonds through a perfect matching over the
/// aromatic atoms that still need one.
pub fn kekulize(molecule: &mut Molecule) -> Result<(), SanitizeError> {
    for (_, bond) in molecule.bonds_iter_mut() {
        if bond.order == BondOrder::Aromatic && !bond.is_in_ring {
            bond.order = BondOrder::Single;
            bond.kekule_order = BondOrder::Single;
        }
    }

    let needy: Vec<AtomId> = molecule
        .atoms_iter()
        .filter(|(id, atom)| atom.is_aromatic && needs_double_bond(molecule, *id))
        .map(|(id, _)| id)
        .collect();

    let aromatic_bonds: Vec<BondId> = molecule
        .bonds_iter()
        .filter(|(_, bond)| bond.order == BondOrder::Aromatic)
        .map(|(id, _)| id)
        .collect();

    let index: HashMap<AtomId, usize> = needy.iter().enumerate().map(|(i, &a)| (a, i)).collect();
    let mut adjacency: Vec<Vec<(usize, BondId)>> = vec![Vec::new(); needy.len()];
    for &bond_id in &aromatic_bonds {
        let Some(bond) = molecule.bond(bond_id) else {
            continue;
        };
        if let (Some(&a), Some(&b)) = (index.get(&bond.atom1_id), index.get(&bond.atom2_id)) {
            adjacency[a].push((b, bond_id));
            adjacency[b].push((a, bond_id));
        }
    }

    let mut matched = vec![false; needy.len()];
    let mut doubles = Vec::with_capacity(needy.len() / 2);
    if needy.len() % 2 != 0 || !find_perfect_matching(&adjacency, &mut matched, &mut doubles) {
        return Err(SanitizeError::Kekulization {
            unmatched: matched.iter().filter(|m| !**m).count(),
        });
    }

    for &bond_id in &aromatic_bonds {
        if let Some(bond) = molecule.bond_mut(bond_id) {
            bond.kekule_order = BondOrder::Single;
        }
    }
    for bond_id in doubles {
        if let Some(bond) = molecule.bond_mut(bond_id) {
            bond.kekule_order = BondOrder::Double;
        }
    }
    Ok(())
}

/// Whether an aromatic atom has valence left for one double bond once its written
/// bonds (aromatic ones counted as single) and explicit hydrogens are accounted for.
fn needs_double_bond(molecule: &Molecule, atom_id: AtomId) -> bool {
    let Some(atom) = molecule.atom(atom_id) else {
        return false;
    };
    let used = molecule
        .neighbor_bonds(atom_id)
        .map(|(_, bond)| bond.order.valence())
        .fold(0, u8::saturating_add)
        .saturating_add(atom.explicit_hydrogens);
    atom.allowed_valences()
        .iter()
        .find(|&&v| v >= used)
        .is_some_and(|&target| target > used)
}

/// Backtracking search that always branches on the unmatched atom with the fewest
/// free partners.
fn find_perfect_matching(
    adjacency: &[Vec<(usize, BondId)>],
    matched: &mut [bool],
    doubles: &mut Vec<BondId>,
) -> bool {
    let next = (0..adjacency.len())
        .filter(|&i| !matched[i])
        .min_by_key(|&i| adjacency[i].iter().filter(|(j, _)| !matched[*j]).count());
    let Some(atom) = next else {
        return true;
    };

    matched[atom] = true;
    for &(partner, bond) in &adjacency[atom] {
        if matched[partner] {
            continue;
        }
        matched[partner] = true;
        doubles.push(bond);
        if find_perfect_matching(adjacency, matched, doubles) {
            return true;
        }
        doubles.pop();
        matched[partner] = false;
    }
    matched[atom] = false;
    false
}
