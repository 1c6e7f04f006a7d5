use crate::core::models::ids::AtomId;
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::BondOrder;

/// Removes plain explicit hydrogen atoms and adds them to the hydrogen count of the
/// heavy atom they are attached to. Returns the number of atoms removed.
///
/// Isotopic, charged, mapped and multiply-connected hydrogens are kept as atoms.
pub fn fold_explicit_hydrogens(molecule: &mut Molecule) -> usize {
    let foldable: Vec<(AtomId, AtomId)> = molecule
        .atoms_iter()
        .filter(|(_, atom)| {
            atom.is_hydrogen()
                && atom.isotope.is_none()
                && atom.formal_charge == 0
                && atom.explicit_hydrogens == 0
                && atom.atom_class.is_none()
        })
        .filter_map(|(id, _)| {
            let mut neighbors = molecule.neighbors(id);
            let (heavy, bond) = neighbors.next()?;
            if neighbors.next().is_some() {
                return None;
            }
            let heavy_atom = molecule.atom(heavy)?;
            let bond = molecule.bond(bond)?;
            (!heavy_atom.is_hydrogen() && bond.order == BondOrder::Single).then_some((id, heavy))
        })
        .collect();

    for &(hydrogen, heavy) in &foldable {
        molecule.remove_atom(hydrogen);
        if let Some(atom) = molecule.atom_mut(heavy) {
            atom.explicit_hydrogens = atom.explicit_hydrogens.saturating_add(1);
        }
    }
    foldable.len()
}
