use crate::core::models::element;
use crate::core::models::molecule::Molecule;

/// Average molecular weight: standard atomic weights (or isotope masses where written)
/// plus one hydrogen atomic weight per attached hydrogen.
pub fn molecular_weight(molecule: &Molecule) -> f64 {
    let hydrogen = element::hydrogen().atomic_weight;
    molecule
        .atoms_iter()
        .map(|(_, atom)| atom.mass() + f64::from(atom.total_hydrogens()) * hydrogen)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::smiles::parse_smiles;

    fn mw(smiles: &str) -> f64 {
        molecular_weight(&parse_smiles(smiles).unwrap())
    }

    #[test]
    fn small_molecules_match_average_weights() {
        assert!((mw("CCO") - 46.069).abs() < 1e-3);
        assert!((mw("O") - 18.015).abs() < 1e-3);
        assert!((mw("c1ccccc1") - 78.114).abs() < 1e-3);
    }

    #[test]
    fn explicit_and_implicit_hydrogens_weigh_the_same() {
        assert!((mw("C") - mw("[CH4]")).abs() < 1e-9);
        assert!((mw("C") - mw("[H]C([H])([H])[H]")).abs() < 1e-9);
    }

    #[test]
    fn isotopes_use_their_own_mass() {
        assert!(mw("[13CH4]") > mw("C") + 0.9);
    }

    #[test]
    fn salts_sum_all_fragments() {
        assert!((mw("[Na+].[Cl-]") - (22.99 + 35.453)).abs() < 1e-6);
    }
}
