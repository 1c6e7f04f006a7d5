use super::SanitizeError;
use crate::core::models::ids::AtomId;
use crate::core::models::molecule::Molecule;

/// Fills in implicit hydrogens and checks every atom against its allowed valences.
///
/// Unbracketed atoms are raised to the smallest allowed valence not below their
/// explicit valence. Bracket atoms keep exactly the hydrogens that were written and
/// only fail when they exceed the largest allowed valence. Wildcards and elements
/// without a valence model are accepted as written.
pub fn assign_implicit_hydrogens(molecule: &mut Molecule) -> Result<(), SanitizeError> {
    let ids: Vec<AtomId> = molecule.atom_ids();
    for id in ids {
        let explicit = molecule.bond_valence_sum(id);
        let Some(atom) = molecule.atom_mut(id) else {
            continue;
        };
        let explicit = explicit.saturating_add(atom.explicit_hydrogens);
        let allowed = atom.allowed_valences();

        if atom.is_bracketed || atom.element.is_wildcard() {
            atom.implicit_hydrogens = 0;
            if let Some(&max) = allowed.last() {
                if explicit > max && !atom.element.is_wildcard() {
                    return Err(SanitizeError::InvalidValence {
                        symbol: atom.symbol(),
                        valence: explicit,
                    });
                }
            }
            continue;
        }

        if allowed.is_empty() {
            atom.implicit_hydrogens = 0;
            continue;
        }
        match allowed.iter().find(|&&v| v >= explicit) {
            Some(&target) => atom.implicit_hydrogens = target - explicit,
            None => {
                return Err(SanitizeError::InvalidValence {
                    symbol: atom.symbol(),
                    valence: explicit,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::element;
    use crate::core::models::topology::BondOrder;

    fn atom(symbol: &str) -> Atom {
        Atom::new(element::lookup(symbol).unwrap())
    }

    #[test]
    fn methane_and_ethene_receive_expected_hydrogens() {
        let mut methane = Molecule::new();
        let c = methane.add_atom(atom("C"));
        assign_implicit_hydrogens(&mut methane).unwrap();
        assert_eq!(methane.atom(c).unwrap().implicit_hydrogens, 4);

        let mut ethene = Molecule::new();
        let a = ethene.add_atom(atom("C"));
        let b = ethene.add_atom(atom("C"));
        ethene.add_bond(a, b, BondOrder::Double).unwrap();
        assign_implicit_hydrogens(&mut ethene).unwrap();
        assert_eq!(ethene.atom(a).unwrap().implicit_hydrogens, 2);
    }

    #[test]
    fn hypervalent_sulfur_uses_next_allowed_valence() {
        let mut molecule = Molecule::new();
        let s = molecule.add_atom(atom("S"));
        for _ in 0..2 {
            let o = molecule.add_atom(atom("O"));
            molecule.add_bond(s, o, BondOrder::Double).unwrap();
        }
        let c = molecule.add_atom(atom("C"));
        molecule.add_bond(s, c, BondOrder::Single).unwrap();
        assign_implicit_hydrogens(&mut molecule).unwrap();
        assert_eq!(molecule.atom(s).unwrap().implicit_hydrogens, 1);
    }

    #[test]
    fn pentavalent_carbon_is_rejected() {
        let mut molecule = Molecule::new();
        let c = molecule.add_atom(atom("C"));
        for _ in 0..5 {
            let f = molecule.add_atom(atom("F"));
            molecule.add_bond(c, f, BondOrder::Single).unwrap();
        }
        assert_eq!(
            assign_implicit_hydrogens(&mut molecule),
            Err(SanitizeError::InvalidValence {
                symbol: "C",
                valence: 5
            })
        );
    }

    #[test]
    fn saturated_hydrogen_counts_fail_instead_of_wrapping() {
        let mut molecule = Molecule::new();
        let c = molecule.add_atom(Atom {
            is_bracketed: true,
            explicit_hydrogens: u8::MAX,
            ..atom("C")
        });
        let other = molecule.add_atom(atom("C"));
        molecule.add_bond(c, other, BondOrder::Single).unwrap();

        assert_eq!(molecule.total_valence(c), u8::MAX);
        assert_eq!(
            assign_implicit_hydrogens(&mut molecule),
            Err(SanitizeError::InvalidValence {
                symbol: "C",
                valence: u8::MAX
            })
        );
    }

    #[test]
    fn bracket_atoms_keep_written_hydrogens() {
        let mut molecule = Molecule::new();
        let n = molecule.add_atom(Atom {
            is_bracketed: true,
            formal_charge: 1,
            explicit_hydrogens: 4,
            ..atom("N")
        });
        assign_implicit_hydrogens(&mut molecule).unwrap();
        assert_eq!(molecule.atom(n).unwrap().total_hydrogens(), 4);
    }

    #[test]
    fn elements_without_valence_model_get_no_implicit_hydrogens() {
        let mut molecule = Molecule::new();
        let na = molecule.add_atom(atom("Na"));
        let cl = molecule.add_atom(atom("Cl"));
        assign_implicit_hydrogens(&mut molecule).unwrap();
        assert_eq!(molecule.atom(na).unwrap().implicit_hydrogens, 0);
        assert_eq!(molecule.atom(cl).unwrap().implicit_hydrogens, 1);
    }
}
