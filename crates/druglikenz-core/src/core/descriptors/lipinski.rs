use crate::core::models::atom::Atom;
use crate::core::models::ids::AtomId;
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::BondOrder;

const O: u8 = 8;
const N: u8 = 7;
const S: u8 = 16;
const P: u8 = 15;
const F: u8 = 9;

/// Total valence as used by the acceptor/donor patterns: Kekulé bond orders plus
/// every attached hydrogen.
fn valence(molecule: &Molecule, atom_id: AtomId) -> u8 {
    molecule.total_valence(atom_id)
}

fn is_aliphatic(atom: &Atom, atomic_number: u8) -> bool {
    !atom.is_aromatic && atom.atomic_number() == atomic_number
}

fn has_triple_bond(molecule: &Molecule, atom_id: AtomId) -> bool {
    molecule
        .neighbor_bonds(atom_id)
        .any(|(_, bond)| bond.order == BondOrder::Triple)
}

/// Whether the atom carries a double bond to O, N, P or S. With `acyclic_only`,
/// ring double bonds are ignored.
fn has_double_bond_to_onps(molecule: &Molecule, atom_id: AtomId, acyclic_only: bool) -> bool {
    molecule.neighbor_bonds(atom_id).any(|(neighbor, bond)| {
        bond.order == BondOrder::Double
            && !(acyclic_only && bond.is_in_ring)
            && matches!(neighbor.atomic_number(), O | N | P | S)
    })
}

/// Hydrogen-bond acceptor count.
///
/// An atom accepts when it is:
/// - an aliphatic O/S with one hydrogen and valence 2 that is single-bonded to an atom
///   without a double bond to O/N/P/S (alcohols, thiols, but not acids);
/// - an aliphatic O/S with no hydrogen and valence 2 (ethers, carbonyls);
/// - an anionic aliphatic O/S;
/// - an aliphatic trivalent N that is not attached to an acyclic `X=O/N/P/S` group;
/// - a neutral aromatic n without hydrogen, or a neutral aromatic o or s;
/// - fluorine.
pub fn h_bond_acceptors(molecule: &Molecule) -> u32 {
    molecule
        .atoms_iter()
        .filter(|&(id, atom)| is_acceptor(molecule, id, atom))
        .count() as u32
}

fn is_acceptor(molecule: &Molecule, id: AtomId, atom: &Atom) -> bool {
    let z = atom.atomic_number();
    let hydrogens = atom.total_hydrogens();

    if !atom.is_aromatic && matches!(z, O | S) {
        let v = valence(molecule, id);
        if hydrogens == 1 && v == 2 {
            return molecule.neighbors(id).any(|(neighbor, bond)| {
                molecule
                    .bond(bond)
                    .is_some_and(|b| b.order == BondOrder::Single)
                    && !has_double_bond_to_onps(molecule, neighbor, false)
            });
        }
        return (hydrogens == 0 && v == 2) || atom.formal_charge == -1;
    }

    if is_aliphatic(atom, N) {
        if valence(molecule, id) != 3 {
            return false;
        }
        return !molecule.neighbors(id).any(|(neighbor, bond)| {
            molecule
                .bond(bond)
                .is_some_and(|b| b.order == BondOrder::Single)
                && has_double_bond_to_onps(molecule, neighbor, true)
        });
    }

    if atom.is_aromatic && atom.formal_charge == 0 {
        return match z {
            N => hydrogens == 0,
            O | S => true,
            _ => false,
        };
    }

    z == F
}

/// Hydrogen-bond donor count: N–H (trivalent, or tetravalent cationic), neutral O–H and
/// S–H with exactly one hydrogen, and neutral aromatic n–H.
pub fn h_bond_donors(molecule: &Molecule) -> u32 {
    molecule
        .atoms_iter()
        .filter(|&(id, atom)| {
            let hydrogens = atom.total_hydrogens();
            let charge = atom.formal_charge;
            match (atom.atomic_number(), atom.is_aromatic) {
                (N, false) if hydrogens > 0 => {
                    let v = valence(molecule, id);
                    v == 3 || (charge == 1 && v == 4)
                }
                (O | S, false) => hydrogens == 1 && charge == 0,
                (N, true) => hydrogens == 1 && charge == 0,
                _ => false,
            }
        })
        .count() as u32
}

/// Rotatable bond count using the strict definition.
///
/// A non-ring single bond between two non-terminal atoms is rotatable unless one end
/// carries a triple bond or is a trihalomethyl or tert-butyl carbon. Amide, ester,
/// thioester and amidine C–X bonds are excluded because both of their ends are
/// "amide-like".
pub fn rotatable_bonds(molecule: &Molecule) -> u32 {
    molecule
        .bonds_iter()
        .filter(|(_, bond)| {
            if bond.is_in_ring || !matches!(bond.order, BondOrder::Single | BondOrder::Aromatic) {
                return false;
            }
            is_rotatable(molecule, bond.atom1_id, bond.atom2_id)
        })
        .count() as u32
}

fn is_rotatable(molecule: &Molecule, a: AtomId, b: AtomId) -> bool {
    is_rotor_end(molecule, a)
        && is_rotor_end(molecule, b)
        && !(is_amide_like(molecule, a) && is_amide_like(molecule, b))
}

/// End-atom requirements shared by both sides of a rotatable bond.
fn is_rotor_end(molecule: &Molecule, atom_id: AtomId) -> bool {
    let Some(atom) = molecule.atom(atom_id) else {
        return false;
    };
    if molecule.degree(atom_id) == 1 || has_triple_bond(molecule, atom_id) {
        return false;
    }
    if !is_aliphatic(atom, 6) {
        return true;
    }
    let count_neighbors = |predicate: &dyn Fn(&Atom) -> bool| {
        molecule
            .neighbor_bonds(atom_id)
            .filter(|(neighbor, _)| predicate(*neighbor))
            .count()
    };
    for halogen in [9, 17, 35] {
        if count_neighbors(&|n: &Atom| is_aliphatic(n, halogen)) >= 3 {
            return false;
        }
    }
    count_neighbors(&|n: &Atom| is_aliphatic(n, 6) && n.total_hydrogens() == 3) < 3
}

/// What kind of double bond makes a three-connected aliphatic carbon acyl-like.
#[derive(Debug, Clone, Copy, Default)]
struct AcylCarbon {
    /// `C=N`, `C=O` or `C=S`.
    heteroatom: bool,
    /// `C=[N+]`.
    iminium: bool,
}

fn acyl_carbon(molecule: &Molecule, atom_id: AtomId) -> Option<AcylCarbon> {
    let atom = molecule.atom(atom_id)?;
    if !is_aliphatic(atom, 6) || molecule.degree(atom_id) != 3 {
        return None;
    }
    let mut kind = AcylCarbon::default();
    for (partner, bond) in molecule.neighbor_bonds(atom_id) {
        if bond.order != BondOrder::Double || partner.is_aromatic {
            continue;
        }
        let z = partner.atomic_number();
        kind.heteroatom |= matches!(z, N | O | S);
        kind.iminium |= z == N && partner.formal_charge == 1;
    }
    (kind.heteroatom || kind.iminium).then_some(kind)
}

/// Heteroatom end of an amide, ester or thioester bond: any N, aliphatic O, or
/// non-terminal aliphatic S.
fn is_heteroatom_end(molecule: &Molecule, atom_id: AtomId, atom: &Atom) -> bool {
    match atom.atomic_number() {
        N => true,
        O => !atom.is_aromatic,
        S => !atom.is_aromatic && molecule.degree(atom_id) != 1,
        _ => false,
    }
}

/// Heteroatom end of an amidinium bond: a non-terminal N.
fn is_amidinium_end(molecule: &Molecule, atom_id: AtomId, atom: &Atom) -> bool {
    atom.atomic_number() == N && molecule.degree(atom_id) != 1
}

/// Either end of an amide-type bond: an acyl carbon with a heteroatom across an acyclic
/// single bond, or that heteroatom itself.
fn is_amide_like(molecule: &Molecule, atom_id: AtomId) -> bool {
    let Some(atom) = molecule.atom(atom_id) else {
        return false;
    };
    let acyclic_single_neighbors = move || {
        molecule.neighbors(atom_id).filter_map(move |(neighbor, bond)| {
            let bond = molecule.bond(bond)?;
            if bond.order != BondOrder::Single || bond.is_in_ring {
                return None;
            }
            Some((neighbor, molecule.atom(neighbor)?))
        })
    };

    if let Some(kind) = acyl_carbon(molecule, atom_id) {
        let bonded_to_heteroatom = acyclic_single_neighbors().any(|(id, other)| {
            (kind.heteroatom && is_heteroatom_end(molecule, id, other))
                || (kind.iminium && is_amidinium_end(molecule, id, other))
        });
        if bonded_to_heteroatom {
            return true;
        }
    }

    let heteroatom_end = is_heteroatom_end(molecule, atom_id, atom);
    let amidinium_end = is_amidinium_end(molecule, atom_id, atom);
    if !heteroatom_end && !amidinium_end {
        return false;
    }
    acyclic_single_neighbors().any(|(id, _)| {
        acyl_carbon(molecule, id).is_some_and(|kind| {
            (heteroatom_end && kind.heteroatom) || (amidinium_end && kind.iminium)
        })
    })
}
