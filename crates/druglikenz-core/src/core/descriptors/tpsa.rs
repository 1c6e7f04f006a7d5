use crate::core::models::ids::AtomId;
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::BondOrder;

/// Bond-type census of one polar atom, the key of the fragment lookup.
#[derive(Debug, Clone, Copy, Default)]
struct Environment {
    neighbors: usize,
    hydrogens: u8,
    charge: i8,
    single: u8,
    double: u8,
    triple: u8,
    aromatic: u8,
    in_three_ring: bool,
}

impl Environment {
    fn of(molecule: &Molecule, atom_id: AtomId) -> Option<Self> {
        let atom = molecule.atom(atom_id)?;
        let mut env = Self {
            neighbors: molecule.degree(atom_id),
            hydrogens: atom.total_hydrogens(),
            charge: atom.formal_charge,
            in_three_ring: molecule.is_atom_in_ring_of_size(atom_id, 3),
            ..Self::default()
        };
        for (_, bond) in molecule.neighbor_bonds(atom_id) {
            match bond.order {
                BondOrder::Single => env.single += 1,
                BondOrder::Double => env.double += 1,
                BondOrder::Triple => env.triple += 1,
                BondOrder::Aromatic => env.aromatic += 1,
                BondOrder::Quadruple => {}
            }
        }
        Some(env)
    }

    fn fallback(&self, base: f64, per_neighbor: f64) -> f64 {
        (base - per_neighbor * self.neighbors as f64 + 1.5 * f64::from(self.hydrogens)).max(0.0)
    }
}

/// Topological polar surface area from Ertl's nitrogen and oxygen fragment table.
///
/// Sulfur and phosphorus do not contribute. Environments missing from the table use the
/// generic estimate `30.5 - 8.2·neighbors + 1.5·H` for N and `28.5 - 8.6·neighbors + 1.5·H`
/// for O, floored at zero. A molecule without N or O yields positive zero.
pub fn tpsa(molecule: &Molecule) -> f64 {
    molecule
        .atoms_iter()
        .filter_map(|(id, atom)| match atom.atomic_number() {
            7 => Environment::of(molecule, id).map(|env| nitrogen(&env)),
            8 => Environment::of(molecule, id).map(|env| oxygen(&env)),
            _ => None,
        })
        .fold(0.0, |total, contribution| total + contribution)
}

fn nitrogen(e: &Environment) -> f64 {
    let (h, q) = (e.hydrogens, e.charge);
    let value = match e.neighbors {
        1 => match (h, q) {
            (0, 0) if e.triple == 1 => Some(23.79),
            (1, 0) if e.double == 1 => Some(23.85),
            (2, 0) if e.single == 1 => Some(26.02),
            (2, 1) if e.double == 1 => Some(25.59),
            (3, 1) if e.single == 1 => Some(27.64),
            _ => None,
        },
        2 => match (h, q) {
            (0, 0) if e.single == 1 && e.double == 1 => Some(12.36),
            (0, 0) if e.double == 2 || (e.triple == 1 && e.double == 1) => Some(13.60),
            (1, 0) if e.single == 2 && e.in_three_ring => Some(21.94),
            (1, 0) if e.single == 2 => Some(12.03),
            (0, 1) if (e.triple == 1 && e.single == 1) || e.double == 2 => Some(4.36),
            (1, 1) if e.double == 1 && e.single == 1 => Some(13.97),
            (2, 1) if e.single == 2 => Some(16.61),
            (0, 0) if e.aromatic == 2 => Some(12.89),
            (1, 0) if e.aromatic == 2 => Some(15.79),
            (1, 1) if e.aromatic == 2 => Some(14.14),
            _ => None,
        },
        3 => match (h, q) {
            (0, 0) if e.single == 3 && e.in_three_ring => Some(3.01),
            (0, 0) if e.single == 3 => Some(3.24),
            (0, 0) if e.single == 1 && e.double == 2 => Some(11.68),
            (0, 1) if e.single == 2 && e.double == 1 => Some(3.01),
            (1, 1) if e.single == 3 => Some(4.44),
            (0, 0) if e.aromatic == 3 => Some(4.41),
            (0, 0) if e.single == 1 && e.aromatic == 2 => Some(4.93),
            (0, 0) if e.double == 1 && e.aromatic == 2 => Some(8.39),
            (0, 1) if e.aromatic == 3 => Some(4.10),
            (0, 1) if e.single == 1 && e.aromatic == 2 => Some(3.88),
            _ => None,
        },
        4 if h == 0 && q == 1 && e.single == 4 => Some(0.0),
        _ => None,
    };
    value.unwrap_or_else(|| e.fallback(30.5, 8.2))
}

fn oxygen(e: &Environment) -> f64 {
    let (h, q) = (e.hydrogens, e.charge);
    let value = match e.neighbors {
        1 => match (h, q) {
            (0, 0) if e.double == 1 => Some(17.07),
            (1, 0) if e.single == 1 => Some(20.23),
            (0, -1) if e.single == 1 => Some(23.06),
            _ => None,
        },
        2 => match (h, q) {
            (0, 0) if e.single == 2 && e.in_three_ring => Some(12.53),
            (0, 0) if e.single == 2 => Some(9.23),
            (0, 0) if e.aromatic == 2 => Some(13.14),
            _ => None,
        },
        _ => None,
    };
    value.unwrap_or_else(|| e.fallback(28.5, 8.6))
}
