//! Wildman–Crippen atom-contribution LogP.
//!
//! Every heavy atom is assigned the first matching atom type of its element class, and
//! each attached hydrogen is typed by its parent atom. The estimate is the sum of the
//! contributions of all typed atoms.

use crate::core::models::atom::Atom;
use crate::core::models::ids::AtomId;
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::BondOrder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomType {
    C1,
    C2,
    C3,
    C4,
    C5,
    C6,
    C7,
    C8,
    C9,
    C10,
    C11,
    C12,
    C13,
    C14,
    C15,
    C16,
    C17,
    C18,
    C19,
    C20,
    C21,
    C22,
    C23,
    C24,
    C25,
    C26,
    C27,
    CS,
    H1,
    H2,
    H3,
    H4,
    HS,
    N1,
    N2,
    N3,
    N4,
    N5,
    N6,
    N7,
    N8,
    N9,
    N10,
    N11,
    N12,
    N13,
    N14,
    NS,
    O1,
    O2,
    O3,
    O4,
    O5,
    O6,
    O7,
    O8,
    O9,
    O10,
    O11,
    O12,
    OS,
    F,
    Cl,
    Br,
    I,
    Hal,
    P,
    S1,
    S2,
    S3,
    Me1,
    Me2,
    Unknown,
}

impl AtomType {
    pub fn contribution(self) -> f64 {
        use AtomType::*;
        match self {
            C1 => 0.1441,
            C2 => 0.0,
            C3 => -0.2035,
            C4 => -0.2051,
            C5 => -0.2783,
            C6 => 0.1551,
            C7 => 0.0017,
            C8 => 0.08452,
            C9 => -0.1444,
            C10 => -0.0516,
            C11 => 0.1193,
            C12 => -0.0967,
            C13 => -0.5443,
            C14 => 0.0,
            C15 => 0.245,
            C16 => 0.198,
            C17 => 0.0,
            C18 => 0.1581,
            C19 => 0.2955,
            C20 => 0.2713,
            C21 => 0.136,
            C22 => 0.4619,
            C23 => 0.5437,
            C24 => 0.1893,
            C25 => -0.8186,
            C26 => 0.264,
            C27 => 0.2148,
            CS => 0.08129,
            H1 => 0.123,
            H2 => -0.2677,
            H3 => 0.2142,
            H4 => 0.298,
            HS => 0.1125,
            N1 => -1.019,
            N2 => -0.7096,
            N3 => -1.027,
            N4 => -0.5188,
            N5 => 0.08387,
            N6 => 0.1836,
            N7 => -0.3187,
            N8 => -0.4458,
            N9 => 0.01508,
            N10 => -1.950,
            N11 => -0.3239,
            N12 => -1.119,
            N13 => -0.3396,
            N14 => 0.2887,
            NS => -0.4806,
            O1 => 0.1552,
            O2 => -0.2893,
            O3 => -0.0684,
            O4 => -0.4195,
            O5 => 0.0335,
            O6 => -0.3339,
            O7 => -1.189,
            O8 => 0.1788,
            O9 => -0.1526,
            O10 => 0.1129,
            O11 => 0.4833,
            O12 => -1.326,
            OS => -0.1188,
            F => 0.4202,
            Cl => 0.6895,
            Br => 0.8456,
            I => 0.8857,
            Hal => -2.996,
            P => 0.8612,
            S1 => 0.6482,
            S2 => -0.0024,
            S3 => 0.6237,
            Me1 => -0.3808,
            Me2 => -0.0025,
            Unknown => 0.0,
        }
    }
}

/// Wildman–Crippen LogP of a sanitized molecule.
pub fn logp(molecule: &Molecule) -> f64 {
    atom_types(molecule)
        .into_iter()
        .map(|(_, heavy, hydrogen, hydrogens)| {
            heavy.contribution() + f64::from(hydrogens) * hydrogen.contribution()
        })
        .sum()
}

/// Per-atom typing: `(atom, atom type, type of its hydrogens, hydrogen count)`.
pub fn atom_types(molecule: &Molecule) -> Vec<(AtomId, AtomType, AtomType, u8)> {
    molecule
        .atoms_iter()
        .map(|(id, atom)| {
            let env = Environment::new(molecule, id, atom);
            (id, env.heavy_type(), env.hydrogen_type(), atom.total_hydrogens())
        })
        .collect()
}

struct Neighbor<'a> {
    id: AtomId,
    atom: &'a Atom,
    order: BondOrder,
}

struct Environment<'a> {
    molecule: &'a Molecule,
    id: AtomId,
    atom: &'a Atom,
    neighbors: Vec<Neighbor<'a>>,
    hydrogens: u8,
}

const ORGANIC_HETERO: [u8; 8] = [7, 8, 15, 16, 9, 17, 35, 53];
const HALOGENS: [u8; 4] = [9, 17, 35, 53];

fn aliphatic_heavy(a: &Atom) -> bool {
    !a.is_aromatic && !a.is_hydrogen()
}

fn aliphatic_carbon(a: &Atom) -> bool {
    !a.is_aromatic && a.is_carbon()
}

fn aromatic_carbon(a: &Atom) -> bool {
    a.is_aromatic && a.is_carbon()
}

/// `[N,O,P,S,F,Cl,Br,I]`: aliphatic N/O/P/S or any halogen.
fn organic_heteroatom(a: &Atom) -> bool {
    let z = a.atomic_number();
    HALOGENS.contains(&z) || (!a.is_aromatic && matches!(z, 7 | 8 | 15 | 16))
}

impl<'a> Environment<'a> {
    fn new(molecule: &'a Molecule, id: AtomId, atom: &'a Atom) -> Self {
        let neighbors = molecule
            .neighbors(id)
            .filter_map(|(n, b)| {
                Some(Neighbor {
                    id: n,
                    atom: molecule.atom(n)?,
                    order: molecule.bond(b)?.order,
                })
            })
            .collect();
        Self {
            molecule,
            id,
            atom,
            neighbors,
            hydrogens: atom.total_hydrogens(),
        }
    }

    fn count(&self, predicate: impl Fn(&Atom) -> bool) -> usize {
        self.neighbors.iter().filter(|n| predicate(n.atom)).count()
    }

    fn any(&self, predicate: impl Fn(&Neighbor) -> bool) -> bool {
        self.neighbors.iter().any(predicate)
    }

    /// Total connections: heavy neighbours plus hydrogens.
    fn connections(&self) -> usize {
        self.neighbors.len() + usize::from(self.hydrogens)
    }

    fn double_to(&self, predicate: impl Fn(&Atom) -> bool) -> bool {
        self.any(|n| n.order == BondOrder::Double && predicate(n.atom))
    }

    fn heavy_type(&self) -> AtomType {
        match self.atom.atomic_number() {
            0 => AtomType::Unknown,
            1 => self.hydrogen_type(),
            6 if self.atom.is_aromatic => self.aromatic_carbon_type(),
            6 => self.aliphatic_carbon_type(),
            7 => self.nitrogen_type(),
            8 => self.oxygen_type(),
            _ => self.other_type(),
        }
    }

    fn aliphatic_carbon_type(&self) -> AtomType {
        let h = self.hydrogens;
        let sp3 = self.connections() == 4;
        let carbons = self.count(aliphatic_carbon);
        let heavy = self.count(aliphatic_heavy);
        let hetero = self.count(organic_heteroatom);
        let aromatic = self.count(|a| a.is_aromatic);

        if h == 4 || (h == 3 && carbons >= 1) || (h == 2 && carbons >= 2) {
            return AtomType::C1;
        }
        if (h == 1 && carbons >= 3) || (h == 0 && carbons >= 4) {
            return AtomType::C2;
        }
        if (h == 3 && hetero >= 1) || (h == 2 && sp3 && hetero >= 1 && heavy >= 2) {
            return AtomType::C3;
        }
        if sp3 && hetero >= 1 && ((h == 1 && heavy >= 3) || (h == 0 && heavy >= 4)) {
            return AtomType::C4;
        }
        if self.double_to(|a| aliphatic_heavy(a) && !a.is_carbon()) {
            return AtomType::C5;
        }

        let vinyl_partners = self
            .neighbors
            .iter()
            .filter(|n| n.order == BondOrder::Double && aliphatic_carbon(n.atom))
            .count();
        if vinyl_partners > 0 {
            let others = self.neighbors.len() - 1;
            let others_aliphatic = heavy - 1 == others;
            if vinyl_partners >= 2
                || (others_aliphatic && usize::from(h) + others == 2 && h <= 2)
            {
                return AtomType::C6;
            }
        }

        if self.connections() == 2
            && self.any(|n| n.order == BondOrder::Triple && !n.atom.is_aromatic)
        {
            return AtomType::C7;
        }
        if h == 3 && self.count(aromatic_carbon) >= 1 {
            return AtomType::C8;
        }
        if h == 3 && aromatic >= 1 {
            return AtomType::C9;
        }
        if sp3 && aromatic >= 1 {
            match h {
                2 => return AtomType::C10,
                1 => return AtomType::C11,
                0 => return AtomType::C12,
                _ => {}
            }
        }
        if (vinyl_partners > 0 && aromatic >= 1)
            || self.double_to(aromatic_carbon)
        {
            return AtomType::C26;
        }
        if sp3
            && self.count(|a| {
                aliphatic_heavy(a) && !a.is_carbon() && !ORGANIC_HETERO.contains(&a.atomic_number())
            }) >= 1
        {
            return AtomType::C27;
        }
        AtomType::CS
    }

    fn aromatic_carbon_type(&self) -> AtomType {
        let h = self.hydrogens;
        let inorganic_substituent = self.any(|n| {
            n.order == BondOrder::Single
                && aliphatic_heavy(n.atom)
                && !matches!(n.atom.atomic_number(), 6 | 7 | 8 | 16 | 9 | 17 | 35 | 53)
        });
        if h == 0 && inorganic_substituent {
            return AtomType::C13;
        }
        for (z, ty) in [
            (9, AtomType::C14),
            (17, AtomType::C15),
            (35, AtomType::C16),
            (53, AtomType::C17),
        ] {
            if self.count(|a| a.atomic_number() == z) >= 1 {
                return ty;
            }
        }
        if h == 1 {
            return AtomType::C18;
        }

        let ring_bonds = self
            .neighbors
            .iter()
            .filter(|n| n.order == BondOrder::Aromatic)
            .count();
        if ring_bonds >= 3 {
            return AtomType::C19;
        }
        if ring_bonds == 2 {
            let substituent = self.neighbors.iter().find(|n| n.order != BondOrder::Aromatic);
            if let Some(sub) = substituent {
                let z = sub.atom.atomic_number();
                let aliphatic = !sub.atom.is_aromatic;
                match sub.order {
                    BondOrder::Single if sub.atom.is_aromatic => return AtomType::C20,
                    BondOrder::Single if aliphatic && z == 6 => return AtomType::C21,
                    BondOrder::Single if aliphatic && z == 7 => return AtomType::C22,
                    BondOrder::Single if aliphatic && z == 8 => return AtomType::C23,
                    BondOrder::Single if aliphatic && z == 16 => return AtomType::C24,
                    BondOrder::Double if aliphatic && matches!(z, 6 | 7 | 8) => {
                        return AtomType::C25;
                    }
                    _ => {}
                }
            }
        }
        AtomType::CS
    }

    fn nitrogen_type(&self) -> AtomType {
        let h = self.hydrogens;
        let q = self.atom.formal_charge;
        if self.atom.is_aromatic {
            return match q {
                0 => AtomType::N11,
                q if q > 0 => AtomType::N12,
                _ => AtomType::NS,
            };
        }

        let heavy = self.count(aliphatic_heavy);
        let aromatic = self.count(|a| a.is_aromatic);
        if q == 0 {
            match h {
                2 if heavy >= 1 => return AtomType::N1,
                1 if heavy >= 2 => return AtomType::N2,
                2 if aromatic >= 1 => return AtomType::N3,
                1 if aromatic >= 1 && heavy >= 1 => return AtomType::N4,
                1 if aromatic >= 2 => return AtomType::N5,
                0 if heavy >= 3 => return AtomType::N6,
                0 if aromatic >= 1 && heavy >= 2 => return AtomType::N7,
                0 if aromatic >= 2 && (heavy >= 1 || aromatic >= 3) => return AtomType::N8,
                _ => {}
            }
            if self.any(|n| n.order == BondOrder::Triple && aliphatic_heavy(n.atom)) {
                return AtomType::N9;
            }
            return AtomType::NS;
        }

        if q > 0 && h >= 1 {
            return AtomType::N10;
        }
        if q < 0 {
            return AtomType::N13;
        }
        let doubles = self
            .neighbors
            .iter()
            .filter(|n| n.order == BondOrder::Double)
            .count();
        let quaternary = heavy >= 4;
        let unsaturated = (doubles >= 1 && self.neighbors.len() >= 3)
            || doubles >= 2
            || self.any(|n| n.order == BondOrder::Triple);
        if quaternary || unsaturated {
            AtomType::N13
        } else {
            AtomType::N14
        }
    }

    fn oxygen_type(&self) -> AtomType {
        if self.atom.is_aromatic {
            return AtomType::O1;
        }
        let h = self.hydrogens;
        let q = self.atom.formal_charge;
        if h == 1 || h == 2 {
            return AtomType::O2;
        }
        let heavy = self.count(aliphatic_heavy);
        let aromatic = self.count(|a| a.is_aromatic);
        if self.neighbors.len() == 2 && heavy == 2 {
            return AtomType::O3;
        }
        if self.neighbors.len() == 2 && aromatic >= 1 {
            return AtomType::O4;
        }

        let lone = (self.neighbors.len() == 1 && q == -1).then(|| &self.neighbors[0]);
        if self.double_to(|a| matches!(a.atomic_number(), 7 | 8))
            || lone.is_some_and(|n| n.atom.atomic_number() == 7)
        {
            return AtomType::O5;
        }
        if self.double_to(|a| a.atomic_number() == 16)
            || lone.is_some_and(|n| n.atom.atomic_number() == 16)
        {
            return AtomType::O6;
        }
        if let Some(n) = lone {
            return if n.atom.is_carbon() && self.carbon_has_double_to_oxygen(n.id) {
                AtomType::O12
            } else {
                AtomType::O7
            };
        }
        if self.double_to(aromatic_carbon) {
            return AtomType::O8;
        }
        if let Some(carbonyl) = self
            .neighbors
            .iter()
            .find(|n| n.order == BondOrder::Double && aliphatic_carbon(n.atom))
        {
            return self.carbonyl_oxygen_type(carbonyl);
        }
        AtomType::OS
    }

    fn carbon_has_double_to_oxygen(&self, carbon: AtomId) -> bool {
        self.molecule
            .neighbor_bonds(carbon)
            .any(|(a, b)| b.order == BondOrder::Double && a.atomic_number() == 8)
    }

    /// O9 (aliphatic carbonyl), O10 (aromatic carbonyl) or O11 (carbonate-like).
    fn carbonyl_oxygen_type(&self, carbonyl: &Neighbor) -> AtomType {
        let carbon = Environment::new(self.molecule, carbonyl.id, carbonyl.atom);
        let others: Vec<&Neighbor> = carbon
            .neighbors
            .iter()
            .filter(|n| n.id != self.id)
            .collect();
        let ch = carbon.hydrogens;
        let count = |p: &dyn Fn(&Atom) -> bool| others.iter().filter(|n| p(n.atom)).count();
        let aliphatic_c = count(&aliphatic_carbon);
        let aromatic_c = count(&aromatic_carbon);
        let heavy = count(&aliphatic_heavy);
        let aromatic = count(&|a: &Atom| a.is_aromatic);
        let non_carbon = count(&|a: &Atom| !a.is_carbon() && !a.is_hydrogen());
        let double_o = others
            .iter()
            .any(|n| n.order == BondOrder::Double && n.atom.atomic_number() == 8);

        let formyl_hetero = ch == 1
            && others
                .iter()
                .any(|n| !n.atom.is_aromatic && matches!(n.atom.atomic_number(), 7 | 8));
        if (ch == 1 && aliphatic_c >= 1)
            || aliphatic_c >= 2
            || (aliphatic_c >= 1 && heavy >= 2)
            || formyl_hetero
            || ch == 2
            || (carbon.connections() == 2 && double_o)
        {
            return AtomType::O9;
        }
        if (ch == 1 && aromatic_c >= 1)
            || (aliphatic_c + aromatic_c >= 1 && aromatic >= 2)
            || (aliphatic_c >= 1 && aromatic >= 1)
            || (aromatic_c >= 1 && heavy >= 1)
        {
            return AtomType::O10;
        }
        if non_carbon >= 2 {
            return AtomType::O11;
        }
        AtomType::OS
    }

    fn other_type(&self) -> AtomType {
        let z = self.atom.atomic_number();
        let q = self.atom.formal_charge;
        match z {
            9 | 17 | 35 | 53 if q < 0 => AtomType::Hal,
            53 if q > 0 => AtomType::Hal,
            9 if q == 0 => AtomType::F,
            17 if q == 0 => AtomType::Cl,
            35 if q == 0 => AtomType::Br,
            53 if q == 0 => AtomType::I,
            3 | 11 | 19 | 37 | 55 if q > 0 => AtomType::Hal,
            15 => AtomType::P,
            16 if self.atom.is_aromatic => AtomType::S3,
            16 if q == 0 => AtomType::S1,
            16 => AtomType::S2,
            3 | 11 | 19 | 37 | 55 | 4 | 12 | 20 | 38 | 56 | 5 | 13 | 31 | 49 | 81 | 14 | 32
            | 50 | 82 | 33 | 51 | 83 | 34 | 52 | 84 => AtomType::Me1,
            _ => AtomType::Me2,
        }
    }

    /// Type shared by every hydrogen attached to this atom.
    fn hydrogen_type(&self) -> AtomType {
        match self.atom.atomic_number() {
            1 => match self.neighbors.first() {
                Some(n) if matches!(n.atom.atomic_number(), 1 | 6) => AtomType::H1,
                Some(n) => Environment::new(self.molecule, n.id, n.atom).hydrogen_type(),
                None => AtomType::HS,
            },
            6 => AtomType::H1,
            7 => AtomType::H3,
            8 => self.hydroxyl_hydrogen_type(),
            _ => AtomType::H2,
        }
    }

    fn hydroxyl_hydrogen_type(&self) -> AtomType {
        let alcohol = self.any(|n| {
            let z = n.atom.atomic_number();
            (aliphatic_carbon(n.atom) && self.connections_of(n.id) == 4)
                || aromatic_carbon(n.atom)
                || !matches!(z, 1 | 6 | 7 | 8 | 16)
        });
        if alcohol {
            return AtomType::H2;
        }
        if self.any(|n| n.atom.atomic_number() == 7) {
            return AtomType::H3;
        }
        let acid = self.any(|n| {
            let z = n.atom.atomic_number();
            matches!(z, 8 | 16)
                || (aliphatic_carbon(n.atom)
                    && self.molecule.neighbor_bonds(n.id).any(|(a, b)| {
                        b.order == BondOrder::Double && matches!(a.atomic_number(), 6 | 7 | 8 | 16)
                    }))
        });
        if acid { AtomType::H4 } else { AtomType::HS }
    }

    fn connections_of(&self, id: AtomId) -> usize {
        let hydrogens = self.molecule.atom(id).map_or(0, |a| usize::from(a.total_hydrogens()));
        self.molecule.degree(id) + hydrogens
    }
}
