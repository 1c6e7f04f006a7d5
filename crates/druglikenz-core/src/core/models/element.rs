use phf::{Map, phf_map};

/// Static data for a chemical element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Element {
    /// Atomic number; `0` is reserved for the SMILES wildcard `*`.
    pub atomic_number: u8,
    pub symbol: &'static str,
    /// Standard atomic weight in g/mol.
    pub atomic_weight: f64,
    /// Allowed valences in increasing order. Empty when no valence model applies.
    pub valences: &'static [u8],
}

impl Element {
    pub fn is_wildcard(&self) -> bool {
        self.atomic_number == 0
    }

    pub fn max_valence(&self) -> Option<u8> {
        self.valences.last().copied()
    }
}

macro_rules! element {
    ($z:expr, $sym:expr, $w:expr) => {
        Element {
            atomic_number: $z,
            symbol: $sym,
            atomic_weight: $w,
            valences: &[],
        }
    };
    ($z:expr, $sym:expr, $w:expr, [$($v:expr),*]) => {
        Element {
            atomic_number: $z,
            symbol: $sym,
            atomic_weight: $w,
            valences: &[$($v),*],
        }
    };
}

static ELEMENTS: Map<&'static str, Element> = phf_map! {
    "*" => element!(0, "*", 0.0),
    "H" => element!(1, "H", 1.008, [1]),
    "He" => element!(2, "He", 4.003),
    "Li" => element!(3, "Li", 6.941),
    "Be" => element!(4, "Be", 9.012),
    "B" => element!(5, "B", 10.812, [3]),
    "C" => element!(6, "C", 12.011, [4]),
    "N" => element!(7, "N", 14.007, [3]),
    "O" => element!(8, "O", 15.999, [2]),
    "F" => element!(9, "F", 18.998, [1]),
    "Ne" => element!(10, "Ne", 20.18),
    "Na" => element!(11, "Na", 22.99),
    "Mg" => element!(12, "Mg", 24.305),
    "Al" => element!(13, "Al", 26.982),
    "Si" => element!(14, "Si", 28.086, [4]),
    "P" => element!(15, "P", 30.974, [3, 5, 7]),
    "S" => element!(16, "S", 32.067, [2, 4, 6]),
    "Cl" => element!(17, "Cl", 35.453, [1]),
    "Ar" => element!(18, "Ar", 39.948),
    "K" => element!(19, "K", 39.098),
    "Ca" => element!(20, "Ca", 40.078),
    "Sc" => element!(21, "Sc", 44.956),
    "Ti" => element!(22, "Ti", 47.867),
    "V" => element!(23, "V", 50.942),
    "Cr" => element!(24, "Cr", 51.996),
    "Mn" => element!(25, "Mn", 54.938),
    "Fe" => element!(26, "Fe", 55.845),
    "Co" => element!(27, "Co", 58.933),
    "Ni" => element!(28, "Ni", 58.693),
    "Cu" => element!(29, "Cu", 63.546),
    "Zn" => element!(30, "Zn", 65.39),
    "Ga" => element!(31, "Ga", 69.723),
    "Ge" => element!(32, "Ge", 72.61, [4]),
    "As" => element!(33, "As", 74.922, [3, 5]),
    "Se" => element!(34, "Se", 78.96, [2, 4, 6]),
    "Br" => element!(35, "Br", 79.904, [1]),
    "Kr" => element!(36, "Kr", 83.8),
    "Rb" => element!(37, "Rb", 85.468),
    "Sr" => element!(38, "Sr", 87.62),
    "Y" => element!(39, "Y", 88.906),
    "Zr" => element!(40, "Zr", 91.224),
    "Nb" => element!(41, "Nb", 92.906),
    "Mo" => element!(42, "Mo", 95.94),
    "Tc" => element!(43, "Tc", 98.0),
    "Ru" => element!(44, "Ru", 101.07),
    "Rh" => element!(45, "Rh", 102.906),
    "Pd" => element!(46, "Pd", 106.42),
    "Ag" => element!(47, "Ag", 107.868),
    "Cd" => element!(48, "Cd", 112.411),
    "In" => element!(49, "In", 114.818),
    "Sn" => element!(50, "Sn", 118.71),
    "Sb" => element!(51, "Sb", 121.76, [3, 5]),
    "Te" => element!(52, "Te", 127.6, [2, 4, 6]),
    "I" => element!(53, "I", 126.904, [1, 3, 5]),
    "Xe" => element!(54, "Xe", 131.29),
    "Cs" => element!(55, "Cs", 132.905),
    "Ba" => element!(56, "Ba", 137.328),
    "Gd" => element!(64, "Gd", 157.25),
    "W" => element!(74, "W", 183.84),
    "Pt" => element!(78, "Pt", 195.078),
    "Au" => element!(79, "Au", 196.967),
    "Hg" => element!(80, "Hg", 200.59),
    "Tl" => element!(81, "Tl", 204.383),
    "Pb" => element!(82, "Pb", 207.2),
    "Bi" => element!(83, "Bi", 208.98),
    "Rn" => element!(86, "Rn", 222.0),
};

/// Symbols indexed by atomic number for the elements present in the table.
static SYMBOLS_BY_NUMBER: [Option<&str>; 87] = {
    let mut table: [Option<&str>; 87] = [None; 87];
    let symbols = [
        "*", "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P",
        "S", "Cl", "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn",
        "Ga", "Ge", "As", "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh",
        "Pd", "Ag", "Cd", "In", "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba",
    ];
    let mut i = 0;
    while i < symbols.len() {
        table[i] = Some(symbols[i]);
        i += 1;
    }
    table[64] = Some("Gd");
    table[74] = Some("W");
    table[78] = Some("Pt");
    table[79] = Some("Au");
    table[80] = Some("Hg");
    table[81] = Some("Tl");
    table[82] = Some("Pb");
    table[83] = Some("Bi");
    table[86] = Some("Rn");
    table
};

/// Exact isotope masses keyed by `atomic_number * 1000 + mass_number`.
static ISOTOPE_MASSES: Map<u32, f64> = phf_map! {
    1001u32 => 1.007825,
    1002u32 => 2.014102,
    1003u32 => 3.016049,
    6012u32 => 12.0,
    6013u32 => 13.003355,
    6014u32 => 14.003242,
    7014u32 => 14.003074,
    7015u32 => 15.000109,
    8016u32 => 15.994915,
    8017u32 => 16.999132,
    8018u32 => 17.999160,
    9018u32 => 18.000938,
    9019u32 => 18.998403,
    15031u32 => 30.973762,
    15032u32 => 31.973907,
    16032u32 => 31.972071,
    16034u32 => 33.967867,
    17035u32 => 34.968853,
    17037u32 => 36.965903,
    35079u32 => 78.918338,
    35081u32 => 80.916291,
    53123u32 => 122.905589,
    53125u32 => 124.904630,
    53127u32 => 126.904473,
    53131u32 => 130.906124,
};

pub fn lookup(symbol: &str) -> Option<&'static Element> {
    ELEMENTS.get(symbol)
}

pub fn by_atomic_number(atomic_number: u8) -> Option<&'static Element> {
    SYMBOLS_BY_NUMBER
        .get(atomic_number as usize)
        .copied()
        .flatten()
        .and_then(lookup)
}

static WILDCARD: Element = element!(0, "*", 0.0);
static HYDROGEN: Element = element!(1, "H", 1.008, [1]);

pub fn wildcard() -> &'static Element {
    &WILDCARD
}

pub fn hydrogen() -> &'static Element {
    &HYDROGEN
}

/// Mass of a specific isotope, falling back to the mass number when no exact value is tabulated.
pub fn isotope_mass(element: &Element, mass_number: u16) -> f64 {
    let key = u32::from(element.atomic_number) * 1000 + u32::from(mass_number);
    ISOTOPE_MASSES
        .get(&key)
        .copied()
        .unwrap_or(f64::from(mass_number))
}
