use crate::core::models::atom::{Atom, Chirality};
use crate::core::models::element::{self, Element};
use crate::core::models::ids::AtomId;
use crate::core::models::molecule::{Molecule, MoleculeError};
use crate::core::models::topology::BondOrder;
use crate::core::topology::{self, SanitizeError};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SmilesError {
    #[error("Structure string is empty")]
    Empty,
    #[error("Unexpected character '{character}' at position {position}")]
    UnexpectedCharacter { character: char, position: usize },
    #[error("Unknown element '{symbol}' at position {position}")]
    UnknownElement { symbol: String, position: usize },
    #[error("Bracket atom opened at position {position} is never closed")]
    UnterminatedBracket { position: usize },
    #[error("Unbalanced parenthesis at position {position}")]
    UnbalancedParenthesis { position: usize },
    #[error("Bond symbol at position {position} is not followed by an atom")]
    DanglingBond { position: usize },
    #[error("Ring closure {label} is never closed")]
    UnclosedRing { label: u16 },
    #[error("Ring closure {label} has conflicting bond orders")]
    ConflictingRingBond { label: u16 },
    #[error("Atom at position {position} would be bonded to itself")]
    SelfBond { position: usize },
    #[error("Bond at position {position} duplicates an existing bond")]
    DuplicateBond { position: usize },
    #[error("Hydrogen count {count} at position {position} exceeds {}", MAX_BRACKET_HYDROGENS)]
    HydrogenCount { count: u32, position: usize },
    #[error(transparent)]
    Sanitize(#[from] SanitizeError),
}

/// Parses a SMILES string into a sanitized molecule.
///
/// Leading and trailing whitespace is ignored. The returned molecule has explicit
/// hydrogens folded, rings perceived, implicit hydrogens assigned and aromaticity
/// re-derived, so Kekulé and aromatic spellings of the same structure agree.
pub fn parse_smiles(input: &str) -> Result<Molecule, SmilesError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(SmilesError::Empty);
    }
    let mut molecule = Parser::new(input).parse()?;
    topology::sanitize(&mut molecule)?;
    Ok(molecule)
}

/// Largest hydrogen count accepted inside a bracket atom.
pub const MAX_BRACKET_HYDROGENS: u8 = 9;

/// Extended chirality classes: tetrahedral, allene-like, square planar, trigonal
/// bipyramidal and octahedral.
const CHIRAL_CLASSES: [&str; 5] = ["TH", "AL", "SP", "TB", "OH"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BondSymbol {
    Single,
    Double,
    Triple,
    Quadruple,
    Aromatic,
    Up,
    Down,
}

impl BondSymbol {
    fn from_byte(byte: u8) -> Option<Self> {
        Some(match byte {
            b'-' => Self::Single,
            b'=' => Self::Double,
            b'#' => Self::Triple,
            b'$' => Self::Quadruple,
            b':' => Self::Aromatic,
            b'/' => Self::Up,
            b'\\' => Self::Down,
            _ => return None,
        })
    }

    fn order(self) -> BondOrder {
        match self {
            Self::Single | Self::Up | Self::Down => BondOrder::Single,
            Self::Double => BondOrder::Double,
            Self::Triple => BondOrder::Triple,
            Self::Quadruple => BondOrder::Quadruple,
            Self::Aromatic => BondOrder::Aromatic,
        }
    }
}

struct RingOpening {
    atom: AtomId,
    bond: Option<BondSymbol>,
}

struct Branch {
    anchor: AtomId,
    position: usize,
    atoms_before: usize,
}

struct Parser<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    molecule: Molecule,
    previous: Option<AtomId>,
    pending: Option<(BondSymbol, usize)>,
    branches: Vec<Branch>,
    open_rings: HashMap<u16, RingOpening>,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
            molecule: Molecule::new(),
            previous: None,
            pending: None,
            branches: Vec::new(),
            open_rings: HashMap::new(),
        }
    }

    fn parse(mut self) -> Result<Molecule, SmilesError> {
        while let Some(&byte) = self.bytes.get(self.pos) {
            let position = self.pos;
            match byte {
                b'(' => {
                    let Some(anchor) = self.previous else {
                        return Err(SmilesError::UnbalancedParenthesis { position });
                    };
                    if let Some((_, at)) = self.pending {
                        return Err(SmilesError::DanglingBond { position: at });
                    }
                    self.branches.push(Branch {
                        anchor,
                        position,
                        atoms_before: self.molecule.atom_count(),
                    });
                    self.pos += 1;
                }
                b')' => {
                    let Some(branch) = self.branches.pop() else {
                        return Err(SmilesError::UnbalancedParenthesis { position });
                    };
                    if let Some((_, at)) = self.pending {
                        return Err(SmilesError::DanglingBond { position: at });
                    }
                    if self.molecule.atom_count() == branch.atoms_before {
                        return Err(self.unexpected(position));
                    }
                    self.previous = Some(branch.anchor);
                    self.pos += 1;
                }
                b'.' => {
                    if let Some((_, at)) = self.pending {
                        return Err(SmilesError::DanglingBond { position: at });
                    }
                    self.previous = None;
                    self.pos += 1;
                }
                b'0'..=b'9' => {
                    self.ring_bond(u16::from(byte - b'0'), position)?;
                    self.pos += 1;
                }
                b'%' => {
                    let label = self.two_digit_label()?;
                    self.ring_bond(label, position)?;
                }
                b'[' => {
                    let atom = self.bracket_atom()?;
                    self.attach(atom, position)?;
                }
                _ => {
                    if let Some(symbol) = BondSymbol::from_byte(byte) {
                        if self.previous.is_none() || self.pending.is_some() {
                            return Err(self.unexpected(position));
                        }
                        self.pending = Some((symbol, position));
                        self.pos += 1;
                    } else {
                        let atom = self.organic_atom()?;
                        self.attach(atom, position)?;
                    }
                }
            }
        }

        if let Some((_, position)) = self.pending {
            return Err(SmilesError::DanglingBond { position });
        }
        if let Some(branch) = self.branches.last() {
            return Err(SmilesError::UnbalancedParenthesis {
                position: branch.position,
            });
        }
        if let Some(&label) = self.open_rings.keys().min() {
            return Err(SmilesError::UnclosedRing { label });
        }
        Ok(self.molecule)
    }

    fn unexpected(&self, position: usize) -> SmilesError {
        let character = self.text[position..].chars().next().unwrap_or('\0');
        SmilesError::UnexpectedCharacter {
            character,
            position,
        }
    }

    fn attach(&mut self, atom: Atom, position: usize) -> Result<(), SmilesError> {
        let id = self.molecule.add_atom(atom);
        if let Some(previous) = self.previous {
            let order = match self.pending.take() {
                Some((symbol, _)) => symbol.order(),
                None => self.implicit_order(previous, id),
            };
            self.connect(previous, id, order, position)?;
        }
        self.previous = Some(id);
        Ok(())
    }

    fn implicit_order(&self, a: AtomId, b: AtomId) -> BondOrder {
        let aromatic = |id| self.molecule.atom(id).is_some_and(|atom| atom.is_aromatic);
        if aromatic(a) && aromatic(b) {
            BondOrder::Aromatic
        } else {
            BondOrder::Single
        }
    }

    fn connect(
        &mut self,
        a: AtomId,
        b: AtomId,
        order: BondOrder,
        position: usize,
    ) -> Result<(), SmilesError> {
        match self.molecule.add_bond(a, b, order) {
            Ok(_) => Ok(()),
            Err(MoleculeError::SelfBond) => Err(SmilesError::SelfBond { position }),
            Err(MoleculeError::DuplicateBond | MoleculeError::AtomNotFound) => {
                Err(SmilesError::DuplicateBond { position })
            }
        }
    }

    fn ring_bond(&mut self, label: u16, position: usize) -> Result<(), SmilesError> {
        let Some(current) = self.previous else {
            return Err(self.unexpected(position));
        };
        let symbol = self.pending.take().map(|(symbol, _)| symbol);
        match self.open_rings.remove(&label) {
            None => {
                self.open_rings.insert(
                    label,
                    RingOpening {
                        atom: current,
                        bond: symbol,
                    },
                );
                Ok(())
            }
            Some(opening) => {
                let order = match (opening.bond, symbol) {
                    (Some(a), Some(b)) if a.order() != b.order() => {
                        return Err(SmilesError::ConflictingRingBond { label });
                    }
                    (Some(s), _) | (None, Some(s)) => s.order(),
                    (None, None) => self.implicit_order(opening.atom, current),
                };
                self.connect(opening.atom, current, order, position)
            }
        }
    }

    fn two_digit_label(&mut self) -> Result<u16, SmilesError> {
        let start = self.pos + 1;
        let digits = self.bytes.get(start..start + 2);
        match digits {
            Some([a, b]) if a.is_ascii_digit() && b.is_ascii_digit() => {
                self.pos = start + 2;
                Ok(u16::from(a - b'0') * 10 + u16::from(b - b'0'))
            }
            _ => Err(self.unexpected(self.pos)),
        }
    }

    fn organic_atom(&mut self) -> Result<Atom, SmilesError> {
        let position = self.pos;
        let byte = self.bytes[position];
        let next = self.bytes.get(position + 1).copied();
        let (symbol, aromatic, width) = match (byte, next) {
            (b'B', Some(b'r')) => ("Br", false, 2),
            (b'C', Some(b'l')) => ("Cl", false, 2),
            (b'B' | b'C' | b'N' | b'O' | b'P' | b'S' | b'F' | b'I' | b'*', _) => {
                (&self.text[position..position + 1], false, 1)
            }
            (b'b' | b'c' | b'n' | b'o' | b'p' | b's', _) => {
                (&self.text[position..position + 1], true, 1)
            }
            (b, _) if b.is_ascii_alphabetic() => {
                return Err(SmilesError::UnknownElement {
                    symbol: char::from(b).to_string(),
                    position,
                });
            }
            _ => return Err(self.unexpected(position)),
        };
        let element = resolve_element(symbol).ok_or_else(|| SmilesError::UnknownElement {
            symbol: symbol.to_string(),
            position,
        })?;
        self.pos += width;
        Ok(Atom {
            is_aromatic: aromatic,
            ..Atom::new(element)
        })
    }

    fn bracket_atom(&mut self) -> Result<Atom, SmilesError> {
        let start = self.pos;
        self.pos += 1;

        let isotope = self
            .number()?
            .map(u16::try_from)
            .transpose()
            .map_err(|_| self.unexpected(start + 1))?;
        let (element, aromatic) = self.bracket_symbol()?;
        let chirality = self.chirality();

        let mut explicit_hydrogens = 0;
        if self.peek() == Some(b'H') {
            self.pos += 1;
            let position = self.pos;
            explicit_hydrogens = match self.number()? {
                Some(n) if n > u32::from(MAX_BRACKET_HYDROGENS) => {
                    return Err(SmilesError::HydrogenCount { count: n, position });
                }
                Some(n) => n as u8,
                None => 1,
            };
        }

        let formal_charge = self.charge()?;

        let mut atom_class = None;
        if self.peek() == Some(b':') {
            self.pos += 1;
            atom_class = match self.number()? {
                Some(n) => Some(n),
                None => return Err(self.unexpected(self.pos.min(self.bytes.len() - 1))),
            };
        }

        match self.peek() {
            Some(b']') => self.pos += 1,
            Some(_) => return Err(self.unexpected(self.pos)),
            None => return Err(SmilesError::UnterminatedBracket { position: start }),
        }

        Ok(Atom {
            isotope,
            formal_charge,
            explicit_hydrogens,
            is_aromatic: aromatic,
            is_bracketed: true,
            chirality,
            atom_class,
            ..Atom::new(element)
        })
    }

    fn bracket_symbol(&mut self) -> Result<(&'static Element, bool), SmilesError> {
        let position = self.pos;
        let Some(first) = self.peek() else {
            return Err(SmilesError::UnterminatedBracket {
                position: position.saturating_sub(1),
            });
        };
        let second = self.bytes.get(position + 1).copied();

        if first == b'*' {
            self.pos += 1;
            return Ok((element::wildcard(), false));
        }
        if first.is_ascii_uppercase() {
            if second.is_some_and(|b| b.is_ascii_lowercase()) {
                if let Some(element) = element::lookup(&self.text[position..position + 2]) {
                    self.pos += 2;
                    return Ok((element, false));
                }
            }
            if let Some(element) = element::lookup(&self.text[position..position + 1]) {
                self.pos += 1;
                return Ok((element, false));
            }
        } else if first.is_ascii_lowercase() {
            let pair = self.text.get(position..position + 2);
            if let Some(pair @ ("se" | "as" | "te")) = pair {
                if let Some(element) = resolve_element(pair) {
                    self.pos += 2;
                    return Ok((element, true));
                }
            }
            if matches!(first, b'b' | b'c' | b'n' | b'o' | b'p' | b's') {
                if let Some(element) = resolve_element(&self.text[position..position + 1]) {
                    self.pos += 1;
                    return Ok((element, true));
                }
            }
        }

        let rest = &self.text[position..];
        let mut symbol: String = rest.chars().take_while(char::is_ascii_alphabetic).collect();
        if symbol.is_empty() {
            symbol = rest.chars().take(1).collect();
        }
        Err(SmilesError::UnknownElement { symbol, position })
    }

    fn chirality(&mut self) -> Chirality {
        if self.peek() != Some(b'@') {
            return Chirality::Unspecified;
        }
        self.pos += 1;
        if self.peek() == Some(b'@') {
            self.pos += 1;
            return Chirality::Clockwise;
        }
        let rest = &self.text[self.pos..];
        let is_class = CHIRAL_CLASSES.iter().any(|c| rest.starts_with(c))
            && rest.as_bytes().get(2).is_some_and(|b| b.is_ascii_digit());
        if is_class {
            self.pos += 2;
            while self.peek().is_some_and(|b| b.is_ascii_digit()) {
                self.pos += 1;
            }
            return Chirality::Other;
        }
        Chirality::CounterClockwise
    }

    fn charge(&mut self) -> Result<i8, SmilesError> {
        let sign = match self.peek() {
            Some(b'+') => 1,
            Some(b'-') => -1,
            _ => return Ok(0),
        };
        let symbol = self.bytes[self.pos];
        self.pos += 1;
        let magnitude = match self.number()? {
            Some(n) => n,
            None => {
                let mut count = 1;
                while self.peek() == Some(symbol) {
                    self.pos += 1;
                    count += 1;
                }
                count
            }
        };
        i8::try_from(magnitude)
            .map(|m| sign * m)
            .map_err(|_| self.unexpected(self.pos - 1))
    }

    /// Reads an unsigned decimal number, if one starts at the cursor.
    fn number(&mut self) -> Result<Option<u32>, SmilesError> {
        let start = self.pos;
        let mut value: u32 = 0;
        while let Some(b) = self.peek().filter(u8::is_ascii_digit) {
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(u32::from(b - b'0')))
                .ok_or_else(|| self.unexpected(self.pos))?;
            self.pos += 1;
        }
        Ok((self.pos > start).then_some(value))
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }
}

/// Maps a written symbol to its element; aromatic symbols are written in lowercase.
fn resolve_element(symbol: &str) -> Option<&'static Element> {
    if symbol == "*" {
        return Some(element::wildcard());
    }
    let mut chars = symbol.chars();
    let first = chars.next()?.to_ascii_uppercase();
    let canonical: String = std::iter::once(first).chain(chars).collect();
    element::lookup(&canonical)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heavy_atoms(smiles: &str) -> usize {
        parse_smiles(smiles).unwrap().atom_count()
    }

    #[test]
    fn parses_simple_chain_with_implicit_hydrogens() {
        let molecule = parse_smiles("CCO").unwrap();
        assert_eq!(molecule.atom_count(), 3);
        assert_eq!(molecule.bond_count(), 2);
        let hydrogens: u32 = molecule
            .atoms_iter()
            .map(|(_, a)| u32::from(a.total_hydrogens()))
            .sum();
        assert_eq!(hydrogens, 6);
    }

    #[test]
    fn parses_branches_and_aromatic_rings() {
        let molecule = parse_smiles("CC(=O)Oc1ccccc1C(=O)O").unwrap();
        assert_eq!(molecule.atom_count(), 13);
        assert_eq!(molecule.rings().len(), 1);
        assert_eq!(
            molecule.atoms_iter().filter(|(_, a)| a.is_aromatic).count(),
            6
        );
    }

    #[test]
    fn two_letter_organic_symbols_are_not_split() {
        let molecule = parse_smiles("ClCBr").unwrap();
        let symbols: Vec<&str> = molecule.atoms_iter().map(|(_, a)| a.symbol()).collect();
        assert_eq!(symbols, vec!["Cl", "C", "Br"]);
    }

    #[test]
    fn bracket_atoms_carry_isotope_charge_hydrogens_and_class() {
        let molecule = parse_smiles("[13CH4]").unwrap();
        let (_, carbon) = molecule.atoms_iter().next().unwrap();
        assert_eq!(carbon.isotope, Some(13));
        assert_eq!(carbon.explicit_hydrogens, 4);
        assert_eq!(carbon.implicit_hydrogens, 0);

        let molecule = parse_smiles("[NH4+]").unwrap();
        let (_, nitrogen) = molecule.atoms_iter().next().unwrap();
        assert_eq!(nitrogen.formal_charge, 1);

        let molecule = parse_smiles("[Fe+2]").unwrap();
        assert_eq!(molecule.atoms_iter().next().unwrap().1.formal_charge, 2);

        let molecule = parse_smiles("[O--]").unwrap();
        assert_eq!(molecule.atoms_iter().next().unwrap().1.formal_charge, -2);

        let molecule = parse_smiles("[CH3:7]C").unwrap();
        assert!(molecule.atoms_iter().any(|(_, a)| a.atom_class == Some(7)));
    }

    #[test]
    fn chirality_tags_are_recorded() {
        let molecule = parse_smiles("[C@@H](F)(Cl)Br").unwrap();
        assert!(
            molecule
                .atoms_iter()
                .any(|(_, a)| a.chirality == Chirality::Clockwise)
        );
        let molecule = parse_smiles("F[C@H](Cl)Br").unwrap();
        assert!(
            molecule
                .atoms_iter()
                .any(|(_, a)| a.chirality == Chirality::CounterClockwise)
        );
        let molecule = parse_smiles("F[C@TH1H](Cl)Br").unwrap();
        assert!(
            molecule
                .atoms_iter()
                .any(|(_, a)| a.chirality == Chirality::Other)
        );
    }

    #[test]
    fn percent_ring_labels_and_ring_bond_symbols() {
        assert_eq!(parse_smiles("C%10CCCCC%10").unwrap().rings().len(), 1);
        let molecule = parse_smiles("C=1CCCCC1").unwrap();
        assert!(
            molecule
                .bonds_iter()
                .any(|(_, b)| b.order == BondOrder::Double && b.is_in_ring)
        );
    }

    #[test]
    fn dot_separates_fragments() {
        let molecule = parse_smiles("[Na+].[Cl-]").unwrap();
        assert_eq!(molecule.atom_count(), 2);
        assert_eq!(molecule.bond_count(), 0);
        assert_eq!(molecule.fragment_count(), 2);
    }

    #[test]
    fn explicit_hydrogen_atoms_are_folded() {
        assert_eq!(heavy_atoms("C[H]"), 1);
        assert_eq!(heavy_atoms("[H]O[H]"), 1);
    }

    #[test]
    fn wildcard_and_stereo_bonds_are_accepted() {
        assert_eq!(heavy_atoms("*CC"), 3);
        assert_eq!(heavy_atoms("F/C=C/F"), 4);
        assert_eq!(heavy_atoms("c1ccsc1"), 5);
        assert_eq!(heavy_atoms("c1cc[se]c1"), 5);
        assert_eq!(heavy_atoms("[nH]1cccc1"), 5);
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(heavy_atoms("  CCO\n"), 3);
    }

    #[test]
    fn syntax_errors_are_reported() {
        assert_eq!(parse_smiles("   ").unwrap_err(), SmilesError::Empty);
        assert_eq!(
            parse_smiles("C(C").unwrap_err(),
            SmilesError::UnbalancedParenthesis { position: 1 }
        );
        assert_eq!(
            parse_smiles("CC)").unwrap_err(),
            SmilesError::UnbalancedParenthesis { position: 2 }
        );
        assert_eq!(
            parse_smiles("C1CC").unwrap_err(),
            SmilesError::UnclosedRing { label: 1 }
        );
        assert_eq!(
            parse_smiles("C=").unwrap_err(),
            SmilesError::DanglingBond { position: 1 }
        );
        assert_eq!(
            parse_smiles("[CH3").unwrap_err(),
            SmilesError::UnterminatedBracket { position: 0 }
        );
        assert!(matches!(
            parse_smiles("CXC"),
            Err(SmilesError::UnknownElement { position: 1, .. })
        ));
        assert!(matches!(
            parse_smiles("[Xx]"),
            Err(SmilesError::UnknownElement { .. })
        ));
        assert_eq!(
            parse_smiles("C()C").unwrap_err(),
            SmilesError::UnexpectedCharacter {
                character: ')',
                position: 2
            }
        );
        assert!(matches!(
            parse_smiles("C?C"),
            Err(SmilesError::UnexpectedCharacter { character: '?', .. })
        ));
    }

    #[test]
    fn bracket_hydrogen_counts_are_bounded() {
        assert_eq!(
            parse_smiles("[CH255]C").unwrap_err(),
            SmilesError::HydrogenCount {
                count: 255,
                position: 3
            }
        );
        assert!(matches!(
            parse_smiles("[NH99999999999]"),
            Err(SmilesError::UnexpectedCharacter { .. })
        ));
        assert!(matches!(
            parse_smiles("[CH10]"),
            Err(SmilesError::HydrogenCount { count: 10, .. })
        ));
        assert_eq!(parse_smiles("[SiH4]").unwrap().atom_count(), 1);
    }

    #[test]
    fn graph_errors_are_reported() {
        assert_eq!(
            parse_smiles("C=1CCC#1").unwrap_err(),
            SmilesError::ConflictingRingBond { label: 1 }
        );
        assert!(matches!(
            parse_smiles("C11"),
            Err(SmilesError::SelfBond { .. })
        ));
        assert!(matches!(
            parse_smiles("C12CC12"),
            Err(SmilesError::DuplicateBond { .. })
        ));
    }

    #[test]
    fn chemistry_errors_are_reported() {
        assert!(matches!(
            parse_smiles("c1cccc1"),
            Err(SmilesError::Sanitize(SanitizeError::Kekulization { .. }))
        ));
        assert_eq!(
            parse_smiles("C(C)(C)(C)(C)C").unwrap_err(),
            SmilesError::Sanitize(SanitizeError::InvalidValence {
                symbol: "C",
                valence: 5
            })
        );
    }
}
