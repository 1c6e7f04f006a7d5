use super::element::{self, Element};

/// Tetrahedral (or higher-order) chirality tag as written in a SMILES bracket atom.
///
/// Stereochemistry has no effect on any descriptor; it is retained so that a parsed
/// molecule faithfully reflects its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Chirality {
    #[default]
    Unspecified,
    CounterClockwise,
    Clockwise,
    Other,
}

/// An atom of a small-molecule graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub element: &'static Element,
    /// Explicit mass number, if one was written (`[13C]`).
    pub isotope: Option<u16>,
    pub formal_charge: i8,
    /// Hydrogens written inside a bracket atom or folded in from explicit `[H]` neighbours.
    pub explicit_hydrogens: u8,
    /// Hydrogens implied by the default valence model (unbracketed atoms only).
    pub implicit_hydrogens: u8,
    pub is_aromatic: bool,
    /// Whether the atom was written in brackets; bracket atoms never gain implicit hydrogens.
    pub is_bracketed: bool,
    pub chirality: Chirality,
    pub atom_class: Option<u32>,
}

impl Atom {
    pub fn new(element: &'static Element) -> Self {
        Self {
            element,
            isotope: None,
            formal_charge: 0,
            explicit_hydrogens: 0,
            implicit_hydrogens: 0,
            is_aromatic: false,
            is_bracketed: false,
            chirality: Chirality::Unspecified,
            atom_class: None,
        }
    }

    pub fn aromatic(element: &'static Element) -> Self {
        Self {
            is_aromatic: true,
            ..Self::new(element)
        }
    }

    #[inline]
    pub fn atomic_number(&self) -> u8 {
        self.element.atomic_number
    }

    #[inline]
    pub fn symbol(&self) -> &'static str {
        self.element.symbol
    }

    #[inline]
    pub fn total_hydrogens(&self) -> u8 {
        self.explicit_hydrogens
            .saturating_add(self.implicit_hydrogens)
    }

    pub fn is_hydrogen(&self) -> bool {
        self.atomic_number() == 1
    }

    pub fn is_carbon(&self) -> bool {
        self.atomic_number() == 6
    }

    /// Any heavy atom that is neither carbon nor hydrogen. Wildcards count as heteroatoms.
    pub fn is_heteroatom(&self) -> bool {
        !matches!(self.atomic_number(), 1 | 6)
    }

    /// Mass of the atom itself, without attached hydrogens.
    pub fn mass(&self) -> f64 {
        match self.isotope {
            Some(mass_number) => element::isotope_mass(self.element, mass_number),
            None => self.element.atomic_weight,
        }
    }

    /// Valences permitted for this atom given its charge.
    ///
    /// A charged atom takes the valence list of its isoelectronic neutral element
    /// (N+ behaves like C, O- like F). Elements without a valence model yield an empty list.
    pub fn allowed_valences(&self) -> &'static [u8] {
        if self.element.valences.is_empty() || self.formal_charge == 0 {
            return self.element.valences;
        }
        let effective = i16::from(self.atomic_number()) - i16::from(self.formal_charge);
        u8::try_from(effective)
            .ok()
            .filter(|&z| z > 0)
            .and_then(element::by_atomic_number)
            .map(|e| e.valences)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(symbol: &str) -> Atom {
        Atom::new(element::lookup(symbol).unwrap())
    }

    #[test]
    fn new_atom_has_neutral_defaults() {
        let a = atom("N");
        assert_eq!(a.formal_charge, 0);
        assert_eq!(a.total_hydrogens(), 0);
        assert!(!a.is_aromatic);
        assert!(!a.is_bracketed);
        assert_eq!(a.chirality, Chirality::Unspecified);
    }

    #[test]
    fn heteroatom_classification_excludes_carbon_and_hydrogen() {
        assert!(!atom("C").is_heteroatom());
        assert!(!atom("H").is_heteroatom());
        assert!(atom("N").is_heteroatom());
        assert!(atom("Cl").is_heteroatom());
        assert!(Atom::new(element::wildcard()).is_heteroatom());
    }

    #[test]
    fn mass_uses_isotope_when_present() {
        let mut c = atom("C");
        assert!((c.mass() - 12.011).abs() < 1e-9);
        c.isotope = Some(13);
        assert!((c.mass() - 13.003355).abs() < 1e-9);
    }

    #[test]
    fn charged_atoms_use_isoelectronic_valences() {
        let mut n = atom("N");
        n.formal_charge = 1;
        assert_eq!(n.allowed_valences(), &[4]);

        let mut o = atom("O");
        o.formal_charge = -1;
        assert_eq!(o.allowed_valences(), &[1]);

        let mut c = atom("C");
        c.formal_charge = -1;
        assert_eq!(c.allowed_valences(), &[3]);
    }

    #[test]
    fn metals_have_no_valence_model() {
        let mut na = atom("Na");
        assert!(na.allowed_valences().is_empty());
        na.formal_charge = 1;
        assert!(na.allowed_valences().is_empty());
    }
}
