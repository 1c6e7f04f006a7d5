use crate::core::descriptors::Descriptor;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown rule set '{0}'. Expected one of: lipinski, congreve, muegge, veber")]
pub struct UnknownRuleError(pub String);

/// A threshold test applied to one descriptor value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Comparison {
    LessThan(f64),
    AtMost(f64),
    GreaterThan(f64),
    /// Inclusive on both ends.
    Between(f64, f64),
}

impl Comparison {
    pub fn holds(self, value: f64) -> bool {
        match self {
            Self::LessThan(limit) => value < limit,
            Self::AtMost(limit) => value <= limit,
            Self::GreaterThan(limit) => value > limit,
            Self::Between(low, high) => (low..=high).contains(&value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Criterion {
    /// Column label shown in compliance tables, e.g. `MW <= 500`.
    pub label: &'static str,
    pub descriptor: Descriptor,
    pub comparison: Comparison,
}

impl Criterion {
    const fn new(label: &'static str, descriptor: Descriptor, comparison: Comparison) -> Self {
        Self {
            label,
            descriptor,
            comparison,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    All,
    AtLeast(usize),
}

impl Aggregation {
    pub fn accepts(self, passed: usize, total: usize) -> bool {
        match self {
            Self::All => passed == total,
            Self::AtLeast(n) => passed >= n,
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all criteria must pass"),
            Self::AtLeast(n) => write!(f, "at least {n} criteria must pass"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleDefinition {
    pub id: RuleId,
    pub name: &'static str,
    pub criteria: &'static [Criterion],
    pub aggregation: Aggregation,
}

impl RuleDefinition {
    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.criteria.iter().map(|c| c.label)
    }
}

use Comparison::*;
use Descriptor::*;

static LIPINSKI: RuleDefinition = RuleDefinition {
    id: RuleId::Lipinski,
    name: "Lipinski's Rule of Five",
    criteria: &[
        Criterion::new("MW <= 500", MolecularWeight, AtMost(500.0)),
        Criterion::new("HBA <= 10", HBondAcceptors, AtMost(10.0)),
        Criterion::new("HBD <= 5", HBondDonors, AtMost(5.0)),
        Criterion::new("LogP <= 5", LogP, AtMost(5.0)),
    ],
    aggregation: Aggregation::AtLeast(3),
};

static CONGREVE: RuleDefinition = RuleDefinition {
    id: RuleId::Congreve,
    name: "Miles Congreve et al. RO3",
    criteria: &[
        Criterion::new("MW < 300", MolecularWeight, LessThan(300.0)),
        Criterion::new("ROTB <= 3", RotatableBonds, AtMost(3.0)),
        Criterion::new("HBA <= 3", HBondAcceptors, AtMost(3.0)),
        Criterion::new("HBD <= 3", HBondDonors, AtMost(3.0)),
        Criterion::new("LogP <= 3", LogP, AtMost(3.0)),
        Criterion::new("PSA <= 60", PolarSurfaceArea, AtMost(60.0)),
    ],
    aggregation: Aggregation::All,
};

static MUEGGE: RuleDefinition = RuleDefinition {
    id: RuleId::Muegge,
    name: "Muegge method",
    criteria: &[
        Criterion::new("MW in [200, 600]", MolecularWeight, Between(200.0, 600.0)),
        Criterion::new("LogP in [-2, 5]", LogP, Between(-2.0, 5.0)),
        Criterion::new("PSA <= 150", PolarSurfaceArea, AtMost(150.0)),
        Criterion::new("Rings <= 7", RingCount, AtMost(7.0)),
        Criterion::new("Carbons > 4", CarbonCount, GreaterThan(4.0)),
        Criterion::new("Heteroatoms > 1", HeteroatomCount, GreaterThan(1.0)),
        Criterion::new("ROTB <= 15", RotatableBonds, AtMost(15.0)),
        Criterion::new("HBA <= 10", HBondAcceptors, AtMost(10.0)),
        Criterion::new("HBD <= 5", HBondDonors, AtMost(5.0)),
    ],
    aggregation: Aggregation::All,
};

static VEBER: RuleDefinition = RuleDefinition {
    id: RuleId::Veber,
    name: "The rules of Veber et al.",
    criteria: &[
        Criterion::new("ROTB <= 10", RotatableBonds, AtMost(10.0)),
        Criterion::new("PSA <= 140", PolarSurfaceArea, AtMost(140.0)),
    ],
    aggregation: Aggregation::All,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RuleId {
    #[default]
    Lipinski,
    Congreve,
    Muegge,
    Veber,
}

static RULE_ALIASES: phf::Map<&'static str, RuleId> = phf::phf_map! {
    "lipinski" => RuleId::Lipinski,
    "ro5" => RuleId::Lipinski,
    "lipinski's rule of five" => RuleId::Lipinski,
    "congreve" => RuleId::Congreve,
    "ro3" => RuleId::Congreve,
    "miles congreve et al. ro3" => RuleId::Congreve,
    "muegge" => RuleId::Muegge,
    "muegge method" => RuleId::Muegge,
    "veber" => RuleId::Veber,
    "the rules of veber et al." => RuleId::Veber,
};

impl RuleId {
    pub const ALL: [RuleId; 4] = [Self::Lipinski, Self::Congreve, Self::Muegge, Self::Veber];

    pub fn definition(self) -> &'static RuleDefinition {
        match self {
            Self::Lipinski => &LIPINSKI,
            Self::Congreve => &CONGREVE,
            Self::Muegge => &MUEGGE,
            Self::Veber => &VEBER,
        }
    }

    /// Human-readable rule name.
    pub fn name(self) -> &'static str {
        self.definition().name
    }

    /// Short identifier used on the command line and in configuration files.
    pub fn key(self) -> &'static str {
        match self {
            Self::Lipinski => "lipinski",
            Self::Congreve => "congreve",
            Self::Muegge => "muegge",
            Self::Veber => "veber",
        }
    }

    /// The rule name with spaces replaced by underscores, used as a file name prefix.
    pub fn file_stem(self) -> String {
        self.name().replace(' ', "_")
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RuleId {
    type Err = UnknownRuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RULE_ALIASES
            .get(s.trim().to_ascii_lowercase().as_str())
            .copied()
            .ok_or_else(|| UnknownRuleError(s.to_string()))
    }
}

impl Serialize for RuleId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

impl<'de> Deserialize<'de> for RuleId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_ids_parse_from_keys_and_names() {
        assert_eq!("lipinski".parse::<RuleId>().unwrap(), RuleId::Lipinski);
        assert_eq!("RO3".parse::<RuleId>().unwrap(), RuleId::Congreve);
        assert_eq!(" Muegge ".parse::<RuleId>().unwrap(), RuleId::Muegge);
        for id in RuleId::ALL {
            assert_eq!(id.name().parse::<RuleId>().unwrap(), id);
            assert_eq!(id.key().parse::<RuleId>().unwrap(), id);
        }
        assert!("ghose".parse::<RuleId>().is_err());
    }

    #[test]
    fn every_definition_carries_its_own_id() {
        for id in RuleId::ALL {
            assert_eq!(id.definition().id, id);
        }
    }

    #[test]
    fn criteria_keep_their_declared_order() {
        let labels: Vec<_> = RuleId::Congreve.definition().labels().collect();
        assert_eq!(
            labels,
            [
                "MW < 300",
                "ROTB <= 3",
                "HBA <= 3",
                "HBD <= 3",
                "LogP <= 3",
                "PSA <= 60"
            ]
        );
        assert_eq!(RuleId::Muegge.definition().criteria.len(), 9);
        assert_eq!(RuleId::Veber.definition().criteria.len(), 2);
    }

    #[test]
    fn comparisons_respect_strictness() {
        assert!(LessThan(300.0).holds(299.9));
        assert!(!LessThan(300.0).holds(300.0));
        assert!(AtMost(5.0).holds(5.0));
        assert!(!GreaterThan(4.0).holds(4.0));
        assert!(Between(-2.0, 5.0).holds(-2.0));
        assert!(Between(-2.0, 5.0).holds(5.0));
        assert!(!Between(200.0, 600.0).holds(600.01));
    }

    #[test]
    fn file_stems_replace_spaces() {
        assert_eq!(RuleId::Lipinski.file_stem(), "Lipinski's_Rule_of_Five");
        assert_eq!(RuleId::Veber.file_stem(), "The_rules_of_Veber_et_al.");
    }
}
