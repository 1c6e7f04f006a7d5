use super::definitions::RuleDefinition;
use crate::core::descriptors::DescriptorVector;
use serde::Serialize;

/// Criterion label to pass/fail, in the rule's declared order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ComplianceMap(Vec<(&'static str, bool)>);

impl ComplianceMap {
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, bool)> + '_ {
        self.0.iter().copied()
    }

    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|(label, _)| *label)
    }

    pub fn values(&self) -> impl Iterator<Item = bool> + '_ {
        self.0.iter().map(|(_, passed)| *passed)
    }

    pub fn get(&self, label: &str) -> Option<bool> {
        self.0
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, passed)| *passed)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    pub compliance: ComplianceMap,
    pub accepted: bool,
}

impl Evaluation {
    pub fn passed(&self) -> usize {
        self.compliance.values().filter(|&p| p).count()
    }

    pub fn violations(&self) -> Vec<&'static str> {
        self.compliance
            .iter()
            .filter(|(_, passed)| !passed)
            .map(|(label, _)| label)
            .collect()
    }
}

/// Applies every criterion of `rule` to `descriptors` and aggregates the outcome.
pub fn evaluate(descriptors: &DescriptorVector, rule: &RuleDefinition) -> Evaluation {
    let compliance = ComplianceMap(
        rule.criteria
            .iter()
            .map(|c| (c.label, c.comparison.holds(descriptors.get(c.descriptor))))
            .collect(),
    );
    let passed = compliance.values().filter(|&p| p).count();
    Evaluation {
        accepted: rule.aggregation.accepts(passed, compliance.len()),
        compliance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rules::RuleId;

    fn vector() -> DescriptorVector {
        DescriptorVector {
            molecular_weight: 250.0,
            h_bond_acceptors: 2,
            h_bond_donors: 1,
            logp: 1.5,
            rotatable_bonds: 2,
            polar_surface_area: 40.0,
            ring_count: 1,
            carbon_count: 12,
            heteroatom_count: 3,
        }
    }

    #[test]
    fn lipinski_boundaries_are_inclusive() {
        let d = DescriptorVector {
            molecular_weight: 500.0,
            h_bond_acceptors: 10,
            h_bond_donors: 5,
            logp: 5.0,
            ..vector()
        };
        let eval = evaluate(&d, RuleId::Lipinski.definition());
        assert!(eval.compliance.values().all(|p| p));
        assert!(eval.accepted);
    }

    #[test]
    fn lipinski_tolerates_one_violation() {
        let one = DescriptorVector {
            molecular_weight: 650.0,
            ..vector()
        };
        let eval = evaluate(&one, RuleId::Lipinski.definition());
        assert_eq!(eval.passed(), 3);
        assert_eq!(eval.violations(), ["MW <= 500"]);
        assert!(eval.accepted);

        let two = DescriptorVector {
            molecular_weight: 650.0,
            logp: 6.2,
            ..vector()
        };
        assert!(!evaluate(&two, RuleId::Lipinski.definition()).accepted);
    }

    #[test]
    fn rule_of_three_weight_is_strict() {
        let d = DescriptorVector {
            molecular_weight: 299.9,
            rotatable_bonds: 3,
            h_bond_acceptors: 3,
            h_bond_donors: 3,
            logp: 3.0,
            polar_surface_area: 60.0,
            ..vector()
        };
        assert!(evaluate(&d, RuleId::Congreve.definition()).accepted);

        let at_limit = DescriptorVector {
            molecular_weight: 300.0,
            ..d
        };
        let eval = evaluate(&at_limit, RuleId::Congreve.definition());
        assert_eq!(eval.compliance.get("MW < 300"), Some(false));
        assert!(!eval.accepted);
    }

    #[test]
    fn muegge_requires_every_criterion() {
        let d = vector();
        assert!(evaluate(&d, RuleId::Muegge.definition()).accepted);

        let few_carbons = DescriptorVector {
            carbon_count: 4,
            ..d
        };
        let eval = evaluate(&few_carbons, RuleId::Muegge.definition());
        assert_eq!(eval.violations(), ["Carbons > 4"]);
        assert!(!eval.accepted);
    }

    #[test]
    fn veber_checks_flexibility_and_polarity() {
        let d = DescriptorVector {
            rotatable_bonds: 11,
            ..vector()
        };
        assert!(!evaluate(&d, RuleId::Veber.definition()).accepted);
        assert!(evaluate(&vector(), RuleId::Veber.definition()).accepted);
    }

    #[test]
    fn compliance_order_follows_definition() {
        for id in RuleId::ALL {
            let eval = evaluate(&vector(), id.definition());
            let labels: Vec<_> = eval.compliance.labels().collect();
            let declared: Vec<_> = id.definition().labels().collect();
            assert_eq!(labels, declared);
        }
    }
}
