use crate::cli::RulesArgs;
use crate::error::{CliError, Result};
use crate::utils::parser;
use druglikenz::core::rules::RuleId;
use std::fmt::Write;

/// A rule set's name, acceptance policy and criteria as indented text.
pub fn describe(id: RuleId) -> String {
    let rule = id.definition();
    let mut out = String::new();
    let _ = writeln!(out, "{} [{}]", rule.name, id.key());
    let _ = writeln!(out, "  Acceptance: {}", rule.aggregation);
    let _ = writeln!(out, "  Criteria ({}):", rule.criteria.len());
    for label in rule.labels() {
        let _ = writeln!(out, "    - {label}");
    }
    out
}

pub fn run(args: RulesArgs) -> Result<()> {
    let ids = match args.rule.as_deref() {
        Some(raw) => vec![parser::parse_rule(raw).map_err(|e| CliError::Argument(e.to_string()))?],
        None => RuleId::ALL.to_vec(),
    };
    let blocks: Vec<_> = ids.into_iter().map(describe).collect();
    print!("{}", blocks.join("\n"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lipinski_description() {
        assert_eq!(
            describe(RuleId::Lipinski),
            "Lipinski's Rule of Five [lipinski]\n  Acceptance: at least 3 criteria must pass\n  Criteria (4):\n    - MW <= 500\n    - HBA <= 10\n    - HBD <= 5\n    - LogP <= 5\n"
        );
    }

    #[test]
    fn every_rule_lists_all_criteria() {
        for id in RuleId::ALL {
            let text = describe(id);
            assert_eq!(
                text.lines().filter(|l| l.starts_with("    - ")).count(),
                id.definition().criteria.len()
            );
        }
    }

    #[test]
    fn unknown_rule_is_an_argument_error() {
        let result = run(RulesArgs {
            rule: Some("ghose".to_string()),
        });
        assert!(matches!(result, Err(CliError::Argument(_))));
    }
}
