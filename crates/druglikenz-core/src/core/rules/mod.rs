//! # Rule Sets
//!
//! Drug-likeness rule sets expressed as data. Each [`definitions::RuleDefinition`] is an
//! ordered list of threshold criteria over a
//! [`DescriptorVector`](crate::core::descriptors::DescriptorVector) plus an aggregation
//! policy; [`evaluator::evaluate`] is the single interpreter for all of them.
//!
//! - [`definitions`] - The four built-in rule sets and their identifiers
//! - [`evaluator`] - Criterion evaluation and accept/reject aggregation

pub mod definitions;
pub mod evaluator;

pub use definitions::{Aggregation, Comparison, Criterion, RuleDefinition, RuleId};
pub use evaluator::{ComplianceMap, Evaluation, evaluate};
