//! # Workflows Module
//!
//! Top-level entry points of the library. A workflow takes input rows (or a table on
//! disk) and a [`ScreeningConfig`](crate::engine::config::ScreeningConfig), runs
//! deduplication, descriptor calculation, optional name resolution and rule evaluation,
//! and returns one immutable
//! [`ScreeningOutcome`](crate::engine::results::ScreeningOutcome).
//!
//! - **Screening Workflow** ([`screen`]) - Batch screening and rule re-evaluation

pub mod screen;
