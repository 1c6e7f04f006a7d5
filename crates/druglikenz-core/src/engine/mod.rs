//! # Engine Module
//!
//! Support layer for screening runs: everything a workflow needs besides the stateless
//! chemistry in [`crate::core`].
//!
//! - **Configuration** ([`config`]) - Screening parameters and their builder
//! - **Error Handling** ([`error`]) - Run-level failures surfaced to callers
//! - **Progress Monitoring** ([`progress`]) - Phase and task progress callbacks
//! - **Cancellation** ([`cancel`]) - Cooperative cancellation of a running screen
//! - **Name Resolution** ([`resolver`]) - Optional structure-to-name lookup capability
//! - **Results** ([`results`]) - Structure records, result tables and run statistics
//! - **Projections** ([`projection`]) - Compliance-only tables and their pages
//! - **Export** ([`export`]) - CSV writers for accepted candidates and compliance pages
//!
//! Row-level problems (unparseable structures, failed name lookups) never become
//! [`error::EngineError`]s; they are absorbed into [`results::ScreeningStats`].

pub mod cancel;
pub mod config;
pub mod error;
pub mod export;
pub mod progress;
pub mod projection;
pub mod resolver;
pub mod results;
