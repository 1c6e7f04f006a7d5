use thiserror::Error;

use super::config::ConfigError;
use crate::core::io::table::TableError;
use crate::core::rules::RuleId;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Input error: {source}")]
    Input {
        #[from]
        source: TableError,
    },

    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("No valid compounds found after screening using {rule}.")]
    EmptyResult { rule: RuleId },

    #[error("Screening was cancelled before completion")]
    Cancelled,

    #[error("Internal logic error: {0}")]
    Internal(String),
}
