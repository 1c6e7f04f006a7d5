use crate::core::rules::{RuleDefinition, RuleId};
use thiserror::Error;

pub const DEFAULT_CHUNK_SIZE: usize = 30;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidParameter {
        parameter: &'static str,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreeningConfig {
    pub rule: RuleId,
    /// Rows per compliance page.
    pub chunk_size: usize,
    /// Whether display names are looked up through the name resolver.
    pub resolve_names: bool,
}

impl ScreeningConfig {
    pub fn rule_definition(&self) -> &'static RuleDefinition {
        self.rule.definition()
    }
}

#[derive(Default)]
pub struct ScreeningConfigBuilder {
    rule: Option<RuleId>,
    chunk_size: Option<usize>,
    resolve_names: Option<bool>,
}

impl ScreeningConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(mut self, rule: RuleId) -> Self {
        self.rule = Some(rule);
        self
    }
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = Some(size);
        self
    }
    pub fn resolve_names(mut self, enabled: bool) -> Self {
        self.resolve_names = Some(enabled);
        self
    }

    pub fn build(self) -> Result<ScreeningConfig, ConfigError> {
        let chunk_size = self.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE);
        if chunk_size == 0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "chunk_size",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(ScreeningConfig {
            rule: self.rule.ok_or(ConfigError::MissingParameter("rule"))?,
            chunk_size,
            resolve_names: self.resolve_names.unwrap_or(false),
        })
    }
}
