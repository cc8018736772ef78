//! Engine configuration
//!
//! Options are plain serde structs so they can be embedded in a host
//! application's own configuration file or loaded from JSON directly.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// When condition syntax is checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Validation {
    /// Leaves are stored as raw text and decomposed during evaluation
    #[default]
    Deferred,
    /// Every leaf is decomposed while parsing; malformed conditions fail early
    Eager,
}

/// Default bound on expression tree depth
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Options applied by the parser and combiner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    pub validation: Validation,
    /// Deepest tree the parser or combiner will build. Each clause of a
    /// chained rule and each combined rule adds a level; evaluation recurses
    /// once per level.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            validation: Validation::Deferred,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseOptions {
    pub fn eager() -> Self {
        Self {
            validation: Validation::Eager,
            ..Default::default()
        }
    }
}

/// Options applied by the evaluator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationOptions {
    /// Skip the right child of a boolean node once the left child decides it.
    /// When disabled both children are always evaluated, so errors on either
    /// side surface.
    pub short_circuit: bool,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self {
            short_circuit: true,
        }
    }
}

impl EvaluationOptions {
    pub fn exhaustive() -> Self {
        Self {
            short_circuit: false,
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub parse: ParseOptions,
    pub evaluation: EvaluationOptions,
}

impl EngineConfig {
    /// Load configuration from a JSON document; missing keys take defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuleError;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.parse.validation, Validation::Deferred);
        assert_eq!(config.parse.max_depth, DEFAULT_MAX_DEPTH);
        assert!(config.evaluation.short_circuit);
    }

    #[test]
    fn test_from_json_max_depth() {
        let config = EngineConfig::from_json(r#"{"parse": {"max_depth": 16}}"#).unwrap();
        assert_eq!(config.parse.max_depth, 16);
        assert_eq!(config.parse.validation, Validation::Deferred);
    }

    #[test]
    fn test_from_json_partial() {
        let config = EngineConfig::from_json(r#"{"parse": {"validation": "eager"}}"#).unwrap();
        assert_eq!(config.parse, ParseOptions::eager());
        assert_eq!(config.evaluation, EvaluationOptions::default());

        let config = EngineConfig::from_json(r#"{"evaluation": {"short_circuit": false}}"#).unwrap();
        assert_eq!(config.parse.validation, Validation::Deferred);
        assert_eq!(config.evaluation, EvaluationOptions::exhaustive());
    }

    #[test]
    fn test_from_json_empty_object() {
        assert_eq!(EngineConfig::from_json("{}").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_from_json_rejects_unknown_mode() {
        let err = EngineConfig::from_json(r#"{"parse": {"validation": "lazy"}}"#).unwrap_err();
        assert!(matches!(err, RuleError::InvalidInput(_)));
    }
}
