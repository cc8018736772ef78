//! Rule engine facade applying an [`EngineConfig`]

use tracing::debug;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::record::FieldLookup;
use crate::rule::{combine_rules_with, evaluate_with, parse_rule_with, ExpressionNode};

/// Parses, combines and evaluates rules with a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    config: EngineConfig,
}

impl RuleEngine {
    pub fn new(config: EngineConfig) -> Self {
        debug!(
            validation = ?config.parse.validation,
            short_circuit = config.evaluation.short_circuit,
            "rule engine configured"
        );
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn parse(&self, rule_text: &str) -> Result<ExpressionNode> {
        parse_rule_with(rule_text, &self.config.parse)
    }

    pub fn combine<I>(&self, rules: I) -> Result<Option<ExpressionNode>>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        combine_rules_with(rules, &self.config.parse)
    }

    pub fn evaluate<R>(&self, node: &ExpressionNode, record: &R) -> Result<bool>
    where
        R: FieldLookup + ?Sized,
    {
        evaluate_with(node, record, &self.config.evaluation)
    }

    /// Parse and evaluate a rule in one step
    pub fn check<R>(&self, rule_text: &str, record: &R) -> Result<bool>
    where
        R: FieldLookup + ?Sized,
    {
        let ast = self.parse(rule_text)?;
        self.evaluate(&ast, record)
    }

    /// Combine rules and evaluate them; an empty rule list yields `None`
    pub fn check_all<I, R>(&self, rules: I, record: &R) -> Result<Option<bool>>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        R: FieldLookup + ?Sized,
    {
        match self.combine(rules)? {
            Some(ast) => self.evaluate(&ast, record).map(Some),
            None => Ok(None),
        }
    }
}
