//! Condition decomposition
//!
//! A comparison leaf stores its text unvalidated. Splitting it into
//! field, operator and literal happens here, on demand.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, RuleError};
use crate::record::Value;

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// Greater than (>)
    Greater,
    /// Less than (<)
    Less,
    /// Greater than or equal (>=)
    GreaterEqual,
    /// Less than or equal (<=)
    LessEqual,
    /// Equal (=)
    Equal,
}

impl Operator {
    /// Order in which condition text is scanned for operators.
    ///
    /// Single-character `>` and `<` come before `>=` and `<=`, so a condition
    /// written with `>=` splits on `>` and keeps the `=` on the literal side:
    /// "score>=90" becomes field "score", operator `>`, literal "=90".
    pub const SCAN_ORDER: [Operator; 5] = [
        Operator::Greater,
        Operator::Less,
        Operator::GreaterEqual,
        Operator::LessEqual,
        Operator::Equal,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Greater => ">",
            Operator::Less => "<",
            Operator::GreaterEqual => ">=",
            Operator::LessEqual => "<=",
            Operator::Equal => "=",
        }
    }

    /// Whether the operator compares integers
    pub fn is_numeric(self) -> bool {
        !matches!(self, Operator::Equal)
    }

    /// Apply a numeric operator
    #[inline]
    pub fn compare_integers(self, actual: i64, expected: i64) -> bool {
        match self {
            Operator::Greater => actual > expected,
            Operator::Less => actual < expected,
            Operator::GreaterEqual => actual >= expected,
            Operator::LessEqual => actual <= expected,
            Operator::Equal => actual == expected,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A decomposed condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub field: String,
    pub operator: Operator,
    /// `Integer` when a numeric operator's literal parses as one, otherwise
    /// the literal text (quotes stripped for `=`)
    pub literal: Value,
}

impl Condition {
    /// Decompose condition text such as "age > 30" or "department = 'Sales'"
    pub fn parse(text: &str) -> Result<Condition> {
        let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();

        let operator = Operator::SCAN_ORDER
            .into_iter()
            .find(|op| compact.contains(op.symbol()))
            .ok_or_else(|| {
                RuleError::MalformedRule(format!("No operator found in: '{}'", text))
            })?;

        let mut parts = compact.split(operator.symbol());
        let (field, literal) = match (parts.next(), parts.next(), parts.next()) {
            (Some(field), Some(literal), None) => (field, literal),
            _ => {
                return Err(RuleError::MalformedRule(format!(
                    "Operator '{}' appears more than once in: '{}'",
                    operator, text
                )))
            }
        };

        let literal = if operator.is_numeric() {
            match literal.parse::<i64>() {
                Ok(i) => Value::Integer(i),
                Err(_) => Value::Text(literal.to_string()),
            }
        } else {
            Value::Text(literal.trim_matches('\'').to_string())
        };

        Ok(Condition {
            field: field.to_string(),
            operator,
            literal,
        })
    }
}
