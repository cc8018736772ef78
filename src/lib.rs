//! Rule AST - boolean eligibility rules parsed into an expression tree
//!
//! Rules such as `age > 30 AND department = 'Sales'` are parsed into an
//! [`ExpressionNode`] tree, optionally combined with other rules, and
//! evaluated against a [`Record`] of named fields.
//!
//! ```
//! use rule_ast::{combine_rules, evaluate, parse_rule, Record};
//!
//! let record = Record::new().with("age", 35).with("department", "Sales");
//!
//! let rule = parse_rule("age > 30 AND department = 'Sales'")?;
//! assert!(evaluate(&rule, &record)?);
//!
//! let combined = combine_rules([
//!     "age > 30 AND department = 'Sales'",
//!     "age < 25 AND department = 'Marketing'",
//! ])?
//! .expect("non-empty rule list");
//! assert!(!evaluate(&combined, &record)?);
//! # Ok::<(), rule_ast::RuleError>(())
//! ```
//!
//! Python bindings are available behind the `python` feature.

pub mod config;
pub mod engine;
pub mod error;
pub mod record;
pub mod rule;

#[cfg(feature = "python")]
mod python;

pub use config::{EngineConfig, EvaluationOptions, ParseOptions, Validation, DEFAULT_MAX_DEPTH};
pub use engine::RuleEngine;
pub use error::{Result, RuleError};
pub use record::{FieldLookup, Record, Value};
pub use rule::{
    check_rule, combine_rules, combine_rules_with, evaluate, evaluate_with, parse_rule,
    parse_rule_with, Comparison, Condition, Connective, ExpressionNode, Operator,
};
