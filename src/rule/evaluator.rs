//! Rule evaluator

use tracing::trace;

use crate::config::EvaluationOptions;
use crate::error::{Result, RuleError};
use crate::record::{FieldLookup, Value};
use crate::rule::ast::{Comparison, Connective, ExpressionNode};
use crate::rule::condition::{Condition, Operator};

/// Evaluate a tree against a record, short-circuiting boolean nodes
pub fn evaluate<R>(node: &ExpressionNode, record: &R) -> Result<bool>
where
    R: FieldLookup + ?Sized,
{
    evaluate_with(node, record, &EvaluationOptions::default())
}

/// Evaluate a tree against a record
///
/// Recurses once per tree level. Trees built by the parser, the combiner and
/// [`ExpressionNode::from_json`] are bounded by their maximum depth; trees
/// assembled by hand with [`ExpressionNode::boolean`] are not.
pub fn evaluate_with<R>(node: &ExpressionNode, record: &R, options: &EvaluationOptions) -> Result<bool>
where
    R: FieldLookup + ?Sized,
{
    match node {
        ExpressionNode::Comparison(cmp) => evaluate_comparison(cmp, record),
        ExpressionNode::Boolean {
            connective,
            left,
            right,
        } => {
            let left = evaluate_with(left, record, options)?;
            let decided = match connective {
                Connective::And => !left,
                Connective::Or => left,
            };
            if decided && options.short_circuit {
                return Ok(left);
            }

            let right = evaluate_with(right, record, options)?;
            Ok(match connective {
                Connective::And => left && right,
                Connective::Or => left || right,
            })
        }
    }
}

fn evaluate_comparison<R>(cmp: &Comparison, record: &R) -> Result<bool>
where
    R: FieldLookup + ?Sized,
{
    let cond = cmp.condition()?;
    let actual = record
        .field(&cond.field)
        .ok_or_else(|| RuleError::UnknownField(cond.field.clone()))?;

    let result = check_condition(&cond, actual)?;
    trace!(condition = cmp.text(), result, "evaluated comparison");
    Ok(result)
}

fn check_condition(cond: &Condition, actual: &Value) -> Result<bool> {
    if cond.operator == Operator::Equal {
        // Text equality only; an integer field never equals a text literal
        return Ok(match (actual, &cond.literal) {
            (Value::Text(actual), Value::Text(expected)) => actual == expected,
            _ => false,
        });
    }

    let expected = cond.literal.as_integer().ok_or_else(|| RuleError::TypeMismatch {
        field: cond.field.clone(),
        expected: "integer literal".to_string(),
        actual: cond.literal.to_string(),
    })?;

    let actual = actual.as_integer().ok_or_else(|| RuleError::TypeMismatch {
        field: cond.field.clone(),
        expected: "integer".to_string(),
        actual: actual.type_name().to_string(),
    })?;

    Ok(cond.operator.compare_integers(actual, expected))
}
