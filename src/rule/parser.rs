//! Rule string parser

use tracing::{debug, trace};

use crate::config::{ParseOptions, Validation};
use crate::error::{Result, RuleError};
use crate::rule::ast::{Connective, ExpressionNode};

/// Parse a rule string into an expression tree using default options
///
/// Condition syntax is not checked here; see [`parse_rule_with`] for
/// eager validation.
pub fn parse_rule(rule_text: &str) -> Result<ExpressionNode> {
    parse_rule_with(rule_text, &ParseOptions::default())
}

/// Parse a rule string into an expression tree
pub fn parse_rule_with(rule_text: &str, options: &ParseOptions) -> Result<ExpressionNode> {
    if rule_text.trim().is_empty() {
        return Err(RuleError::MalformedRule("Empty rule".to_string()));
    }

    let (node, depth) = parse_segment(rule_text, options.max_depth)?;
    if depth > options.max_depth {
        return Err(too_deep(options.max_depth));
    }

    if options.validation == Validation::Eager {
        node.validate()?;
    }

    debug!(rule = rule_text, depth, "parsed rule");
    Ok(node)
}

/// Parse one segment, returning the subtree and its depth.
///
/// The governing connective is split at every occurrence and the parts are
/// linked right to left, giving the same right-leaning chain as splitting at
/// the first occurrence and parsing the remainder again. Parts contain no
/// occurrence of the governing connective, so recursion is at most one level
/// per connective in [`Connective::SCAN_ORDER`].
fn parse_segment(text: &str, max_depth: usize) -> Result<(ExpressionNode, usize)> {
    let Some(connective) = governing_connective(text) else {
        return Ok((ExpressionNode::comparison(text), 1));
    };

    let parts: Vec<&str> = text.split(connective.separator()).collect();
    if parts.len() > max_depth {
        return Err(too_deep(max_depth));
    }
    trace!(%connective, clauses = parts.len(), "split rule segment");

    let mut parts = parts.into_iter().rev();
    let (mut node, mut depth) = parse_segment(parts.next().unwrap_or_default(), max_depth)?;

    for part in parts {
        let (left, left_depth) = parse_segment(part, max_depth)?;
        depth = 1 + depth.max(left_depth);
        if depth > max_depth {
            return Err(too_deep(max_depth));
        }
        node = ExpressionNode::boolean(connective, left, node);
    }

    Ok((node, depth))
}

/// The first connective in [`Connective::SCAN_ORDER`] present anywhere in the
/// text, regardless of position
fn governing_connective(text: &str) -> Option<Connective> {
    Connective::SCAN_ORDER
        .into_iter()
        .find(|connective| text.contains(connective.separator()))
}

pub(crate) fn too_deep(max_depth: usize) -> RuleError {
    RuleError::MalformedRule(format!("Rule nests deeper than {} levels", max_depth))
}
