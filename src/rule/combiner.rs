//! Combining several rules into a single tree

use tracing::debug;

use crate::config::ParseOptions;
use crate::error::Result;
use crate::rule::ast::ExpressionNode;
use crate::rule::parser::{parse_rule_with, too_deep};

/// Combine rules with AND using default parse options
///
/// Returns `None` for an empty input.
pub fn combine_rules<I>(rules: I) -> Result<Option<ExpressionNode>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    combine_rules_with(rules, &ParseOptions::default())
}

/// Combine rules with AND, folding left
///
/// `[r1, r2, r3]` becomes `(r1 AND r2) AND r3`. This differs from a single
/// rule string "r1 AND r2 AND r3", which the parser builds leaning right.
pub fn combine_rules_with<I>(rules: I, options: &ParseOptions) -> Result<Option<ExpressionNode>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut rules = rules.into_iter();

    let Some(first) = rules.next() else {
        debug!("no rules to combine");
        return Ok(None);
    };

    let mut combined = parse_rule_with(first.as_ref(), options)?;
    let mut depth = combined.depth();
    let mut count = 1usize;

    for rule in rules {
        let next = parse_rule_with(rule.as_ref(), options)?;
        depth = 1 + depth.max(next.depth());
        if depth > options.max_depth {
            return Err(too_deep(options.max_depth));
        }
        combined = ExpressionNode::and(combined, next);
        count += 1;
    }

    debug!(count, "combined rules");
    Ok(Some(combined))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_MAX_DEPTH;
    use crate::error::RuleError;
    use crate::rule::ast::Connective;
    use crate::rule::parser::parse_rule;

    #[test]
    fn test_combine_empty() {
        assert_eq!(combine_rules(Vec::<&str>::new()).unwrap(), None);
    }

    #[test]
    fn test_combine_single_matches_parse() {
        let rule = "age > 30 AND department = 'Sales'";
        assert_eq!(combine_rules([rule]).unwrap(), Some(parse_rule(rule).unwrap()));
    }

    #[test]
    fn test_combine_leans_left() {
        let combined = combine_rules(["a>1", "b>2", "c>3"]).unwrap().unwrap();
        assert_eq!(combined.to_string(), "((a>1 AND b>2) AND c>3)");

        let (left, right) = combined.children().unwrap();
        assert_eq!(left.connective(), Some(Connective::And));
        assert_eq!(right.to_string(), "c>3");
    }

    #[test]
    fn test_combine_keeps_rule_subtrees() {
        let combined = combine_rules(vec![
            "age > 30 AND department = 'Sales'".to_string(),
            "age < 25 OR department = 'Marketing'".to_string(),
        ])
        .unwrap()
        .unwrap();

        assert_eq!(
            combined.to_string(),
            "((age > 30 AND department = 'Sales') AND (age < 25 OR department = 'Marketing'))"
        );
    }

    #[test]
    fn test_combine_past_depth_limit() {
        let rules = vec!["x > 1"; DEFAULT_MAX_DEPTH];
        assert_eq!(combine_rules(&rules).unwrap().unwrap().depth(), DEFAULT_MAX_DEPTH);

        let rules = vec!["x > 1"; 10_000];
        let err = combine_rules(&rules).unwrap_err();
        assert!(matches!(err, RuleError::MalformedRule(_)));

        // A deep rule late in the list counts toward the combined depth
        let options = ParseOptions {
            max_depth: 4,
            ..Default::default()
        };
        assert!(combine_rules_with(["a>1", "b>1 AND c>1 AND d>1"], &options).is_ok());
        assert!(combine_rules_with(["a>1", "b>1 AND c>1 AND d>1 AND e>1"], &options).is_err());
    }

    #[test]
    fn test_combine_propagates_parse_errors() {
        let err = combine_rules(["a>1", "  "]).unwrap_err();
        assert!(matches!(err, RuleError::MalformedRule(_)));

        let err = combine_rules_with(["a>1", "b 2"], &ParseOptions::eager()).unwrap_err();
        assert!(matches!(err, RuleError::MalformedRule(_)));
    }
}
