//! Parsed rule cache keyed by rule text

use ahash::AHashMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::error::Result;
use crate::record::FieldLookup;
use crate::rule::ast::ExpressionNode;
use crate::rule::evaluator::evaluate;
use crate::rule::parser::parse_rule;

/// Most rule texts the cache holds before it is emptied
pub const RULE_CACHE_CAPACITY: usize = 4096;

/// Global rule cache, shared by every caller in the process
static RULE_CACHE: Lazy<RwLock<AHashMap<String, Arc<ExpressionNode>>>> =
    Lazy::new(|| RwLock::new(AHashMap::with_capacity(256)));

/// Get or parse a rule, using the cache for repeated rule text
///
/// Rules are parsed with default options. Parse failures are not cached.
/// Once [`RULE_CACHE_CAPACITY`] distinct rules are held, the next new rule
/// empties the cache before it is inserted, so memory stays bounded when
/// callers feed an open-ended stream of rule text.
#[inline]
pub fn get_or_parse(rule_text: &str) -> Result<Arc<ExpressionNode>> {
    {
        let cache = RULE_CACHE.read();
        if let Some(ast) = cache.get(rule_text) {
            return Ok(Arc::clone(ast));
        }
    }

    let ast = Arc::new(parse_rule(rule_text)?);

    let mut cache = RULE_CACHE.write();
    if cache.len() >= RULE_CACHE_CAPACITY && !cache.contains_key(rule_text) {
        debug!(capacity = RULE_CACHE_CAPACITY, "rule cache full, clearing");
        cache.clear();
    }
    // Another thread may have parsed the same rule meanwhile; keep the first
    let cached = cache
        .entry(rule_text.to_string())
        .or_insert_with(|| Arc::clone(&ast));
    trace!(rule = rule_text, "cached rule");
    Ok(Arc::clone(cached))
}

/// Check a rule against a record, using the cached tree
#[inline]
pub fn check_rule<R>(rule_text: &str, record: &R) -> Result<bool>
where
    R: FieldLookup + ?Sized,
{
    let ast = get_or_parse(rule_text)?;
    evaluate(&ast, record)
}

/// Clear the rule cache
pub fn clear_cache() {
    RULE_CACHE.write().clear();
}

/// Number of cached rules
pub fn cache_size() -> usize {
    RULE_CACHE.read().len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuleError;
    use crate::record::Record;

    // The cache is process-wide, so these tests use rule text no other test
    // touches and compare membership rather than absolute sizes.

    fn is_cached(rule_text: &str) -> bool {
        RULE_CACHE.read().contains_key(rule_text)
    }

    #[test]
    fn test_cache_hit_returns_same_tree() {
        let rule = "cache_hit_age > 30 AND cache_hit_dept = 'Sales'";

        let first = get_or_parse(rule).unwrap();
        let second = get_or_parse(rule).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(is_cached(rule));
    }

    #[test]
    fn test_check_rule() {
        let record = Record::new().with("cache_check_age", 35);

        assert!(check_rule("cache_check_age > 30", &record).unwrap());
        assert!(!check_rule("cache_check_age > 30 AND cache_check_age < 32", &record).unwrap());
        assert!(cache_size() >= 2);
    }

    #[test]
    fn test_parse_failure_not_cached() {
        let err = get_or_parse("   ").unwrap_err();
        assert!(matches!(err, RuleError::MalformedRule(_)));
        assert!(!is_cached("   "));
    }

    #[test]
    fn test_evaluation_errors_still_cache_tree() {
        let rule = "cache_missing_field > 1";
        let err = check_rule(rule, &Record::new()).unwrap_err();
        assert_eq!(err, RuleError::UnknownField("cache_missing_field".to_string()));
        assert!(is_cached(rule));
    }
}
