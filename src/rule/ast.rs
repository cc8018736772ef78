//! Expression tree for rules

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::DEFAULT_MAX_DEPTH;
use crate::error::{Result, RuleError};
use crate::rule::condition::Condition;

/// Boolean connective joining two subtrees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Connective {
    And,
    Or,
}

impl Connective {
    /// Order in which rule text is scanned for connectives.
    /// AND is checked first and governs the split whenever it is present.
    pub const SCAN_ORDER: [Connective; 2] = [Connective::And, Connective::Or];

    pub fn keyword(self) -> &'static str {
        match self {
            Connective::And => "AND",
            Connective::Or => "OR",
        }
    }

    /// Separator a connective must appear as in rule text
    pub fn separator(self) -> &'static str {
        match self {
            Connective::And => " AND ",
            Connective::Or => " OR ",
        }
    }
}

impl fmt::Display for Connective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Leaf holding a single unvalidated condition such as "age > 30"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    condition: String,
}

impl Comparison {
    pub fn new(condition: &str) -> Self {
        Self {
            condition: condition.trim().to_string(),
        }
    }

    /// Raw condition text as written in the rule
    pub fn text(&self) -> &str {
        &self.condition
    }

    /// Decompose the stored text into field, operator and literal
    pub fn condition(&self) -> Result<Condition> {
        Condition::parse(&self.condition)
    }
}

/// AST node for rule expressions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExpressionNode {
    /// Single condition like "age > 30"
    Comparison(Comparison),
    /// Two subtrees joined by AND / OR
    Boolean {
        connective: Connective,
        left: Box<ExpressionNode>,
        right: Box<ExpressionNode>,
    },
}

impl ExpressionNode {
    pub fn comparison(condition: &str) -> Self {
        ExpressionNode::Comparison(Comparison::new(condition))
    }

    pub fn boolean(connective: Connective, left: ExpressionNode, right: ExpressionNode) -> Self {
        ExpressionNode::Boolean {
            connective,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn and(left: ExpressionNode, right: ExpressionNode) -> Self {
        Self::boolean(Connective::And, left, right)
    }

    pub fn or(left: ExpressionNode, right: ExpressionNode) -> Self {
        Self::boolean(Connective::Or, left, right)
    }

    pub fn as_comparison(&self) -> Option<&Comparison> {
        match self {
            ExpressionNode::Comparison(cmp) => Some(cmp),
            ExpressionNode::Boolean { .. } => None,
        }
    }

    pub fn connective(&self) -> Option<Connective> {
        match self {
            ExpressionNode::Comparison(_) => None,
            ExpressionNode::Boolean { connective, .. } => Some(*connective),
        }
    }

    /// Left and right children of a boolean node
    pub fn children(&self) -> Option<(&ExpressionNode, &ExpressionNode)> {
        match self {
            ExpressionNode::Comparison(_) => None,
            ExpressionNode::Boolean { left, right, .. } => Some((left, right)),
        }
    }

    /// All comparison leaves, left to right
    pub fn comparisons(&self) -> Vec<&Comparison> {
        let mut leaves = Vec::new();
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            match node {
                ExpressionNode::Comparison(cmp) => leaves.push(cmp),
                ExpressionNode::Boolean { left, right, .. } => {
                    pending.push(right);
                    pending.push(left);
                }
            }
        }
        leaves
    }

    /// Height of the tree; a single comparison has depth 1
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 1usize)];
        while let Some((node, level)) = pending.pop() {
            deepest = deepest.max(level);
            if let Some((left, right)) = node.children() {
                pending.push((left, level + 1));
                pending.push((right, level + 1));
            }
        }
        deepest
    }

    /// Decompose every leaf, failing on the first malformed condition
    pub fn validate(&self) -> Result<()> {
        for cmp in self.comparisons() {
            cmp.condition()?;
        }
        Ok(())
    }

    /// Serialize the tree to JSON
    ///
    /// Trees deeper than [`DEFAULT_MAX_DEPTH`] are rejected so that every
    /// tree written here can be read back by [`ExpressionNode::from_json`].
    pub fn to_json(&self) -> Result<String> {
        if self.depth() > DEFAULT_MAX_DEPTH {
            return Err(json_too_deep());
        }
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize a tree previously produced by [`ExpressionNode::to_json`]
    ///
    /// Each tree level is one level of JSON object nesting; documents nested
    /// deeper than [`DEFAULT_MAX_DEPTH`] are rejected before deserializing.
    pub fn from_json(json: &str) -> Result<Self> {
        if json_nesting(json) > DEFAULT_MAX_DEPTH {
            return Err(json_too_deep());
        }

        let mut deserializer = serde_json::Deserializer::from_str(json);
        // serde_json's own limit of 128 is below DEFAULT_MAX_DEPTH
        deserializer.disable_recursion_limit();
        let node = Self::deserialize(&mut deserializer)?;
        deserializer.end()?;
        Ok(node)
    }
}

fn json_too_deep() -> RuleError {
    RuleError::InvalidInput(format!(
        "Expression tree nests deeper than {} levels",
        DEFAULT_MAX_DEPTH
    ))
}

/// Deepest object/array nesting in a JSON document, ignoring string contents
fn json_nesting(json: &str) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for byte in json.bytes() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    deepest
}

impl fmt::Display for ExpressionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpressionNode::Comparison(cmp) => f.write_str(cmp.text()),
            ExpressionNode::Boolean {
                connective,
                left,
                right,
            } => write!(f, "({} {} {})", left, connective, right),
        }
    }
}
