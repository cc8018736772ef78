//! Rule parsing, combination and evaluation
//!
//! Rules are strings like "age > 30 AND department = 'Sales'". They are
//! parsed into an [`ExpressionNode`] tree and evaluated against a record.

mod ast;
pub mod cache;
mod combiner;
mod condition;
mod evaluator;
pub mod parser;


pub use ast::*;
pub use cache::*;
pub use combiner::*;
pub use condition::*;
pub use evaluator::*;
pub use parser::*;
