//! Python bindings

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyBool, PyDict};

use crate::record::{Record, Value};
use crate::rule::{self, ExpressionNode};

/// Convert a Python dict of `int` / `str` values into a record
fn extract_record(data: &Bound<'_, PyDict>) -> PyResult<Record> {
    let mut record = Record::with_capacity(data.len());
    for (key, value) in data.iter() {
        let name: String = key.extract()?;
        // bool subclasses int and would otherwise extract as 0 / 1
        if value.is_instance_of::<PyBool>() {
            return Err(invalid_field(&name));
        }
        let value = if let Ok(i) = value.extract::<i64>() {
            Value::Integer(i)
        } else if let Ok(s) = value.extract::<String>() {
            Value::Text(s)
        } else {
            return Err(invalid_field(&name));
        };
        record.insert(name, value);
    }
    Ok(record)
}

fn invalid_field(name: &str) -> PyErr {
    PyValueError::new_err(format!(
        "Invalid input: field '{}' must be int or str",
        name
    ))
}

/// A parsed rule tree
#[pyclass(name = "Rule", frozen)]
pub struct PyRule {
    ast: ExpressionNode,
}

#[pymethods]
impl PyRule {
    /// Evaluate the rule against a dict of field values
    fn evaluate(&self, data: &Bound<'_, PyDict>) -> PyResult<bool> {
        let record = extract_record(data)?;
        Ok(rule::evaluate(&self.ast, &record)?)
    }

    /// JSON form of the tree
    fn to_json(&self) -> PyResult<String> {
        Ok(self.ast.to_json()?)
    }

    fn __str__(&self) -> String {
        self.ast.to_string()
    }

    fn __repr__(&self) -> String {
        format!("Rule('{}')", self.ast)
    }
}

/// Parse a rule string
#[pyfunction]
fn parse_rule(rule_text: &str) -> PyResult<PyRule> {
    let ast = rule::parse_rule(rule_text)?;
    Ok(PyRule { ast })
}

/// Combine rules with AND; returns None for an empty list
#[pyfunction]
fn combine_rules(rules: Vec<String>) -> PyResult<Option<PyRule>> {
    let ast = rule::combine_rules(&rules)?;
    Ok(ast.map(|ast| PyRule { ast }))
}

/// Parse and evaluate a rule in one call, using the rule cache
#[pyfunction]
fn evaluate_rule(rule_text: &str, data: &Bound<'_, PyDict>) -> PyResult<bool> {
    let record = extract_record(data)?;
    Ok(rule::check_rule(rule_text, &record)?)
}

/// Python module definition
#[pymodule]
fn rule_ast(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(parse_rule, m)?)?;
    m.add_function(wrap_pyfunction!(combine_rules, m)?)?;
    m.add_function(wrap_pyfunction!(evaluate_rule, m)?)?;
    m.add_class::<PyRule>()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_record_types() {
        Python::initialize();
        Python::attach(|py| {
            let data = PyDict::new(py);
            data.set_item("age", 35).unwrap();
            data.set_item("department", "Sales").unwrap();

            let record = extract_record(&data).unwrap();
            assert_eq!(record.get("age"), Some(&Value::Integer(35)));
            assert_eq!(record.get("department"), Some(&Value::Text("Sales".to_string())));
        });
    }

    #[test]
    fn test_extract_record_rejects_bool() {
        Python::initialize();
        Python::attach(|py| {
            for flag in [true, false] {
                let data = PyDict::new(py);
                data.set_item("active", flag).unwrap();

                let err = extract_record(&data).unwrap_err();
                assert!(err.is_instance_of::<PyValueError>(py));
            }
        });
    }

    #[test]
    fn test_extract_record_rejects_float() {
        Python::initialize();
        Python::attach(|py| {
            let data = PyDict::new(py);
            data.set_item("score", 9.5).unwrap();
            assert!(extract_record(&data).is_err());
        });
    }
}
