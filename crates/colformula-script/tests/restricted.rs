//! Tests for row evaluation in the restricted environment

use colformula_core::{Series, Value};
use colformula_script::{compile_expression, ScriptError};
use pretty_assertions::assert_eq;

/// Evaluate an expression for every row of named columns
fn eval_rows(text: &str, columns: &[(&str, Series)]) -> Result<Vec<Value>, ScriptError> {
    let expr = compile_expression(text)?;
    let rows = columns.first().map_or(0, |(_, s)| s.len());
    (0..rows)
        .map(|row| {
            let bindings: Vec<_> = columns
                .iter()
                .map(|(name, series)| (*name, series.get(row)))
                .collect();
            expr.eval(&bindings)
        })
        .collect()
}

/// Numbers come back as numbers
#[test]
fn test_numeric_rows() {
    let a = Series::numeric(vec![Some(10.0), Some(20.0)]);
    assert_eq!(
        eval_rows("A * 2", &[("A", a)]).unwrap(),
        vec![Value::Number(20.0), Value::Number(40.0)]
    );
}

/// Text columns bind as strings
#[test]
fn test_text_rows() {
    let a = Series::strings(vec![Some("foo"), None]);
    assert_eq!(
        eval_rows("A", &[("A", a)]).unwrap(),
        vec![Value::from("foo"), Value::Null]
    );
}

/// Arrays become lists
#[test]
fn test_list_results() {
    let a = Series::numeric(vec![Some(1.0)]);
    assert_eq!(
        eval_rows("[A]", &[("A", a)]).unwrap(),
        vec![Value::List(vec![Value::Number(1.0)])]
    );
}

/// The first failing row stops evaluation
#[test]
fn test_failure_aborts() {
    let a = Series::numeric(vec![Some(1.0), Some(2.0)]);
    assert!(matches!(
        eval_rows("B * 2", &[("A", a)]),
        Err(ScriptError::Runtime(_))
    ));
}

/// Each compile gets its own engine
#[test]
fn test_environments_are_independent() {
    let first = compile_expression("A + 1").unwrap();
    let second = compile_expression("A + 2").unwrap();
    assert_eq!(
        first.eval(&[("A", Value::Number(1.0))]).unwrap(),
        Value::Number(2.0)
    );
    assert_eq!(
        second.eval(&[("A", Value::Number(1.0))]).unwrap(),
        Value::Number(3.0)
    );
}
