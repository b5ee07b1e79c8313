//! Tests for migrating stored parameters

use colformula::{migrate_params, Params, Syntax};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn test_v0_excel() {
    let result = migrate_params(json!({
        "syntax": 0,
        "out_column": "R",
        "formula_excel": "=A1",
        "formula_python": "A",
        "all_rows": true
    }))
    .unwrap();
    assert_eq!(
        result,
        json!({
            "syntax": "excel",
            "out_column": "R",
            "formula_excel": "=A1",
            "formula_python": "A",
            "all_rows": true
        })
    );
}

#[test]
fn test_v0_python() {
    let result = migrate_params(json!({
        "syntax": 1,
        "out_column": "R",
        "formula_excel": "=A1",
        "formula_python": "A",
        "all_rows": true
    }))
    .unwrap();
    assert_eq!(
        result,
        json!({
            "syntax": "python",
            "out_column": "R",
            "formula_excel": "=A1",
            "formula_python": "A",
            "all_rows": true
        })
    );
}

#[test]
fn test_v1() {
    let params = json!({
        "syntax": "python",
        "out_column": "R",
        "formula_excel": "=A1",
        "formula_python": "A",
        "all_rows": true
    });
    assert_eq!(migrate_params(params.clone()).unwrap(), params);
}

#[test]
fn test_from_json_round_trip() {
    let params = Params::from_json(json!({
        "syntax": 0,
        "out_column": "R",
        "formula_excel": "=A1",
        "formula_python": "A",
        "all_rows": true
    }))
    .unwrap();
    assert_eq!(
        params,
        Params {
            syntax: Syntax::Excel,
            formula_excel: "=A1".into(),
            formula_python: "A".into(),
            all_rows: true,
            out_column: "R".into(),
        }
    );
    assert_eq!(
        serde_json::to_value(&params).unwrap()["syntax"],
        json!("excel")
    );
}
