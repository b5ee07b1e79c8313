//! Evaluating a spreadsheet program against table cells

use crate::engine::{InvokeError, SpreadsheetProgram};
use crate::error::{RenderError, RenderResult};
use crate::range::ResolvedRange;
use colformula_core::{autocast, datetime_to_serial, sanitize, Series, Table, Value};
use colformula_excel::{CellError, FormulaValue};
use std::ops::Range;
use tracing::debug;

/// Formula value for a table cell
pub fn to_formula_value(value: &Value) -> FormulaValue {
    match value {
        Value::Null => FormulaValue::Empty,
        Value::Number(n) => FormulaValue::Number(*n),
        Value::Bool(b) => FormulaValue::Boolean(*b),
        Value::Text(s) => FormulaValue::String(s.clone()),
        Value::Datetime(dt) => {
            datetime_to_serial(*dt).map_or(FormulaValue::Empty, FormulaValue::Number)
        }
        other => FormulaValue::String(other.to_string()),
    }
}

/// Cell value for a formula result
///
/// Spreadsheet errors become their display text, so a `#DIV/0!` shows up in the column.
pub fn from_formula_value(value: FormulaValue) -> Value {
    match value {
        FormulaValue::Number(n) if n.is_finite() => Value::Number(n),
        FormulaValue::Number(_) => Value::Text(CellError::Num.to_string()),
        FormulaValue::String(s) => Value::Text(s),
        FormulaValue::Boolean(b) => Value::Bool(b),
        FormulaValue::Error(e) => Value::Text(e.to_string()),
        FormulaValue::Empty => Value::Null,
        FormulaValue::Array(rows) => {
            let mut items: Vec<Value> =
                rows.into_iter().flatten().map(from_formula_value).collect();
            if items.len() == 1 {
                items.remove(0)
            } else {
                Value::List(items)
            }
        }
    }
}

/// One argument from a block of cells: a lone cell is passed as a scalar, anything else as a
/// single row of values in row-major order. A block with no cells (rows past the end of the
/// table) is blank.
fn argument(mut cells: Vec<FormulaValue>) -> FormulaValue {
    match cells.len() {
        0 => FormulaValue::Empty,
        1 => cells.remove(0),
        _ => FormulaValue::row(cells),
    }
}

fn invoke<P>(program: &P, args: &[FormulaValue]) -> RenderResult<Value>
where
    P: SpreadsheetProgram + ?Sized,
{
    program
        .invoke(args)
        .map(from_formula_value)
        .map_err(|err| match err {
            InvokeError::NotImplemented(name) => RenderError::FunctionNotImplemented { name },
            InvokeError::Failed(detail) => RenderError::Evaluation(detail),
        })
}

/// Evaluate once against the whole table
///
/// Each window is read with its rows clamped to the table. The result fills the first row of a
/// column as long as the table; the other rows are null.
pub fn evaluate_once<P>(
    program: &P,
    table: &Table,
    ranges: &[ResolvedRange],
) -> RenderResult<Series>
where
    P: SpreadsheetProgram + ?Sized,
{
    let row_count = table.row_count();
    let args: Vec<FormulaValue> = ranges
        .iter()
        .map(|range| {
            let rows = range.rows.start.min(row_count)..range.rows.end.min(row_count);
            let cells = rows
                .flat_map(|row| range.columns.clone().map(move |col| (row, col)))
                .map(|(row, col)| to_formula_value(&table.cell(row, col)))
                .collect();
            argument(cells)
        })
        .collect();

    debug!(inputs = args.len(), rows = row_count, "evaluating formula once");
    let value = invoke(program, &args)?;
    Ok(Series::broadcast_first(value, row_count))
}

/// Evaluate once per row, reading each window's columns from that row
///
/// The first failing row aborts the whole column.
pub fn evaluate_per_row<P>(
    program: &P,
    table: &Table,
    ranges: &[ResolvedRange],
) -> RenderResult<Series>
where
    P: SpreadsheetProgram + ?Sized,
{
    let columns: Vec<Range<usize>> = ranges.iter().map(|r| r.columns.clone()).collect();

    debug!(inputs = columns.len(), rows = table.row_count(), "evaluating formula per row");
    let values = (0..table.row_count())
        .map(|row| {
            let args: Vec<FormulaValue> = columns
                .iter()
                .map(|cols| {
                    argument(
                        cols.clone()
                            .map(|col| to_formula_value(&table.cell(row, col)))
                            .collect(),
                    )
                })
                .collect();
            invoke(program, &args)
        })
        .collect::<RenderResult<Vec<Value>>>()?;

    Ok(autocast(sanitize(Series::from_values(values))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cell_to_formula_value() {
        assert_eq!(to_formula_value(&Value::Null), FormulaValue::Empty);
        assert_eq!(
            to_formula_value(&Value::from("a")),
            FormulaValue::String("a".into())
        );
        assert_eq!(
            to_formula_value(&Value::List(vec![Value::Number(1.0)])),
            FormulaValue::String("[1.0]".into())
        );
    }

    #[test]
    fn test_formula_value_to_cell() {
        assert_eq!(
            from_formula_value(FormulaValue::Error(CellError::Div0)),
            Value::from("#DIV/0!")
        );
        assert_eq!(
            from_formula_value(FormulaValue::Number(f64::INFINITY)),
            Value::from("#NUM!")
        );
        assert_eq!(from_formula_value(FormulaValue::Empty), Value::Null);
        assert_eq!(
            from_formula_value(FormulaValue::row(vec![FormulaValue::Number(2.0)])),
            Value::Number(2.0)
        );
        assert_eq!(
            from_formula_value(FormulaValue::row(vec![
                FormulaValue::Number(2.0),
                FormulaValue::Boolean(true)
            ])),
            Value::List(vec![Value::Number(2.0), Value::Bool(true)])
        );
    }

    #[test]
    fn test_single_cell_is_scalar() {
        assert_eq!(
            argument(vec![FormulaValue::Number(1.0)]),
            FormulaValue::Number(1.0)
        );
        assert_eq!(
            argument(vec![FormulaValue::Number(1.0), FormulaValue::Empty]),
            FormulaValue::row(vec![FormulaValue::Number(1.0), FormulaValue::Empty])
        );
    }

    #[test]
    fn test_no_cells_is_blank() {
        assert_eq!(argument(Vec::new()), FormulaValue::Empty);
    }
}
