//! Checking formula references against a table
//!
//! Each input of a spreadsheet program names one block of cells in A1 coordinates, with the
//! table's columns as spreadsheet columns and its rows as spreadsheet rows. Resolving turns
//! every input into a window on the table, or fails with the first reference that does not fit.

use crate::engine::SpreadsheetProgram;
use crate::error::{RenderError, RenderResult};
use colformula_core::Table;
use colformula_excel::RangeDescriptor;
use std::ops::Range;

/// How a spreadsheet formula is applied to a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationMode {
    /// Evaluate once against the whole table; the result fills the first row
    SingleRow,
    /// Evaluate once per row; references address columns through row 1
    AllRows,
}

/// A window on the table, 0-based and half-open
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRange {
    /// Rows read; may extend past the last row of the table
    pub rows: Range<usize>,
    /// Columns read
    pub columns: Range<usize>,
}

/// Resolve every input of `program`, in declaration order
pub fn resolve_ranges<P>(
    program: &P,
    table: &Table,
    mode: EvaluationMode,
) -> RenderResult<Vec<ResolvedRange>>
where
    P: SpreadsheetProgram + ?Sized,
{
    program
        .inputs()
        .iter()
        .map(|input| {
            let range = match input.ranges.as_deref() {
                None => {
                    return Err(RenderError::InvalidReference {
                        token: input.token.clone(),
                        mode,
                    })
                }
                Some([range]) => range,
                Some(_) => return Err(RenderError::NonRectangularRange),
            };
            match mode {
                EvaluationMode::SingleRow => resolve_single_row(range, table.column_count()),
                EvaluationMode::AllRows => resolve_all_rows(range, table.column_count()),
            }
        })
        .collect()
}

/// 0-based half-open bounds of a descriptor: `(row_start, row_end, col_start, col_end)`
fn bounds(range: &RangeDescriptor) -> (i64, i64, i64, i64) {
    (
        i64::from(range.row_start) - 1,
        i64::from(range.row_end),
        i64::from(range.col_start) - 1,
        i64::from(range.col_end),
    )
}

fn resolve_single_row(range: &RangeDescriptor, column_count: usize) -> RenderResult<ResolvedRange> {
    let (r1, r2, c1, c2) = bounds(range);
    // Rows past the end are allowed: `SUM(A1:A99999)` means "the whole column"
    if r1 < 0 || c1 < 0 || c2 > column_count as i64 || r1 >= r2 || c1 >= c2 {
        return Err(RenderError::RangeOutOfBounds {
            reference: range.reference.clone(),
        });
    }
    Ok(ResolvedRange {
        rows: r1 as usize..r2 as usize,
        columns: c1 as usize..c2 as usize,
    })
}

fn resolve_all_rows(range: &RangeDescriptor, column_count: usize) -> RenderResult<ResolvedRange> {
    if range.row_start != 1 || range.row_end != 1 {
        return Err(RenderError::FirstRowOnlyViolation);
    }
    let (_, _, c1, c2) = bounds(range);
    if c1 < 0 || c2 > column_count as i64 || c1 >= c2 {
        return Err(RenderError::ColumnOutOfRange {
            reference: range.reference.clone(),
        });
    }
    Ok(ResolvedRange {
        rows: 0..1,
        columns: c1 as usize..c2 as usize,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ExcelCompiler, SpreadsheetCompiler};
    use colformula_core::Series;
    use pretty_assertions::assert_eq;

    fn table(columns: usize, rows: usize) -> Table {
        Table::from_columns((0..columns).map(|c| {
            (
                format!("c{}", c),
                Series::numeric((0..rows).map(|r| Some(r as f64))),
            )
        }))
        .unwrap()
    }

    fn resolve(formula: &str, table: &Table, mode: EvaluationMode) -> RenderResult<Vec<ResolvedRange>> {
        let program = ExcelCompiler.compile(formula).unwrap();
        resolve_ranges(&program, table, mode)
    }

    #[test]
    fn test_single_row_windows() {
        let ranges = resolve("=SUM(A1:B3)+C2", &table(3, 3), EvaluationMode::SingleRow).unwrap();
        assert_eq!(
            ranges,
            vec![
                ResolvedRange {
                    rows: 0..3,
                    columns: 0..2
                },
                ResolvedRange {
                    rows: 1..2,
                    columns: 2..3
                },
            ]
        );
    }

    #[test]
    fn test_single_row_allows_rows_past_the_end() {
        let ranges = resolve("=SUM(A1:A99999)", &table(1, 2), EvaluationMode::SingleRow).unwrap();
        assert_eq!(ranges[0].rows, 0..99999);
    }

    #[test]
    fn test_single_row_column_out_of_bounds() {
        assert_eq!(
            resolve("=C1", &table(2, 2), EvaluationMode::SingleRow),
            Err(RenderError::RangeOutOfBounds {
                reference: "C1".into()
            })
        );
    }

    #[test]
    fn test_unresolved_token() {
        assert_eq!(
            resolve("=A0*2", &table(1, 1), EvaluationMode::SingleRow),
            Err(RenderError::InvalidReference {
                token: "A0".into(),
                mode: EvaluationMode::SingleRow
            })
        );
        assert_eq!(
            resolve("=A*2", &table(1, 1), EvaluationMode::AllRows),
            Err(RenderError::InvalidReference {
                token: "A".into(),
                mode: EvaluationMode::AllRows
            })
        );
    }

    #[test]
    fn test_union_is_not_rectangular() {
        for mode in [EvaluationMode::SingleRow, EvaluationMode::AllRows] {
            assert_eq!(
                resolve("=SUM((A1,B1))", &table(2, 1), mode),
                Err(RenderError::NonRectangularRange)
            );
        }
    }

    #[test]
    fn test_all_rows_first_row_only() {
        assert_eq!(
            resolve("=A2*2", &table(1, 3), EvaluationMode::AllRows),
            Err(RenderError::FirstRowOnlyViolation)
        );
        assert_eq!(
            resolve("=SUM(A:B)", &table(2, 3), EvaluationMode::AllRows),
            Err(RenderError::FirstRowOnlyViolation)
        );
    }

    #[test]
    fn test_all_rows_column_bounds() {
        assert_eq!(
            resolve("=SUM(A1:B1)", &table(1, 2), EvaluationMode::AllRows),
            Err(RenderError::ColumnOutOfRange {
                reference: "A1:B1".into()
            })
        );
        let ranges = resolve("=SUM(A1:C1)", &table(3, 2), EvaluationMode::AllRows).unwrap();
        assert_eq!(
            ranges,
            vec![ResolvedRange {
                rows: 0..1,
                columns: 0..3
            }]
        );
    }
}
