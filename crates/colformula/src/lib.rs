//! # colformula
//!
//! Add a computed column to a table.
//!
//! A formula is either a spreadsheet formula such as `=SUM(A1:C1)`, where the table's columns
//! are spreadsheet columns A, B, C and its rows are rows 1, 2, 3, or an expression over column
//! names such as `A * 2`, evaluated once per row in a restricted environment.
//!
//! ## Features
//!
//! - Spreadsheet formulas evaluated once (result in the first row) or once per row
//! - Expressions evaluated per row, with dangerous operations disabled
//! - Result columns normalized to numeric, datetime, categorical or string
//! - Failures reported as translatable messages instead of partial results
//! - Pluggable engines through [`SpreadsheetCompiler`] and [`ExpressionCompiler`]
//!
//! ## Example
//!
//! ```rust
//! use colformula::prelude::*;
//!
//! let table = Table::from_columns([
//!     ("A", Series::numeric([Some(1.0), Some(2.0)])),
//!     ("B", Series::numeric([Some(3.0), Some(4.0)])),
//! ])
//! .unwrap();
//!
//! let output = render(Some(table), &Params::excel("=A1+B1", true));
//! let table = output.into_table().unwrap();
//! assert_eq!(
//!     table.column("result"),
//!     Some(&Series::numeric([Some(4.0), Some(6.0)]))
//! );
//! ```

pub mod engine;
pub mod error;
pub mod expression;
pub mod message;
pub mod params;
pub mod prelude;
pub mod range;
pub mod render;
pub mod rows;

// Re-export rendering types
pub use params::{migrate_params, Params, Syntax};
pub use render::{output_column_name, render, FormulaRenderer, RenderOutput};

// Re-export engine types
pub use engine::{
    ExcelCompiler, ExpressionCompiler, ExpressionError, ExpressionProgram, InvokeError,
    ScriptCompiler, SpreadsheetCompiler, SpreadsheetProgram,
};
pub use range::{resolve_ranges, EvaluationMode, ResolvedRange};

// Re-export messages and errors
pub use error::{ParamsError, RenderError, RenderResult};
pub use message::{I18nMessage, UserMessage};

// Re-export the column model
pub use colformula_core::{ColumnData, ColumnKind, Series, Table, Value};
