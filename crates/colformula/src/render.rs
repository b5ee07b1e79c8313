//! Adding a formula column to a table
//!
//! # Example
//!
//! ```rust
//! use colformula::{render, Params, RenderOutput, Series, Table};
//!
//! let table = Table::from_columns([("A", Series::numeric([Some(10.0), Some(20.0)]))]).unwrap();
//! let output = render(Some(table), &Params::python("A * 2").with_out_column("B"));
//!
//! let RenderOutput::Table(table) = output else { panic!("expected a table") };
//! assert_eq!(table.column("B"), Some(&Series::numeric([Some(20.0), Some(40.0)])));
//! ```

use crate::engine::{ExcelCompiler, ExpressionCompiler, ScriptCompiler, SpreadsheetCompiler};
use crate::error::{RenderError, RenderResult};
use crate::expression::evaluate_expression;
use crate::message::UserMessage;
use crate::params::{Params, Syntax};
use crate::range::{resolve_ranges, EvaluationMode};
use crate::rows::{evaluate_once, evaluate_per_row};
use colformula_core::{prepare_for_spreadsheet, Series, Table};
use tracing::debug;

/// Result name used when none is given
pub const DEFAULT_OUTPUT_COLUMN: &str = "result";

/// Outcome of a render
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutput {
    /// There was no table to work on
    NoTable,
    /// The input table, with the result column added when a formula was given
    Table(Table),
    /// The formula could not produce a column
    Message(UserMessage),
}

impl RenderOutput {
    /// The table, if the render produced one
    pub fn into_table(self) -> Option<Table> {
        match self {
            RenderOutput::Table(table) => Some(table),
            _ => None,
        }
    }

    /// The message, if the render failed
    pub fn message(&self) -> Option<&UserMessage> {
        match self {
            RenderOutput::Message(message) => Some(message),
            _ => None,
        }
    }
}

/// Renders formulas with a spreadsheet engine and an expression engine
#[derive(Debug, Clone, Default)]
pub struct FormulaRenderer<S = ExcelCompiler, E = ScriptCompiler> {
    spreadsheet: S,
    expression: E,
}

impl FormulaRenderer {
    /// Renderer using the built-in engines
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S, E> FormulaRenderer<S, E>
where
    S: SpreadsheetCompiler,
    E: ExpressionCompiler,
{
    /// Renderer using the given engines
    pub fn with_compilers(spreadsheet: S, expression: E) -> Self {
        Self {
            spreadsheet,
            expression,
        }
    }

    /// Add the formula's column to `table`
    ///
    /// A missing table gives [`RenderOutput::NoTable`]; a blank formula returns the table
    /// unchanged. Failures become a [`RenderOutput::Message`] and leave no partial column.
    pub fn render(&self, table: Option<Table>, params: &Params) -> RenderOutput {
        let Some(table) = table else {
            return RenderOutput::NoTable;
        };
        if params.formula().trim().is_empty() {
            debug!(syntax = ?params.syntax, "blank formula, table unchanged");
            return RenderOutput::Table(table);
        }

        match self.try_render(table, params) {
            Ok(table) => RenderOutput::Table(table),
            Err(err) => {
                debug!(error = %err, "formula produced no column");
                RenderOutput::Message(err.to_user_message())
            }
        }
    }

    /// Add the formula's column to `table`, or fail with the reason
    ///
    /// The formula must not be blank.
    pub fn try_render(&self, mut table: Table, params: &Params) -> RenderResult<Table> {
        let column = match params.syntax {
            Syntax::Excel => {
                self.spreadsheet_column(&table, &params.formula_excel, params.mode())?
            }
            Syntax::Python => {
                evaluate_expression(&self.expression, &table, params.formula_python.trim())?
            }
        };

        let name = output_column_name(&table, &params.out_column);
        debug!(column = %name, kind = ?column.kind(), "adding result column");
        table.set_column(name, column)?;
        Ok(table)
    }

    fn spreadsheet_column(
        &self,
        table: &Table,
        formula: &str,
        mode: EvaluationMode,
    ) -> RenderResult<Series> {
        let prepared = prepare_for_spreadsheet(table);
        let program = self
            .spreadsheet
            .compile(formula)
            .map_err(RenderError::InvalidFormula)?;
        debug!(formula, ?mode, "compiled formula");

        let ranges = resolve_ranges(&program, &prepared, mode)?;
        match mode {
            EvaluationMode::SingleRow => evaluate_once(&program, &prepared, &ranges),
            EvaluationMode::AllRows => evaluate_per_row(&program, &prepared, &ranges),
        }
    }
}

/// Render with the built-in engines
pub fn render(table: Option<Table>, params: &Params) -> RenderOutput {
    FormulaRenderer::new().render(table, params)
}

/// Name for the result column that does not clash with the table's columns
///
/// An empty request means [`DEFAULT_OUTPUT_COLUMN`]. A taken name gets the first free numeric
/// suffix: `result0`, then `result1`.
pub fn output_column_name(table: &Table, requested: &str) -> String {
    let base = if requested.is_empty() {
        DEFAULT_OUTPUT_COLUMN
    } else {
        requested
    };
    if !table.contains_column(base) {
        return base.to_string();
    }
    (0usize..)
        .map(|n| format!("{}{}", base, n))
        .find(|name| !table.contains_column(name))
        .unwrap_or_else(|| base.to_string())
}
