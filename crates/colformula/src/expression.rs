//! Evaluating an expression once per row
//!
//! Each column is bound under its name with whitespace replaced by `_`, so a column called
//! `A b` is read as `A_b`.

use crate::engine::{ExpressionCompiler, ExpressionError, ExpressionProgram};
use crate::error::{RenderError, RenderResult};
use colformula_core::{autocast, sanitize, Series, Table, Value};
use tracing::debug;

/// Name a column is bound under
pub fn binding_name(column: &str) -> String {
    column
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

fn render_error(err: ExpressionError) -> RenderError {
    match err {
        ExpressionError::Disabled { name } => RenderError::DisabledCapability {
            name: format!("builtins.{}", name),
        },
        ExpressionError::Failed(text) => RenderError::ExpressionRuntime(text),
    }
}

/// Compile `expression` and evaluate it for every row of `table`
///
/// The first failing row aborts the whole column.
pub fn evaluate_expression<C>(compiler: &C, table: &Table, expression: &str) -> RenderResult<Series>
where
    C: ExpressionCompiler + ?Sized,
{
    let program = compiler.compile(expression).map_err(render_error)?;
    let names: Vec<String> = table.column_names().map(binding_name).collect();

    debug!(
        columns = names.len(),
        rows = table.row_count(),
        "evaluating expression per row"
    );
    let values = (0..table.row_count())
        .map(|row| {
            let bindings: Vec<(&str, Value)> = names
                .iter()
                .enumerate()
                .map(|(col, name)| (name.as_str(), table.cell(row, col)))
                .collect();
            program.eval(&bindings).map_err(render_error)
        })
        .collect::<RenderResult<Vec<Value>>>()?;

    Ok(autocast(sanitize(Series::from_values(values))))
}
