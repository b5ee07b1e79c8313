//! Render parameters and their migration
//!
//! Parameters are stored as JSON. Older parameters encode the syntax as an integer (`0` for
//! spreadsheet formulas, `1` for expressions); [`migrate_params`] rewrites them to the current
//! form, and [`Params::from_json`] migrates before reading.

use crate::error::ParamsError;
use crate::range::EvaluationMode;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

/// Formula language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Syntax {
    /// Spreadsheet formulas such as `=SUM(A1:B1)`
    #[default]
    Excel,
    /// Expressions over column names such as `A * 2`
    Python,
}

/// Parameters for one render
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    pub syntax: Syntax,
    /// Spreadsheet formula, used with [`Syntax::Excel`]
    pub formula_excel: String,
    /// Expression, used with [`Syntax::Python`]
    pub formula_python: String,
    /// Apply the spreadsheet formula to every row instead of once
    pub all_rows: bool,
    /// Name of the result column; empty means `result`
    pub out_column: String,
}

impl Params {
    /// Spreadsheet formula parameters
    pub fn excel(formula: impl Into<String>, all_rows: bool) -> Self {
        Self {
            syntax: Syntax::Excel,
            formula_excel: formula.into(),
            all_rows,
            ..Self::default()
        }
    }

    /// Expression parameters
    pub fn python(expression: impl Into<String>) -> Self {
        Self {
            syntax: Syntax::Python,
            formula_python: expression.into(),
            ..Self::default()
        }
    }

    /// Set the result column name
    pub fn with_out_column(mut self, name: impl Into<String>) -> Self {
        self.out_column = name.into();
        self
    }

    /// Migrate and read stored parameters
    pub fn from_json(params: Json) -> Result<Self, ParamsError> {
        Ok(serde_json::from_value(migrate_params(params)?)?)
    }

    /// How a spreadsheet formula is applied
    pub fn mode(&self) -> EvaluationMode {
        if self.all_rows {
            EvaluationMode::AllRows
        } else {
            EvaluationMode::SingleRow
        }
    }

    /// Formula text for the selected syntax
    pub fn formula(&self) -> &str {
        match self.syntax {
            Syntax::Excel => &self.formula_excel,
            Syntax::Python => &self.formula_python,
        }
    }
}

/// Rewrite stored parameters to the current form
///
/// Current parameters are returned unchanged.
pub fn migrate_params(params: Json) -> Result<Json, ParamsError> {
    let Json::Object(mut map) = params else {
        return Err(ParamsError::NotAnObject);
    };

    if let Some(version) = map.get("syntax").and_then(Json::as_i64) {
        let syntax = match version {
            0 => "excel",
            1 => "python",
            other => return Err(ParamsError::UnknownSyntax(other)),
        };
        map.insert("syntax".to_string(), Json::from(syntax));
    }

    Ok(Json::Object(map))
}
